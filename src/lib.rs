pub mod gbn;
pub mod net;
pub mod sim;
pub mod trace;

#[cfg(test)]
mod test;
