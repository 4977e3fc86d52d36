mod channel;
mod sender;
mod seq_space;
mod support;
