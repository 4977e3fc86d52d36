//! Go-Back-N 协议核心
//!
//! 分组编解码、序号空间运算、发送方/接收方状态机与统计。
//! 核心与仿真器解耦：只通过 [`ChannelSink`] / [`TimerControl`] 对外产生副作用，
//! 由仿真器调用各状态机的事件处理方法驱动。

mod config;
mod error;
mod packet;
mod port;
mod receiver;
mod sender;
mod seq;
mod stats;

pub use config::GbnConfig;
pub use error::{ConfigError, MessageError, SendError};
pub use packet::{compute_checksum, Message, Packet, UNUSED};
pub use port::{ChannelSink, Outbox, TimerCommand, TimerControl, TimerSlot};
pub use receiver::{Arrival, ReceiverState};
pub use sender::{AckOutcome, SenderPhase, SenderState, TimerState};
pub use seq::SeqSpace;
pub use stats::{Counters, Report, Statistics};
