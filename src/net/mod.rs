//! 网络仿真模块
//!
//! 此模块把 GBN 协议核心接入事件驱动仿真：不可靠信道、消息源、
//! 重传定时器以及驱动它们的事件。

// 子模块声明
mod channel;
mod deliver_packet;
mod gbn_world;
mod id;
mod message_ready;
mod stats;
mod timer_interrupt;

// 重新导出公共接口
pub use channel::{Channel, ChannelConfig, GARBLED_NUM, Transit};
pub use deliver_packet::DeliverPacket;
pub use gbn_world::{run_scenario, GbnWorld};
pub use id::EntityId;
pub use message_ready::MessageReady;
pub use stats::ChannelStats;
pub use timer_interrupt::TimerInterrupt;
