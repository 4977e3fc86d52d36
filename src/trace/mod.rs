//! 协议事件记录（JSON）
//!
//! 设计目标：
//! - **结构化**：用 JSON 事件而不是解析文本日志
//! - **轻量**：存内存，仿真结束后一次性写出
//! - **可回放**：按时间顺序记录窗口、重传与信道故障

mod types;

pub use types::{TraceEvent, TraceEventKind, TraceLogger};
