//! GBN 错误类型
//!
//! 只有配置错误是致命的；运行期的协议异常（损坏、重复、过期 ACK）不会产生错误，
//! 只会被丢弃并计数。

use super::packet::Message;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("window size must be at least 1")]
    ZeroWindow,

    #[error("sequence space too small: limit_seqnum {limit} < 2 * window_size {window}")]
    SeqSpaceTooSmall { limit: u32, window: u32 },

    #[error("payload size must be at least 1 byte")]
    ZeroPayload,

    #[error("retransmission timeout must be positive")]
    ZeroTimeout,

    #[error("probability {name} = {value} is outside [0, 1]")]
    InvalidProbability { name: &'static str, value: f64 },

    #[error("read scenario: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse scenario: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum MessageError {
    #[error("message payload must be {expected} bytes, got {actual}")]
    PayloadSize { expected: usize, actual: usize },
}

/// 发送方拒绝新消息：窗口已满。消息原样交还给调用方，稍后重试。
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("send window full (base {base}, next {next})")]
    WindowFull {
        base: u32,
        next: u32,
        message: Message,
    },

    #[error(transparent)]
    Message(#[from] MessageError),
}

impl SendError {
    /// 取回被拒绝的消息（仅 `WindowFull` 携带）
    pub fn into_message(self) -> Option<Message> {
        match self {
            SendError::WindowFull { message, .. } => Some(message),
            SendError::Message(_) => None,
        }
    }
}
