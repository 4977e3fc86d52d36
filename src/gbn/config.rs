//! GBN 协议参数

use super::error::ConfigError;
use super::seq::SeqSpace;
use crate::sim::SimTime;

/// 协议参数（启动前校验，运行期不可变）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GbnConfig {
    /// 发送窗口大小 N
    pub window_size: u32,
    /// 序号空间大小，序号取值 `[0, limit_seqnum)`
    pub limit_seqnum: u32,
    /// 每个分组的固定载荷长度（字节）
    pub payload_size: usize,
    /// 重传超时
    pub timeout: SimTime,
}

impl GbnConfig {
    pub fn new(
        window_size: u32,
        limit_seqnum: u32,
        payload_size: usize,
        timeout: SimTime,
    ) -> Result<Self, ConfigError> {
        // 序号空间约束由 SeqSpace 统一检查
        SeqSpace::new(limit_seqnum, window_size)?;
        if payload_size == 0 {
            return Err(ConfigError::ZeroPayload);
        }
        if timeout == SimTime::ZERO {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(Self {
            window_size,
            limit_seqnum,
            payload_size,
            timeout,
        })
    }

    pub fn seq_space(&self) -> SeqSpace {
        SeqSpace {
            limit: self.limit_seqnum,
            window: self.window_size,
        }
    }
}
