//! 仿真场景描述（JSON）
//!
//! 所有字段都有默认值，JSON 中只需写出要修改的部分。

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::time::SimTime;
use crate::gbn::{ConfigError, GbnConfig};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioSpec {
    pub window_size: u32,
    pub limit_seqnum: u32,
    pub payload_size: usize,
    /// 应用层产生的消息总数
    pub num_msgs: u64,
    pub loss_prob: f64,
    pub corrupt_prob: f64,
    /// 重传超时（微秒）
    pub timeout_us: u64,
    /// 消息平均到达间隔（微秒）
    pub msg_interval_us: u64,
    /// 单向最小传播时延（微秒）
    pub link_delay_us: u64,
    /// 在最小时延之上的均匀随机抖动（微秒）
    pub link_jitter_us: u64,
    /// 允许同方向分组相互超越
    pub reorder: bool,
    pub seed: u64,
    /// 仿真硬截止时间（毫秒）
    pub until_ms: u64,
}

impl Default for ScenarioSpec {
    fn default() -> Self {
        Self {
            window_size: 8,
            limit_seqnum: 16,
            payload_size: 20,
            num_msgs: 20,
            loss_prob: 0.0,
            corrupt_prob: 0.0,
            timeout_us: 30,
            msg_interval_us: 10,
            link_delay_us: 1,
            link_jitter_us: 9,
            reorder: false,
            seed: 1,
            until_ms: 1_000,
        }
    }
}

fn check_prob(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidProbability { name, value })
    }
}

impl ScenarioSpec {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// 校验场景并导出协议参数
    pub fn validate(&self) -> Result<GbnConfig, ConfigError> {
        check_prob("loss_prob", self.loss_prob)?;
        check_prob("corrupt_prob", self.corrupt_prob)?;
        GbnConfig::new(
            self.window_size,
            self.limit_seqnum,
            self.payload_size,
            SimTime::from_micros(self.timeout_us),
        )
    }

    pub fn until(&self) -> SimTime {
        SimTime::from_millis(self.until_ms)
    }
}
