use serde::{Deserialize, Serialize};

use crate::net::EntityId;

/// 协议事件类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceEventKind {
    /// 实验参数（作为 t=0 的第一条事件）
    Meta {
        window_size: u32,
        limit_seqnum: u32,
        payload_size: usize,
        timeout_ns: u64,
        num_msgs: u64,
        loss_prob: f64,
        corrupt_prob: f64,
        reorder: bool,
    },
    /// 应用层交给 A 一条消息
    MessageReady { msg: u64 },
    /// A 窗口已满，消息进入积压队列
    WindowFull { base: u32, next: u32, backlog: usize },
    /// A 发送数据分组
    SendData { seq: u32, retrans: bool },
    /// B 发送 ACK
    SendAck { ack: u32 },
    /// 信道丢包
    Lost { from: EntityId, seq: u32, ack: u32 },
    /// 信道损坏分组
    Corrupted { from: EntityId },
    /// 分组到达某实体
    Arrive { to: EntityId, seq: u32, ack: u32 },
    /// B 按序接受
    Accept { seq: u32 },
    /// A 收到有效累计 ACK
    AckAdvance { ack: u32, released: u32 },
    /// A 超时
    Timeout { base: u32, next: u32, window: Vec<u32> },
    TimerStart { deadline_ns: u64 },
    TimerStop,
}

/// 一个可回放的事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    /// 仿真时间（纳秒，和 `SimTime.0` 同口径）
    pub t_ns: u64,
    #[serde(flatten)]
    pub kind: TraceEventKind,
}

/// 一个简单的事件收集器（存内存，仿真结束写 JSON 文件）
#[derive(Debug, Default)]
pub struct TraceLogger {
    pub events: Vec<TraceEvent>,
}

impl TraceLogger {
    pub fn push(&mut self, t_ns: u64, kind: TraceEventKind) {
        self.events.push(TraceEvent { t_ns, kind });
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.events)
    }
}
