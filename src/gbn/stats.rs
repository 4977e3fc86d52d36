//! 统计信息
//!
//! [`Statistics`] 只做累加，由收发双方在固定的协议事件点更新；
//! 均值、比率等派生指标在读取时由 [`Report`] 计算，不重复存储。

use std::collections::VecDeque;

use serde::Serialize;

use crate::sim::SimTime;

/// 原始计数器快照
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counters {
    /// A 发出的新数据分组数（不含重传）
    pub tx_pkt_count: u64,
    /// B 收到的分组数（含损坏与乱序）
    pub rx_pkt_count: u64,
    /// B 检测到的损坏分组数
    pub corrupt_pkt_count: u64,
    /// A 收到并丢弃的损坏 ACK 数
    pub corrupt_ack_count: u64,
    /// 超时重传的分组数
    pub rxmt_count: u64,
    /// 被累计确认的分组数
    pub comm_pkt_count: u64,
    /// B 按序接受的消息数
    pub received_msg_count: u64,
    /// 应用层交给 A 的消息数
    pub ready_msg_count: u64,
    /// 每个分组从首次发送到被确认的时长之和
    pub total_ttc: SimTime,
    /// 每条消息从就绪到被 B 接受的时长之和
    pub total_delay: SimTime,
}

/// 被动累加器：计数只增不减，仅在仿真开始时清零
#[derive(Debug, Default)]
pub struct Statistics {
    c: Counters,
    // 尚未被 B 接受的消息的就绪时间（按应用顺序）
    ready_at: VecDeque<SimTime>,
}

impl Statistics {
    pub fn counters(&self) -> Counters {
        self.c
    }

    pub fn record_message_ready(&mut self, now: SimTime) {
        self.c.ready_msg_count += 1;
        self.ready_at.push_back(now);
    }

    pub(crate) fn record_packet_sent(&mut self) {
        self.c.tx_pkt_count += 1;
    }

    pub(crate) fn record_retransmits(&mut self, n: u64) {
        self.c.rxmt_count += n;
    }

    pub(crate) fn record_corrupt_ack(&mut self) {
        self.c.corrupt_ack_count += 1;
    }

    /// 一个分组被累计确认：计入 TTC（重传只在最终确认时计一次）
    pub(crate) fn record_acked(&mut self, first_sent_at: SimTime, now: SimTime) {
        self.c.comm_pkt_count += 1;
        self.c.total_ttc = self.c.total_ttc.after(now.since(first_sent_at));
    }

    /// 丢弃最早的未决就绪时间（该消息不会再被发送）
    pub(crate) fn discard_oldest_ready(&mut self) {
        self.ready_at.pop_front();
    }

    pub(crate) fn record_arrival(&mut self) {
        self.c.rx_pkt_count += 1;
    }

    pub(crate) fn record_corrupt(&mut self) {
        self.c.corrupt_pkt_count += 1;
    }

    /// B 按序接受一条消息。B 的接受顺序与应用就绪顺序一致，
    /// 因此取最早的未决就绪时间；未登记就绪时间的消息不计入延迟。
    pub(crate) fn record_delivery(&mut self, now: SimTime) {
        self.c.received_msg_count += 1;
        if let Some(ready) = self.ready_at.pop_front() {
            self.c.total_delay = self.c.total_delay.after(now.since(ready));
        }
    }
}

/// 仿真结束后的报告（派生指标在此计算）
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    #[serde(flatten)]
    pub counters: Counters,
    /// 信道丢弃的分组数（双向）
    pub lost_pkts: u64,
    /// 信道损坏的分组数（双向）
    pub corrupted_pkts: u64,
    pub elapsed_ns: u64,
    pub avg_ttc_ns: Option<f64>,
    pub avg_delay_ns: Option<f64>,
    pub throughput_msgs_per_s: Option<f64>,
    pub retransmission_ratio: Option<f64>,
    pub corruption_ratio: Option<f64>,
}

fn ratio(num: f64, den: u64) -> Option<f64> {
    (den > 0).then(|| num / den as f64)
}

impl Report {
    pub fn new(counters: Counters, lost_pkts: u64, corrupted_pkts: u64, elapsed: SimTime) -> Self {
        let secs = elapsed.as_secs_f64();
        Self {
            counters,
            lost_pkts,
            corrupted_pkts,
            elapsed_ns: elapsed.0,
            avg_ttc_ns: ratio(counters.total_ttc.0 as f64, counters.comm_pkt_count),
            avg_delay_ns: ratio(counters.total_delay.0 as f64, counters.received_msg_count),
            throughput_msgs_per_s: (secs > 0.0).then(|| counters.received_msg_count as f64 / secs),
            retransmission_ratio: ratio(counters.rxmt_count as f64, counters.tx_pkt_count),
            corruption_ratio: ratio(counters.corrupt_pkt_count as f64, counters.rx_pkt_count),
        }
    }

    /// 单行 `key=value` 摘要
    pub fn summary_line(&self) -> String {
        let opt = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |x| format!("{x:.3}"));
        let c = &self.counters;
        format!(
            "done @ {}ns, sent={}, rxmt={}, received={}, corrupt={}, acked={}, lost={}, corrupted={}, avg_ttc_ns={}, avg_delay_ns={}, throughput={}",
            self.elapsed_ns,
            c.tx_pkt_count,
            c.rxmt_count,
            c.received_msg_count,
            c.corrupt_pkt_count,
            c.comm_pkt_count,
            self.lost_pkts,
            self.corrupted_pkts,
            opt(self.avg_ttc_ns),
            opt(self.avg_delay_ns),
            opt(self.throughput_msgs_per_s),
        )
    }
}
