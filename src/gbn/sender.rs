//! Go-Back-N 发送方（实体 A）
//!
//! 维护发送窗口 `[tx_base, next_seq_num)`，缓存所有未确认分组以便重传：
//! - 窗口有空位时为新消息分配序号并立即发送；窗口空 -> 非空时启动定时器
//! - ACK 为累计确认：确认号落在未确认区间内才推进 `tx_base`，否则原样忽略
//! - 超时后按序号顺序重传全部未确认分组（"回退 N"），并重启定时器
//!
//! 本模块只维护状态；分组发送与定时器通过构造时注入的能力接口完成。

use std::collections::VecDeque;

use tracing::{debug, trace, warn};

use super::config::GbnConfig;
use super::error::{MessageError, SendError};
use super::packet::{Message, Packet};
use super::port::{ChannelSink, TimerControl};
use super::seq::SeqSpace;
use super::stats::Statistics;
use crate::sim::SimTime;

/// 窗口是否还有空位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SenderPhase {
    Idle,
    WindowFull,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Stopped,
    Running,
}

/// 处理一个到达 A 的分组的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckOutcome {
    /// 校验和不符，丢弃
    Corrupt,
    /// 重复或窗口外的 ACK，无副作用
    Ignored { ack: u32 },
    /// 窗口前移，释放了 `released` 个分组
    Advanced { ack: u32, released: u32 },
}

/// 窗口中的一个未确认分组
#[derive(Debug)]
struct InFlight {
    pkt: Packet,
    first_sent_at: SimTime,
}

/// 发送方状态。字段只能通过事件处理方法改变。
#[derive(Debug)]
pub struct SenderState<C, T> {
    cfg: GbnConfig,
    seq: SeqSpace,
    /// 最早未确认分组的序号（窗口左沿）
    tx_base: u32,
    /// 下一个新分组的序号
    next_seq_num: u32,
    /// 序号 `[tx_base, next_seq_num)` 的分组，队首为 `tx_base`
    buffer: VecDeque<InFlight>,
    timer_state: TimerState,
    channel: C,
    timer: T,
}

impl<C: ChannelSink, T: TimerControl> SenderState<C, T> {
    pub fn new(cfg: GbnConfig, channel: C, timer: T) -> Self {
        let seq = cfg.seq_space();
        Self {
            buffer: VecDeque::new(),
            cfg,
            seq,
            tx_base: 0,
            next_seq_num: 0,
            timer_state: TimerState::Stopped,
            channel,
            timer,
        }
    }

    pub fn config(&self) -> &GbnConfig {
        &self.cfg
    }

    pub fn tx_base(&self) -> u32 {
        self.tx_base
    }

    pub fn next_seq_num(&self) -> u32 {
        self.next_seq_num
    }

    /// 未确认分组数
    pub fn in_flight(&self) -> usize {
        self.buffer.len()
    }

    pub fn phase(&self) -> SenderPhase {
        if self.seq.is_within_window(self.tx_base, self.next_seq_num) {
            SenderPhase::Idle
        } else {
            SenderPhase::WindowFull
        }
    }

    pub fn timer_state(&self) -> TimerState {
        self.timer_state
    }

    /// 未确认分组的序号（升序）
    pub fn outstanding(&self) -> impl Iterator<Item = u32> + '_ {
        self.buffer.iter().map(|e| e.pkt.seqnum())
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    fn start_timer(&mut self) {
        self.timer.start(self.cfg.timeout);
        self.timer_state = TimerState::Running;
    }

    fn stop_timer(&mut self) {
        self.timer.stop();
        self.timer_state = TimerState::Stopped;
    }

    /// `s` 是否落在未确认区间 `[tx_base, next_seq_num)`
    fn is_outstanding(&self, s: u32) -> bool {
        s < self.seq.limit()
            && self.seq.offset(self.tx_base, s) < self.seq.offset(self.tx_base, self.next_seq_num)
    }

    /// 应用层有新消息。返回分配给它的序号；窗口已满时把消息交还给调用方。
    #[tracing::instrument(level = "debug", skip_all, fields(base = self.tx_base, next = self.next_seq_num))]
    pub fn on_message_ready(
        &mut self,
        msg: Message,
        now: SimTime,
        stats: &mut Statistics,
    ) -> Result<u32, SendError> {
        if msg.len() != self.cfg.payload_size {
            return Err(MessageError::PayloadSize {
                expected: self.cfg.payload_size,
                actual: msg.len(),
            }
            .into());
        }
        if !self.seq.is_within_window(self.tx_base, self.next_seq_num) {
            debug!("窗口已满，拒绝新消息");
            return Err(SendError::WindowFull {
                base: self.tx_base,
                next: self.next_seq_num,
                message: msg,
            });
        }

        let seqnum = self.next_seq_num;
        let pkt = Packet::data(seqnum, &msg);
        let was_empty = self.tx_base == self.next_seq_num;

        self.buffer.push_back(InFlight {
            pkt: pkt.clone(),
            first_sent_at: now,
        });
        self.channel.send(pkt);
        stats.record_packet_sent();
        if was_empty {
            self.start_timer();
        }
        self.next_seq_num = self.seq.advance(seqnum);

        debug!(seq = seqnum, in_flight = self.buffer.len(), "发送数据分组");
        trace!(window = ?self.seq.describe_window(self.tx_base), "当前窗口");
        Ok(seqnum)
    }

    /// 来自 B 的分组（ACK）到达
    #[tracing::instrument(level = "debug", skip_all, fields(base = self.tx_base, next = self.next_seq_num))]
    pub fn on_packet_arrival(&mut self, pkt: Packet, now: SimTime, stats: &mut Statistics) -> AckOutcome {
        if pkt.is_corrupt() {
            warn!(ack = pkt.acknum(), "收到损坏的 ACK，丢弃");
            stats.record_corrupt_ack();
            return AckOutcome::Corrupt;
        }

        let ack = pkt.acknum();
        if !self.is_outstanding(ack) {
            debug!(ack, "重复或窗口外的 ACK，忽略");
            return AckOutcome::Ignored { ack };
        }

        let released = self.seq.offset(self.tx_base, ack) + 1;
        for _ in 0..released {
            if let Some(entry) = self.buffer.pop_front() {
                stats.record_acked(entry.first_sent_at, now);
            }
        }
        self.tx_base = self.seq.advance(ack);

        if self.tx_base == self.next_seq_num {
            self.stop_timer();
        } else {
            // 每个新的累计 ACK 都重置定时器
            self.start_timer();
        }

        debug!(ack, released, in_flight = self.buffer.len(), "累计确认，窗口前移");
        trace!(window = ?self.seq.describe_window(self.tx_base), "当前窗口");
        AckOutcome::Advanced { ack, released }
    }

    /// 定时器超时：按序重传 `[tx_base, next_seq_num)` 中的全部分组。返回重传数。
    #[tracing::instrument(level = "debug", skip_all, fields(base = self.tx_base, next = self.next_seq_num))]
    pub fn on_timer_interrupt(&mut self, _now: SimTime, stats: &mut Statistics) -> u32 {
        self.timer_state = TimerState::Stopped;
        if self.buffer.is_empty() {
            debug!("窗口为空，忽略超时");
            return 0;
        }

        for entry in &self.buffer {
            self.channel.send(entry.pkt.clone());
        }
        let n = self.buffer.len() as u32;
        stats.record_retransmits(n as u64);
        self.start_timer();

        warn!(retransmitted = n, "超时，回退重传整个窗口");
        n
    }
}
