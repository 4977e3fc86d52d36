//! Go-Back-N 接收方（实体 B）
//!
//! 只接受序号等于 `expect_seq_num` 且未损坏的分组；其余分组一律丢弃，
//! 并重发最近一次的累计 ACK。接收方不缓存乱序分组。

use tracing::debug;

use super::config::GbnConfig;
use super::packet::{Message, Packet};
use super::port::ChannelSink;
use super::seq::SeqSpace;
use super::stats::Statistics;
use crate::sim::SimTime;

/// 处理一个到达 B 的分组的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arrival {
    /// 校验和不符
    Corrupt,
    /// 未损坏但不是期望的序号（重复或乱序）
    OutOfOrder { seq: u32, expected: u32 },
    /// 按序接受，载荷上交应用层
    Accepted { seq: u32, message: Message },
}

#[derive(Debug)]
pub struct ReceiverState<C> {
    cfg: GbnConfig,
    seq: SeqSpace,
    /// 唯一会被接受的序号
    expect_seq_num: u32,
    /// 最近发出的确认号
    last_ack_num: u32,
    channel: C,
}

impl<C: ChannelSink> ReceiverState<C> {
    pub fn new(cfg: GbnConfig, channel: C) -> Self {
        let seq = cfg.seq_space();
        Self {
            // 尚未接受任何分组时，确认号为 0 之前的序号；发送方会把它当作窗口外 ACK
            last_ack_num: seq.limit() - 1,
            expect_seq_num: 0,
            cfg,
            seq,
            channel,
        }
    }

    pub fn expect_seq_num(&self) -> u32 {
        self.expect_seq_num
    }

    pub fn last_ack_num(&self) -> u32 {
        self.last_ack_num
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    fn send_ack(&mut self) {
        self.channel
            .send(Packet::ack(self.last_ack_num, self.cfg.payload_size));
    }

    #[tracing::instrument(level = "debug", skip_all, fields(expect = self.expect_seq_num))]
    pub fn on_packet_arrival(&mut self, pkt: Packet, now: SimTime, stats: &mut Statistics) -> Arrival {
        stats.record_arrival();

        // 长度不符的分组同样视为损坏
        if pkt.is_corrupt() || pkt.payload().len() != self.cfg.payload_size {
            stats.record_corrupt();
            debug!(ack = self.last_ack_num, "分组损坏，重发上一个 ACK");
            self.send_ack();
            return Arrival::Corrupt;
        }

        let seq = pkt.seqnum();
        if seq != self.expect_seq_num {
            debug!(seq, ack = self.last_ack_num, "乱序或重复分组，重发上一个 ACK");
            self.send_ack();
            return Arrival::OutOfOrder {
                seq,
                expected: self.expect_seq_num,
            };
        }

        let message = Message::from_payload(pkt.payload);
        stats.record_delivery(now);
        self.last_ack_num = self.expect_seq_num;
        self.expect_seq_num = self.seq.advance(self.expect_seq_num);
        self.send_ack();

        debug!(seq, next_expect = self.expect_seq_num, "按序接受");
        Arrival::Accepted { seq, message }
    }
}
