//! 不可靠信道
//!
//! 双向信道，按概率丢弃或损坏分组，并为每个分组计算到达时间。
//! 分组以值传入信道，损坏只作用于在途副本，不影响发送方缓存中的分组。

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use super::id::EntityId;
use super::stats::ChannelStats;
use crate::gbn::Packet;
use crate::sim::{ScenarioSpec, SimTime};

/// 损坏时写入序号/确认号的值
pub const GARBLED_NUM: u32 = 999_999;

#[derive(Debug, Clone)]
pub struct ChannelConfig {
    pub loss_prob: f64,
    pub corrupt_prob: f64,
    /// 最小单向时延
    pub delay: SimTime,
    /// 均匀随机抖动上限
    pub jitter: SimTime,
    /// 允许同方向分组相互超越
    pub reorder: bool,
    pub seed: u64,
}

impl ChannelConfig {
    pub fn from_scenario(spec: &ScenarioSpec) -> Self {
        Self {
            loss_prob: spec.loss_prob,
            corrupt_prob: spec.corrupt_prob,
            delay: SimTime::from_micros(spec.link_delay_us),
            jitter: SimTime::from_micros(spec.link_jitter_us),
            reorder: spec.reorder,
            seed: spec.seed,
        }
    }
}

/// 一次发送的结果
#[derive(Debug)]
pub enum Transit {
    Lost,
    Deliver {
        at: SimTime,
        pkt: Packet,
        corrupted: bool,
    },
}

#[derive(Debug)]
pub struct Channel {
    cfg: ChannelConfig,
    rng: StdRng,
    /// 每个方向上最后一个分组的到达时间（用于保持 FIFO）
    last_arrival: [SimTime; 2],
    stats: ChannelStats,
}

impl Channel {
    pub fn new(cfg: ChannelConfig) -> Self {
        let rng = StdRng::seed_from_u64(cfg.seed);
        Self {
            cfg,
            rng,
            last_arrival: [SimTime::ZERO; 2],
            stats: ChannelStats::default(),
        }
    }

    pub fn stats(&self) -> &ChannelStats {
        &self.stats
    }

    /// 把 `from` 发出的分组送入信道
    pub fn transmit(&mut self, from: EntityId, mut pkt: Packet, now: SimTime) -> Transit {
        if self.rng.gen_bool(self.cfg.loss_prob) {
            self.stats.record_lost(from);
            warn!(?from, seq = pkt.seqnum(), ack = pkt.acknum(), "信道丢包");
            return Transit::Lost;
        }

        let corrupted = self.rng.gen_bool(self.cfg.corrupt_prob);
        if corrupted {
            self.corrupt(&mut pkt);
            self.stats.record_corrupted(from);
            warn!(?from, ?pkt, "信道损坏分组");
        }

        let jitter = if self.cfg.jitter > SimTime::ZERO {
            SimTime(self.rng.gen_range(0..=self.cfg.jitter.0))
        } else {
            SimTime::ZERO
        };
        let at = if self.cfg.reorder {
            now.after(self.cfg.delay).after(jitter)
        } else {
            // 不早于同方向上一个分组的到达时间
            let last = &mut self.last_arrival[from.index()];
            let at = now.max(*last).after(self.cfg.delay).after(jitter);
            *last = at;
            at
        };

        debug!(?from, ?at, corrupted, "分组进入信道");
        Transit::Deliver { at, pkt, corrupted }
    }

    // 75% 改写载荷首字节，12.5% 改写序号，12.5% 改写确认号
    fn corrupt(&mut self, pkt: &mut Packet) {
        let x: f64 = self.rng.gen_range(0.0..1.0);
        if x < 0.75 {
            if let Some(b) = pkt.payload.first_mut() {
                *b = !*b;
            }
        } else if x < 0.875 {
            pkt.seqnum = GARBLED_NUM;
        } else {
            pkt.acknum = GARBLED_NUM;
        }
    }
}
