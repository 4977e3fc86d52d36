//! GBN 仿真世界
//!
//! 持有收发双方状态机、不可靠信道、应用层消息源与统计。
//! 每个事件处理完毕后，世界取出状态机记录的分组与定时器命令，
//! 交给信道并调度对应的到达/超时事件。

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, error, info, trace};

use super::channel::{Channel, ChannelConfig, Transit};
use super::deliver_packet::DeliverPacket;
use super::id::EntityId;
use super::message_ready::MessageReady;
use super::stats::ChannelStats;
use super::timer_interrupt::TimerInterrupt;
use crate::gbn::{
    AckOutcome, Arrival, ConfigError, GbnConfig, Message, Outbox, Packet, ReceiverState, Report,
    SendError, SenderState, Statistics, TimerCommand, TimerSlot,
};
use crate::sim::{ScenarioSpec, SimTime, Simulator, World};
use crate::trace::{TraceEventKind, TraceLogger};

/// 消息源的随机种子与信道错开
const SOURCE_SEED_SALT: u64 = 0x5eed_0f_a5;

pub struct GbnWorld {
    cfg: GbnConfig,
    pub sender: SenderState<Outbox, TimerSlot>,
    pub receiver: ReceiverState<Outbox>,
    pub channel: Channel,
    pub stats: Statistics,
    pub trace: Option<TraceLogger>,
    /// B 按序上交给应用层的消息
    pub delivered: Vec<Message>,
    /// 被 A 拒绝（窗口满）等待重试的消息，保持应用顺序
    backlog: VecDeque<Message>,
    num_msgs: u64,
    msg_interval: SimTime,
    source_rng: StdRng,
    timer_generation: u64,
    last_activity: SimTime,
}

impl GbnWorld {
    pub fn new(spec: &ScenarioSpec) -> Result<Self, ConfigError> {
        let cfg = spec.validate()?;
        Ok(Self {
            sender: SenderState::new(cfg.clone(), Outbox::default(), TimerSlot::default()),
            receiver: ReceiverState::new(cfg.clone(), Outbox::default()),
            channel: Channel::new(ChannelConfig::from_scenario(spec)),
            cfg,
            stats: Statistics::default(),
            trace: None,
            delivered: Vec::new(),
            backlog: VecDeque::new(),
            num_msgs: spec.num_msgs,
            msg_interval: SimTime::from_micros(spec.msg_interval_us),
            source_rng: StdRng::seed_from_u64(spec.seed ^ SOURCE_SEED_SALT),
            timer_generation: 0,
            last_activity: SimTime::ZERO,
        })
    }

    /// 打开事件记录，并写入 meta 事件
    pub fn enable_trace(&mut self, spec: &ScenarioSpec) {
        let mut logger = TraceLogger::default();
        logger.push(
            0,
            TraceEventKind::Meta {
                window_size: self.cfg.window_size,
                limit_seqnum: self.cfg.limit_seqnum,
                payload_size: self.cfg.payload_size,
                timeout_ns: self.cfg.timeout.0,
                num_msgs: spec.num_msgs,
                loss_prob: spec.loss_prob,
                corrupt_prob: spec.corrupt_prob,
                reorder: spec.reorder,
            },
        );
        self.trace = Some(logger);
    }

    pub fn config(&self) -> &GbnConfig {
        &self.cfg
    }

    pub fn channel_stats(&self) -> &ChannelStats {
        self.channel.stats()
    }

    /// 当前定时器代数；每次启动或停止都会加一
    pub fn timer_generation(&self) -> u64 {
        self.timer_generation
    }

    pub fn backlog_len(&self) -> usize {
        self.backlog.len()
    }

    /// 所有消息都已产生，且都被 A 发出并确认
    pub fn is_complete(&self) -> bool {
        self.stats.counters().ready_msg_count == self.num_msgs
            && self.backlog.is_empty()
            && self.sender.in_flight() == 0
    }

    /// 调度第一条消息
    pub fn start(&mut self, sim: &mut Simulator) {
        if self.num_msgs > 0 {
            let gap = self.next_gap();
            sim.schedule_after(gap, MessageReady { msg: 0 });
        }
    }

    /// 读取时计算派生指标
    pub fn report(&self) -> Report {
        let ch = self.channel.stats();
        Report::new(
            self.stats.counters(),
            ch.total_lost(),
            ch.total_corrupted(),
            self.last_activity,
        )
    }

    fn record(&mut self, now: SimTime, kind: TraceEventKind) {
        if let Some(t) = &mut self.trace {
            t.push(now.0, kind);
        }
    }

    // 到达间隔在 [0, 2 * msg_interval] 内均匀分布
    fn next_gap(&mut self) -> SimTime {
        SimTime(self.source_rng.gen_range(0..=self.msg_interval.0.saturating_mul(2)))
    }

    /// 第 n 条消息的载荷：字母 'a' + n mod 26 重复填满
    fn make_message(&self, n: u64) -> Message {
        Message::filled(b'a' + (n % 26) as u8, self.cfg.payload_size)
    }

    pub(crate) fn on_message_ready(&mut self, msg: u64, sim: &mut Simulator) {
        let now = sim.now();
        self.last_activity = now;
        self.stats.record_message_ready(now);
        self.record(now, TraceEventKind::MessageReady { msg });

        let message = self.make_message(msg);
        self.backlog.push_back(message);
        self.flush_backlog(sim);

        if msg + 1 < self.num_msgs {
            let gap = self.next_gap();
            sim.schedule_after(gap, MessageReady { msg: msg + 1 });
        }
    }

    /// 分组到达 `to`
    pub fn on_packet_arrival(&mut self, pkt: Packet, to: EntityId, sim: &mut Simulator) {
        let now = sim.now();
        self.last_activity = now;
        self.record(
            now,
            TraceEventKind::Arrive {
                to,
                seq: pkt.seqnum(),
                ack: pkt.acknum(),
            },
        );

        match to {
            EntityId::B => {
                if let Arrival::Accepted { seq, message } =
                    self.receiver.on_packet_arrival(pkt, now, &mut self.stats)
                {
                    self.record(now, TraceEventKind::Accept { seq });
                    self.delivered.push(message);
                }
                let acks = self.receiver.channel_mut().take();
                for ack in acks {
                    self.record(now, TraceEventKind::SendAck { ack: ack.acknum() });
                    self.send_to_channel(ack, EntityId::B, sim);
                }
            }
            EntityId::A => {
                if let AckOutcome::Advanced { ack, released } =
                    self.sender.on_packet_arrival(pkt, now, &mut self.stats)
                {
                    self.record(now, TraceEventKind::AckAdvance { ack, released });
                }
                // 窗口可能腾出空位
                self.flush_backlog(sim);
            }
        }
    }

    pub(crate) fn on_timer_interrupt(&mut self, generation: u64, sim: &mut Simulator) {
        if generation != self.timer_generation {
            trace!(generation, current = self.timer_generation, "过期的定时器事件");
            return;
        }
        let now = sim.now();
        self.last_activity = now;
        let kind = TraceEventKind::Timeout {
            base: self.sender.tx_base(),
            next: self.sender.next_seq_num(),
            window: self.sender.outstanding().collect(),
        };
        self.record(now, kind);
        self.sender.on_timer_interrupt(now, &mut self.stats);
        self.flush_sender(sim, true);
    }

    /// 依次把积压消息交给 A，直到 A 拒绝
    fn flush_backlog(&mut self, sim: &mut Simulator) {
        let now = sim.now();
        while let Some(msg) = self.backlog.pop_front() {
            match self.sender.on_message_ready(msg, now, &mut self.stats) {
                Ok(_) => {}
                Err(SendError::WindowFull {
                    base,
                    next,
                    message,
                }) => {
                    self.backlog.push_front(message);
                    let backlog = self.backlog.len();
                    debug!(base, next, backlog, "窗口已满，消息留在积压队列");
                    self.record(now, TraceEventKind::WindowFull { base, next, backlog });
                    break;
                }
                Err(e) => {
                    // 消息由本世界按配置长度生成，长度错误只可能来自配置不一致
                    error!(error = %e, "丢弃无法发送的消息");
                    self.stats.discard_oldest_ready();
                }
            }
        }
        self.flush_sender(sim, false);
    }

    /// 取出 A 记录的分组与定时器命令并执行
    fn flush_sender(&mut self, sim: &mut Simulator, retrans: bool) {
        let now = sim.now();
        let pkts = self.sender.channel_mut().take();
        for pkt in pkts {
            self.record(
                now,
                TraceEventKind::SendData {
                    seq: pkt.seqnum(),
                    retrans,
                },
            );
            self.send_to_channel(pkt, EntityId::A, sim);
        }

        match self.sender.timer_mut().take_last() {
            Some(TimerCommand::Start(d)) => {
                self.timer_generation = self.timer_generation.wrapping_add(1);
                let deadline = now.after(d);
                sim.schedule(
                    deadline,
                    TimerInterrupt {
                        generation: self.timer_generation,
                    },
                );
                self.record(now, TraceEventKind::TimerStart { deadline_ns: deadline.0 });
            }
            Some(TimerCommand::Stop) => {
                self.timer_generation = self.timer_generation.wrapping_add(1);
                self.record(now, TraceEventKind::TimerStop);
            }
            None => {}
        }
    }

    /// 把 `from` 发出的分组交给信道；未丢失的分组按信道给出的时间到达对端
    pub fn send_to_channel(&mut self, pkt: Packet, from: EntityId, sim: &mut Simulator) {
        let now = sim.now();
        let (seq, ack) = (pkt.seqnum(), pkt.acknum());
        match self.channel.transmit(from, pkt, now) {
            Transit::Lost => self.record(now, TraceEventKind::Lost { from, seq, ack }),
            Transit::Deliver { at, pkt, corrupted } => {
                if corrupted {
                    self.record(now, TraceEventKind::Corrupted { from });
                }
                sim.schedule(
                    at,
                    DeliverPacket {
                        to: from.peer(),
                        pkt,
                    },
                );
            }
        }
    }
}

impl World for GbnWorld {
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

/// 运行一个完整场景，返回结束时的世界
#[tracing::instrument(skip(spec))]
pub fn run_scenario(spec: &ScenarioSpec, trace: bool) -> Result<GbnWorld, ConfigError> {
    let mut world = GbnWorld::new(spec)?;
    if trace {
        world.enable_trace(spec);
    }
    let mut sim = Simulator::default();
    world.start(&mut sim);
    sim.run_until(spec.until(), &mut world);

    if !world.is_complete() {
        info!(
            backlog = world.backlog_len(),
            in_flight = world.sender.in_flight(),
            "到达截止时间时传输未完成"
        );
    }
    Ok(world)
}
