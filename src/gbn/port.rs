//! 协议核心对外依赖的两个能力接口，以及它们的内存实现
//!
//! 状态机在构造时注入 [`ChannelSink`] 与 [`TimerControl`]。仿真世界使用
//! [`Outbox`] / [`TimerSlot`]：处理器只记录命令，事件执行完毕后由世界统一取出并调度。
//! 单元测试直接检查其中记录的命令。

use super::packet::Packet;
use crate::sim::SimTime;

/// 把分组交给（不可靠的）网络
pub trait ChannelSink {
    fn send(&mut self, pkt: Packet);
}

/// 发送方唯一的重传定时器
pub trait TimerControl {
    /// 启动定时器；已在运行时等价于重置截止时间
    fn start(&mut self, duration: SimTime);
    fn stop(&mut self);
}

/// 记录待发分组
#[derive(Debug, Default)]
pub struct Outbox {
    pkts: Vec<Packet>,
}

impl Outbox {
    pub fn packets(&self) -> &[Packet] {
        &self.pkts
    }

    pub fn take(&mut self) -> Vec<Packet> {
        std::mem::take(&mut self.pkts)
    }

    pub fn is_empty(&self) -> bool {
        self.pkts.is_empty()
    }
}

impl ChannelSink for Outbox {
    fn send(&mut self, pkt: Packet) {
        self.pkts.push(pkt);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    Start(SimTime),
    Stop,
}

/// 记录定时器命令
#[derive(Debug, Default)]
pub struct TimerSlot {
    cmds: Vec<TimerCommand>,
}

impl TimerSlot {
    pub fn commands(&self) -> &[TimerCommand] {
        &self.cmds
    }

    pub fn take(&mut self) -> Vec<TimerCommand> {
        std::mem::take(&mut self.cmds)
    }

    /// 本批命令的最终效果（后一条覆盖前一条）
    pub fn take_last(&mut self) -> Option<TimerCommand> {
        self.take().pop()
    }
}

impl TimerControl for TimerSlot {
    fn start(&mut self, duration: SimTime) {
        self.cmds.push(TimerCommand::Start(duration));
    }

    fn stop(&mut self) {
        self.cmds.push(TimerCommand::Stop);
    }
}

