//! 信道统计信息
//!
//! 按发送方向（发送实体）分别计数。

use super::id::EntityId;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ChannelStats {
    lost: [u64; 2],
    corrupted: [u64; 2],
}

impl ChannelStats {
    pub(crate) fn record_lost(&mut self, from: EntityId) {
        self.lost[from.index()] += 1;
    }

    pub(crate) fn record_corrupted(&mut self, from: EntityId) {
        self.corrupted[from.index()] += 1;
    }

    /// 从 `from` 发出后被丢弃的分组数
    pub fn lost_from(&self, from: EntityId) -> u64 {
        self.lost[from.index()]
    }

    /// 从 `from` 发出后被损坏的分组数
    pub fn corrupted_from(&self, from: EntityId) -> u64 {
        self.corrupted[from.index()]
    }

    pub fn total_lost(&self) -> u64 {
        self.lost.iter().sum()
    }

    pub fn total_corrupted(&self) -> u64 {
        self.corrupted.iter().sum()
    }
}
