//! 标识符类型
//!
//! 定义通信双方的标识。

use serde::{Deserialize, Serialize};

/// 通信实体：A 为发送方，B 为接收方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityId {
    A,
    B,
}

impl EntityId {
    /// 对端实体
    pub fn peer(self) -> EntityId {
        match self {
            EntityId::A => EntityId::B,
            EntityId::B => EntityId::A,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            EntityId::A => 0,
            EntityId::B => 1,
        }
    }
}
