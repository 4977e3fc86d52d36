//! 分组编解码
//!
//! 固定格式分组：序号、确认号、校验和、定长载荷。校验和在构造时计算并写入；
//! 传输途中的损坏由信道模拟，本模块从不修改已构造的分组。

use super::error::MessageError;

/// 不适用的序号/确认号（数据分组的 acknum、ACK 分组的 seqnum）
pub const UNUSED: u32 = u32::MAX;

/// 校验和：`seqnum + acknum + Σpayload[i]`（按 u32 回绕相加）
pub fn compute_checksum(seqnum: u32, acknum: u32, payload: &[u8]) -> u32 {
    payload
        .iter()
        .fold(seqnum.wrapping_add(acknum), |sum, &b| sum.wrapping_add(b as u32))
}

/// 应用层消息：恰好 `payload_size` 字节
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    data: Box<[u8]>,
}

impl Message {
    pub fn new(data: impl Into<Box<[u8]>>, payload_size: usize) -> Result<Self, MessageError> {
        let data = data.into();
        if data.len() != payload_size {
            return Err(MessageError::PayloadSize {
                expected: payload_size,
                actual: data.len(),
            });
        }
        Ok(Self { data })
    }

    /// 已校验长度的载荷
    pub(crate) fn from_payload(data: Box<[u8]>) -> Self {
        Self { data }
    }

    /// 用同一个字节填满的消息
    pub fn filled(byte: u8, payload_size: usize) -> Self {
        Self {
            data: vec![byte; payload_size].into_boxed_slice(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// 可传输的分组。字段仅 crate 内可写（信道用它模拟损坏）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub(crate) seqnum: u32,
    pub(crate) acknum: u32,
    pub(crate) checksum: u32,
    pub(crate) payload: Box<[u8]>,
}

impl Packet {
    pub fn new(seqnum: u32, acknum: u32, payload: impl Into<Box<[u8]>>) -> Self {
        let payload = payload.into();
        let checksum = compute_checksum(seqnum, acknum, &payload);
        Self {
            seqnum,
            acknum,
            checksum,
            payload,
        }
    }

    /// A -> B 数据分组
    pub fn data(seqnum: u32, msg: &Message) -> Self {
        Self::new(seqnum, UNUSED, msg.as_bytes())
    }

    /// B -> A 确认分组（载荷全零）
    pub fn ack(acknum: u32, payload_size: usize) -> Self {
        Self::new(UNUSED, acknum, vec![0u8; payload_size])
    }

    pub fn seqnum(&self) -> u32 {
        self.seqnum
    }

    pub fn acknum(&self) -> u32 {
        self.acknum
    }

    pub fn checksum(&self) -> u32 {
        self.checksum
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// 按当前字段重新计算的校验和
    pub fn compute_checksum(&self) -> u32 {
        compute_checksum(self.seqnum, self.acknum, &self.payload)
    }

    pub fn is_corrupt(&self) -> bool {
        self.compute_checksum() != self.checksum
    }
}
