//! 序号空间运算
//!
//! 序号在 `[0, limit)` 内回绕。窗口成员测试要求 `limit >= 2 * window`，
//! 否则新旧序号在窗口内无法区分。

use super::error::ConfigError;

/// 有界、回绕的序号空间，以及固定大小的窗口。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeqSpace {
    pub(crate) limit: u32,
    pub(crate) window: u32,
}

impl SeqSpace {
    pub fn new(limit: u32, window: u32) -> Result<Self, ConfigError> {
        if window == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        if (limit as u64) < 2 * window as u64 {
            return Err(ConfigError::SeqSpaceTooSmall { limit, window });
        }
        Ok(Self { limit, window })
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn window(&self) -> u32 {
        self.window
    }

    /// `(n + 1) mod limit`
    pub fn advance(&self, n: u32) -> u32 {
        ((n as u64 + 1) % self.limit as u64) as u32
    }

    /// 从 `base` 向前数到 `i` 的距离（模 limit）
    pub fn offset(&self, base: u32, i: u32) -> u32 {
        let limit = self.limit as u64;
        ((i as u64 % limit + limit - base as u64 % limit) % limit) as u32
    }

    /// `i` 是否落在以 `base` 开始、长度为 window 的窗口内（考虑回绕）。
    ///
    /// 两个分支分别对应 `i` 在 `base` 右侧、以及窗口跨过 `limit` 后 `i` 回到左侧。
    /// 序号空间之外的值永远不在窗口内。
    pub fn is_within_window(&self, base: u32, i: u32) -> bool {
        if i >= self.limit {
            return false;
        }
        let (base, i) = (base as u64, i as u64);
        let end = base + self.window as u64;
        let right = i >= base && i < end;
        let left = i < base && i + (self.limit as u64) < end;
        right || left
    }

    /// 窗口内的 window 个序号（按模顺序），仅用于日志
    pub fn describe_window(&self, base: u32) -> Vec<u32> {
        let mut out = Vec::with_capacity(self.window as usize);
        let mut i = base % self.limit;
        for _ in 0..self.window {
            out.push(i);
            i = self.advance(i);
        }
        out
    }
}
