//! Pagination parameter types.

use serde::{Deserialize, Serialize};

/// Page-numbered pagination for recipe lists.
///
/// - `limit`: page size, 1–100, default 6
/// - `page`: ≥ 1, default 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_limit() -> u32 {
    6
}

fn default_page() -> u32 {
    1
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            page: default_page(),
        }
    }
}

impl PageRequest {
    /// Clamp `limit` to the valid range 1–100 and `page` to ≥ 1.
    ///
    /// Call after deserializing from query params to enforce bounds.
    pub fn clamped(self) -> Self {
        Self {
            limit: self.limit.clamp(1, 100),
            page: self.page.max(1),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// Offset pagination for user and subscription lists.
///
/// `limit` absent means "no cap" (the lists are small); `offset` defaults
/// to 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitOffset {
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: u64,
}

impl LimitOffset {
    /// Clamp a present `limit` to the valid range 1–100.
    pub fn clamped(self) -> Self {
        Self {
            limit: self.limit.map(|limit| limit.clamp(1, 100)),
            offset: self.offset,
        }
    }
}
