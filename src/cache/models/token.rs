use serde::{Deserialize, Serialize};

/// 访问令牌缓存数据模型
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CachedToken {
    pub token: String,
    pub expires_at: i64, // Unix 毫秒时间戳，写入时已减去安全余量
}

impl CachedToken {
    /// 只有 now 严格早于 expires_at 时令牌才可用
    pub fn is_valid_at(&self, now: i64) -> bool {
        now < self.expires_at
    }
}
