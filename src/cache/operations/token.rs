use std::sync::RwLock;

use crate::cache::models::token::CachedToken;

/// 单一凭据的令牌缓存
///
/// 锁只保护读写本身，不会跨越网络请求持有。两个并发的缓存未命中会各自
/// 去上游换取令牌，最后写入的那个生效。
#[derive(Debug, Default)]
pub struct TokenCache {
    current: RwLock<Option<CachedToken>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取在 now 时刻仍然有效的令牌
    pub fn get_valid(&self, now: i64) -> Option<String> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        guard
            .as_ref()
            .filter(|cached| cached.is_valid_at(now))
            .map(|cached| cached.token.clone())
    }

    /// 覆盖缓存中的令牌
    pub fn store(&self, token: CachedToken) {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(token);
    }

    pub fn snapshot(&self) -> Option<CachedToken> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn clear(&self) {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }
}
