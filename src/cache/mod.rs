// 缓存模块
// 进程内的访问令牌缓存，不做持久化

pub mod models;
pub mod operations;

pub use models::token::CachedToken;
pub use operations::token::TokenCache;
