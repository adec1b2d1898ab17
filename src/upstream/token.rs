use serde::{Deserialize, Deserializer};
use tracing::{debug, error, info};

use crate::cache::{CachedToken, TokenCache};
use crate::config::ClientCredentials;
use crate::error::AuthError;
use crate::utils::{mask_secret, now_millis, token_preview};

/// 上游未给出有效期时的默认值（秒）
pub const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;
/// 写入缓存时从有效期中扣除的安全余量（毫秒）
pub const SAFETY_MARGIN_MS: i64 = 60_000;

/// 令牌端点响应
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub expires_in: Option<i64>,
}

// 部分网关把 expires_in 作为字符串返回
fn lenient_seconds<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Seconds {
        Integer(i64),
        Float(f64),
        Text(String),
    }

    Ok(match Option::<Seconds>::deserialize(deserializer)? {
        Some(Seconds::Integer(secs)) => Some(secs),
        Some(Seconds::Float(secs)) => Some(secs as i64),
        Some(Seconds::Text(text)) => text.trim().parse().ok(),
        None => None,
    })
}

impl TokenResponse {
    /// 缓存过期时间；expires_in 缺失或为 0 时按 3600 秒计算
    pub fn expires_at(&self, now: i64) -> i64 {
        let expires_in = self
            .expires_in
            .filter(|secs| *secs != 0)
            .unwrap_or(DEFAULT_EXPIRES_IN_SECS);
        // expires_in 由上游控制，按饱和运算处理
        now.saturating_add(expires_in.saturating_mul(1000))
            .saturating_sub(SAFETY_MARGIN_MS)
    }
}

/// OAuth2 client-credentials 令牌提供者
///
/// 缓存命中直接返回；未命中时向令牌端点换取新令牌并写回缓存。
/// 不做重试，也不会退回使用已过期的令牌。
pub struct TokenProvider {
    http: reqwest::Client,
    token_url: String,
    credentials: ClientCredentials,
    cache: TokenCache,
}

impl TokenProvider {
    pub fn new(http: reqwest::Client, token_url: String, credentials: ClientCredentials) -> Self {
        Self {
            http,
            token_url,
            credentials,
            cache: TokenCache::new(),
        }
    }

    pub fn cache(&self) -> &TokenCache {
        &self.cache
    }

    pub async fn access_token(&self) -> Result<String, AuthError> {
        let now = now_millis();
        if let Some(token) = self.cache.get_valid(now) {
            debug!("Using cached token");
            return Ok(token);
        }

        debug!(
            url = %self.token_url,
            client_id = %self.credentials.client_id,
            client_secret = %mask_secret(&self.credentials.client_secret),
            "Requesting new access token"
        );

        let result = self.exchange().await;
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                error!(url = %self.token_url, "Token request failed: {}", e);
                return Err(e);
            }
        };

        let expires_at = response.expires_at(now);
        info!(
            token = %token_preview(&response.access_token),
            token_type = response.token_type.as_deref().unwrap_or("unknown"),
            expires_in = ?response.expires_in,
            "Access token received"
        );

        self.cache.store(CachedToken {
            token: response.access_token.clone(),
            expires_at,
        });
        Ok(response.access_token)
    }

    async fn exchange(&self) -> Result<TokenResponse, AuthError> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(AuthError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<no body>"));
            return Err(AuthError::Rejected { status, body });
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))
    }
}
