use std::env;
use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::utils::mask_secret;

pub const DEFAULT_TOKEN_URL: &str = "https://api-int.uscis.gov/oauth/accesstoken";
pub const DEFAULT_CASE_STATUS_URL: &str = "https://api-int.uscis.gov/case-status";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// OAuth2 客户端凭据，Debug 输出不暴露完整 secret
#[derive(Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &mask_secret(&self.client_secret))
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub credentials: ClientCredentials,
    pub token_url: String,
    pub case_status_url: String,
    pub request_timeout_secs: u64,
    pub static_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_source(|key| env::var(key).ok())
    }

    /// 从任意键值来源构建配置，空字符串视为未设置
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        // 凭据必须由外部提供，没有内置默认值
        let credentials = ClientCredentials {
            client_id: required("USCIS_CLIENT_ID")?,
            client_secret: required("USCIS_CLIENT_SECRET")?,
        };

        let server_port = match get("PORT") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid { key: "PORT", value })?,
            None => 3000,
        };
        let request_timeout_secs = match get("REQUEST_TIMEOUT_SECS") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                key: "REQUEST_TIMEOUT_SECS",
                value,
            })?,
            None => 30,
        };

        Ok(Config {
            server_host: get("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            server_port,
            credentials,
            token_url: get("USCIS_TOKEN_URL").unwrap_or_else(|| DEFAULT_TOKEN_URL.into()),
            case_status_url: get("USCIS_CASE_STATUS_URL")
                .unwrap_or_else(|| DEFAULT_CASE_STATUS_URL.into()),
            request_timeout_secs,
            static_dir: get("STATIC_DIR").unwrap_or_else(|| "public".into()),
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
