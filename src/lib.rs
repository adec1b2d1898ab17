use std::sync::Arc;

use config::Config;
use upstream::{CaseStatusGateway, TokenProvider};

pub mod cache;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod router;
pub mod routes;
pub mod upstream;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub gateway: Arc<CaseStatusGateway>,
}

impl AppState {
    /// 构建共享的 HTTP 客户端、令牌提供者和网关
    pub fn new(config: Config) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        let tokens = Arc::new(TokenProvider::new(
            http.clone(),
            config.token_url.clone(),
            config.credentials.clone(),
        ));
        let gateway = Arc::new(CaseStatusGateway::new(
            http,
            config.case_status_url.clone(),
            tokens,
        ));

        Ok(Self { config, gateway })
    }
}
