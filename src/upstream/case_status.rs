use std::sync::Arc;

use reqwest::{StatusCode, header::CONTENT_TYPE};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::error::{AppError, UpstreamError};
use crate::models::{ConnectionReport, Normalized, ReceiptNumber, normalize};
use crate::upstream::TokenProvider;
use crate::utils::token_preview;

/// 连通性测试使用的示例受理号
pub const SAMPLE_RECEIPT_NUMBER: &str = "EAC9999103403";

/// 案件状态网关：校验、取令牌、调用上游、归一化
pub struct CaseStatusGateway {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<TokenProvider>,
}

impl CaseStatusGateway {
    pub fn new(http: reqwest::Client, base_url: String, tokens: Arc<TokenProvider>) -> Self {
        Self {
            http,
            base_url,
            tokens,
        }
    }

    pub async fn case_status(&self, raw: &str) -> Result<Normalized, AppError> {
        info!("Processing request for receipt number: {}", raw);

        // 格式不对直接拒绝，不发任何网络请求
        let receipt = ReceiptNumber::parse(raw).inspect_err(|_| {
            info!("Invalid receipt number format: {}", raw);
        })?;

        let token = self.tokens.access_token().await?;
        let response = self.fetch(receipt.as_str(), &token).await.map_err(|e| {
            error!(receipt_number = %receipt, "Case status request failed: {}", e);
            AppError::Upstream(e)
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            error!(receipt_number = %receipt, "Failed to read case status body: {}", e);
            AppError::Upstream(UpstreamError::Transport(e))
        })?;

        if status == StatusCode::NOT_FOUND {
            error!(receipt_number = %receipt, status = %status, body = %text, "Case not found upstream");
            return Err(AppError::NotFound(receipt.to_string()));
        }
        if !status.is_success() {
            error!(receipt_number = %receipt, status = %status, body = %text, "Case status request rejected");
            return Err(AppError::Upstream(UpstreamError::Status { status, body: text }));
        }

        debug!(receipt_number = %receipt, status = %status, body = %text, "Case status response");

        // 非 JSON 响应按字符串交给归一化处理
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
        Ok(normalize(body))
    }

    /// 检查令牌端点和案件状态端点是否可用，结果总是以报告形式返回
    pub async fn test_connection(&self) -> ConnectionReport {
        info!("Testing connection to USCIS API");

        let token = match self.tokens.access_token().await {
            Ok(token) => token,
            Err(e) => {
                error!("Test connection failed: {}", e);
                let err = UpstreamError::from(e);
                return ConnectionReport::failed(err.to_string(), err.status(), err.details());
            }
        };

        info!("Testing case status with receipt number: {}", SAMPLE_RECEIPT_NUMBER);
        let outcome = match self.fetch(SAMPLE_RECEIPT_NUMBER, &token).await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    Ok((status, "Working correctly"))
                } else if status == StatusCode::NOT_FOUND {
                    // 404 说明端点可用，只是示例受理号不存在
                    Ok((status, "Working correctly (test receipt not found)"))
                } else {
                    let body = response.text().await.unwrap_or_default();
                    Err(UpstreamError::Status { status, body })
                }
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok((status, endpoint)) => {
                info!(status = %status, "Case status endpoint is working");
                ConnectionReport::reachable(status.as_u16(), endpoint)
            }
            Err(e) => {
                error!("Test connection failed: {}", e);
                ConnectionReport::failed(e.to_string(), e.status(), e.details())
            }
        }
    }

    async fn fetch(
        &self,
        receipt_number: &str,
        token: &str,
    ) -> Result<reqwest::Response, UpstreamError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), receipt_number);
        debug!(url = %url, authorization = %format!("Bearer {}", token_preview(token)), "Calling case status endpoint");

        self.http
            .get(&url)
            .bearer_auth(token)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(UpstreamError::Transport)
    }
}
