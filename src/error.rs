use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use reqwest::StatusCode as UpstreamStatus;
use serde::Serialize;
use thiserror::Error;

/// 令牌交换失败
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("token endpoint returned {status}: {body}")]
    Rejected { status: UpstreamStatus, body: String },
    #[error("invalid token response: {0}")]
    InvalidResponse(String),
}

/// 上游调用失败（404 除外，404 单独映射为 NotFound）
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("failed to obtain access token: {0}")]
    Auth(#[from] AuthError),
    #[error("case status request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("case status endpoint returned {status}: {body}")]
    Status { status: UpstreamStatus, body: String },
}

impl UpstreamError {
    /// 上游返回的 HTTP 状态码，没有响应时为 None
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { status, .. } => Some(status.as_u16()),
            UpstreamError::Transport(e) => e.status().map(|s| s.as_u16()),
            UpstreamError::Auth(_) => None,
        }
    }

    /// 上游响应体，能解析为 JSON 时按 JSON 返回
    pub fn details(&self) -> serde_json::Value {
        match self {
            // 空响应体与没有响应体一样返回 {}
            UpstreamError::Status { body, .. } if body.trim().is_empty() => serde_json::json!({}),
            UpstreamError::Status { body, .. } => serde_json::from_str(body)
                .unwrap_or_else(|_| serde_json::Value::String(body.clone())),
            _ => serde_json::json!({}),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid receipt number format: {0}")]
    Validation(String),
    #[error("case not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Upstream(UpstreamError::Auth(e))
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // 上游细节只写日志，不返回给调用方
        let (status, error, message) = match self {
            AppError::Validation(_) => (
                StatusCode::BAD_REQUEST,
                "Invalid receipt number format",
                "Receipt number should be in the format: XXX0000000000",
            ),
            AppError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                "Case not found",
                "The receipt number you provided was not found in the USCIS system",
            ),
            AppError::Upstream(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Service error",
                "An error occurred while fetching case status",
            ),
        };

        (status, Json(ErrorResponse { error, message })).into_response()
    }
}
