use serde::Serialize;
use serde_json::Value;

/// 上游状态码；没有拿到响应时输出 "Unknown"
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportedStatus {
    Code(u16),
    Unknown(&'static str),
}

impl From<Option<u16>> for ReportedStatus {
    fn from(status: Option<u16>) -> Self {
        match status {
            Some(code) => ReportedStatus::Code(code),
            None => ReportedStatus::Unknown("Unknown"),
        }
    }
}

/// 连通性测试结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionReport {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_status_endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub status_code: ReportedStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ConnectionReport {
    pub fn reachable(status_code: u16, endpoint: &str) -> Self {
        Self {
            success: true,
            message: "Successfully connected to USCIS API".to_string(),
            token_status: Some("Valid token obtained".to_string()),
            case_status_endpoint: Some(endpoint.to_string()),
            error: None,
            status_code: ReportedStatus::Code(status_code),
            details: None,
        }
    }

    pub fn failed(error: String, status_code: Option<u16>, details: Value) -> Self {
        Self {
            success: false,
            message: "Failed to connect to USCIS API".to_string(),
            token_status: None,
            case_status_endpoint: None,
            error: Some(error),
            status_code: status_code.into(),
            details: Some(details),
        }
    }
}
