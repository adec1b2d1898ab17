use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 统一后的案件状态响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedCaseStatus {
    pub case_status: CaseStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseStatus {
    #[serde(rename = "receiptNumber", skip_serializing_if = "Option::is_none")]
    pub receipt_number: Option<Value>,
    #[serde(rename = "formType", skip_serializing_if = "Option::is_none")]
    pub form_type: Option<Value>,
    #[serde(rename = "submittedDate", skip_serializing_if = "Option::is_none")]
    pub submitted_date: Option<Value>,
    #[serde(rename = "modifiedDate", skip_serializing_if = "Option::is_none")]
    pub modified_date: Option<Value>,
    #[serde(
        rename = "current_case_status_text_en",
        skip_serializing_if = "Option::is_none"
    )]
    pub current_status_text: Option<Value>,
    #[serde(
        rename = "current_case_status_desc_en",
        skip_serializing_if = "Option::is_none"
    )]
    pub current_status_description: Option<Value>,
    #[serde(rename = "hist_case_status", default)]
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<Value>,
    #[serde(rename = "completed_text_en", skip_serializing_if = "Option::is_none")]
    pub completed_text: Option<Value>,
}

/// 归一化结果
///
/// 上游已是目标格式时原样返回；映射失败时退回原始数据，请求本身不会因此失败。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Normalized {
    Mapped(NormalizedCaseStatus),
    AlreadyNormalized(Value),
    RawPassthrough(Value),
}

impl Normalized {
    pub fn is_passthrough(&self) -> bool {
        matches!(self, Normalized::RawPassthrough(_))
    }
}

// 同一字段在上游的不同命名，按顺序取第一个有值的
const RECEIPT_NUMBER: &[&str] = &["receiptNumber", "receipt_number"];
const FORM_TYPE: &[&str] = &["formType", "form_type", "applicationTypeCode"];
const SUBMITTED_DATE: &[&str] = &["receivedDate", "received_date", "createdDate"];
const MODIFIED_DATE: &[&str] = &["lastUpdatedDate", "last_updated_date", "updatedDate"];
const STATUS_TEXT: &[&str] = &["status", "case_status"];
const STATUS_DESCRIPTION: &[&str] = &["statusDescription", "status_description"];
const HISTORY: &[&str] = &["caseHistory", "case_history"];
const HISTORY_TEXT: &[&str] = &["description", "status_description"];

const ENVELOPE_KEY: &str = "case_status";

pub fn normalize(body: Value) -> Normalized {
    if body.get(ENVELOPE_KEY).is_some_and(is_truthy) {
        return Normalized::AlreadyNormalized(body);
    }

    match map_case_status(&body) {
        Ok(mapped) => Normalized::Mapped(mapped),
        Err(reason) => {
            tracing::warn!("Error processing upstream response, returning it unchanged: {}", reason);
            Normalized::RawPassthrough(body)
        }
    }
}

fn map_case_status(body: &Value) -> Result<NormalizedCaseStatus, String> {
    // 非对象的响应体没有可读字段，按全部缺失处理；只有 null 无法映射
    let empty = Map::new();
    let obj = match body {
        Value::Object(obj) => obj,
        Value::Null => return Err("upstream body is null".to_string()),
        _ => &empty,
    };

    let history = match HISTORY.iter().find_map(|key| obj.get(*key)) {
        Some(Value::Array(entries)) => entries
            .iter()
            .enumerate()
            .map(|(i, entry)| match entry {
                Value::Object(entry) => Ok(HistoryEntry {
                    date: entry.get("date").cloned(),
                    completed_text: first_truthy(entry, HISTORY_TEXT),
                }),
                Value::Null => Err(format!("history entry {} is null", i)),
                _ => Ok(HistoryEntry {
                    date: None,
                    completed_text: None,
                }),
            })
            .collect::<Result<Vec<_>, String>>()?,
        _ => Vec::new(),
    };

    Ok(NormalizedCaseStatus {
        case_status: CaseStatus {
            receipt_number: first_truthy(obj, RECEIPT_NUMBER),
            form_type: first_truthy(obj, FORM_TYPE),
            submitted_date: first_truthy(obj, SUBMITTED_DATE),
            modified_date: first_truthy(obj, MODIFIED_DATE),
            current_status_text: first_truthy(obj, STATUS_TEXT),
            current_status_description: first_truthy(obj, STATUS_DESCRIPTION),
            history,
        },
    })
}

/// 取第一个真值；都不是真值时返回最后一个别名对应的值（可能不存在）
fn first_truthy(obj: &Map<String, Value>, keys: &[&str]) -> Option<Value> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find(|value| is_truthy(value))
        .or_else(|| keys.last().and_then(|key| obj.get(*key)))
        .cloned()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
