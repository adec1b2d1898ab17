use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::AppError;

static RECEIPT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{3}[0-9]{10}$").expect("valid receipt pattern"));

/// 已通过格式校验的受理号：3 个大写字母 + 10 位数字
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptNumber(String);

impl ReceiptNumber {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        if RECEIPT_PATTERN.is_match(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(AppError::Validation(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReceiptNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
