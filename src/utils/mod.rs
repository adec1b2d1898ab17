use chrono::Utc;

/// 当前时间，毫秒级 Unix 时间戳
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// 日志用的 secret 掩码：只保留首尾各 3 个字符
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "***".to_string();
    }
    let head: String = chars[..3].iter().collect();
    let tail: String = chars[chars.len() - 3..].iter().collect();
    format!("{}...{}", head, tail)
}

/// 令牌预览，最多 10 个字符
pub fn token_preview(token: &str) -> String {
    let preview: String = token.chars().take(10).collect();
    format!("{}...", preview)
}
