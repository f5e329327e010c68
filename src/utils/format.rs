// src/utils/format.rs

// Describe a secret for log lines without revealing any of it
pub fn describe_secret(secret: &str) -> String {
    match secret.chars().count() {
        0 => "empty input".to_string(),
        1 => "input of 1 char".to_string(),
        n => format!("input of {} chars", n),
    }
}

// Truncate a string to at most `max_len` characters, marking the cut with "..."
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
