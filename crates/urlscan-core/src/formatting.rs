//! Small text helpers for Telegram HTML output.

/// Escape HTML special characters for Telegram HTML parse mode.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Status line shown while the URLs of a plain message are being checked.
pub fn found_urls_status(count: usize) -> String {
    format!(
        "🔍 Found {count} URL{} to scan. Checking for threats...",
        if count == 1 { "" } else { "s" }
    )
}

/// Truncate to at most `max_chars` characters, appending `...` when cut.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let mut out = s.chars().take(max_chars).collect::<String>();
    out.push_str("...");
    out
}
