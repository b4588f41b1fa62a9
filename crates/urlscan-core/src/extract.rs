//! URL extraction from free-form chat text.

use std::sync::OnceLock;

use regex::Regex;

fn url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"https?://\S+").expect("valid regex"))
}

/// Return every `http://` / `https://` token in `text`, in order of appearance.
///
/// A match runs until the next whitespace character, so trailing punctuation
/// (`https://a.co,` or `(https://a.co)`) is kept verbatim. Matches are not
/// deduplicated, validated or canonicalized.
pub fn extract_urls(text: &str) -> Vec<String> {
    url_regex()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}
