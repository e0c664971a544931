//! Small text extraction helpers shared by the converters and commands.

use regex::Regex;

/// Extract the first capture group of `pattern` from `content`.
/// Content is trimmed before matching. Returns `None` on no match or an
/// invalid pattern.
pub fn extract_first(content: &str, pattern: &str) -> Option<String> {
    let re = Regex::new(pattern).ok()?;
    re.captures(content.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract the first capture group and parse it as a number.
pub fn extract_number(content: &str, pattern: &str) -> Option<usize> {
    extract_first(content, pattern).and_then(|s| s.parse().ok())
}

/// Truncate to at most `max` characters, for error snippets.
pub fn truncate_chars(content: &str, max: usize) -> String {
    content.chars().take(max).collect()
}
