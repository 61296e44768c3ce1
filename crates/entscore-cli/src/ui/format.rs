//! Formatting utilities for CLI output.

/// Truncate a string to at most `max_len` characters, ending in `...`.
///
/// ```
/// use entscore_cli::ui::format::truncate_str;
///
/// assert_eq!(truncate_str("doc-1", 10), "doc-1");
/// assert_eq!(truncate_str("pubmed-000123", 8), "pubme...");
/// ```
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    if max_len <= 3 {
        return ".".repeat(max_len);
    }
    let head: String = s.chars().take(max_len - 3).collect();
    format!("{}...", head)
}

/// Format a number with thousands separators.
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}
