//! Utility functions for string handling and date formatting.
//!
//! This module provides helper functions used throughout the application:
//! - String truncation for logging upstream bodies
//! - Capitalization for category badges
//! - Markdown escaping for untrusted upstream text
//! - Publication date formatting with a fixed fallback

use chrono::{DateTime, Utc};

/// Shown when a publication timestamp cannot be parsed.
pub const UNKNOWN_DATE: &str = "Unknown date";

/// Truncate a string for logging purposes.
///
/// Long strings are cut after `max` characters with an ellipsis and byte count
/// indicator appended. Cuts always land on a character boundary.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Capitalize the first character of a string.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(upcase("technology"), "Technology");
/// assert_eq!(upcase(""), "");
/// ```
pub fn upcase(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
    }
}

/// Backslash-escape characters that Markdown would otherwise interpret.
///
/// Upstream titles and descriptions are free text; this keeps a stray `*` or
/// `]` from turning into emphasis or breaking a link, and a leading `#` or
/// `1.` from turning into a heading or list. Line breaks become spaces.
pub fn escape_markdown(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    if s.starts_with(['#', '-', '+']) {
        out.push('\\');
    }
    let leading_digits = s.chars().take_while(|c| c.is_ascii_digit()).count();
    for (i, c) in s.chars().enumerate() {
        if matches!(c, '\\' | '`' | '*' | '_' | '[' | ']' | '<' | '>' | '&' | '|')
            || (leading_digits > 0 && i == leading_digits && matches!(c, '.' | ')'))
        {
            out.push('\\');
        }
        match c {
            '\r' | '\n' => out.push(' '),
            _ => out.push(c),
        }
    }
    out
}

fn parse_published(published_at: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(published_at)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Long form used on the article page, e.g. `July 27, 2024 at 03:04 PM`.
pub fn format_published(published_at: &str) -> String {
    parse_published(published_at)
        .map(|dt| dt.format("%B %-d, %Y at %I:%M %p").to_string())
        .unwrap_or_else(|| UNKNOWN_DATE.to_string())
}

/// Short form used on cards, e.g. `Jul 27, 2024`.
pub fn format_published_short(published_at: &str) -> String {
    parse_published(published_at)
        .map(|dt| dt.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| UNKNOWN_DATE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte() {
        let s = "éééé";
        assert_eq!(truncate_for_log(s, 2), "éé…(+4 bytes)");
    }

    #[test]
    fn test_upcase() {
        assert_eq!(upcase("hello"), "Hello");
        assert_eq!(upcase("world"), "World");
        assert_eq!(upcase(""), "");
        assert_eq!(upcase("a"), "A");
    }

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("plain words"), "plain words");
        assert_eq!(escape_markdown("[Removed]"), "\\[Removed\\]");
        assert_eq!(escape_markdown("*bold* <b>"), "\\*bold\\* \\<b\\>");
        assert_eq!(escape_markdown("1. Lead"), "1\\. Lead");
        assert_eq!(escape_markdown("# Not a heading"), "\\# Not a heading");
        assert_eq!(escape_markdown("Wow! 3.5% up."), "Wow! 3.5% up.");
        assert_eq!(escape_markdown("two\nlines"), "two lines");
    }

    #[test]
    fn test_format_published() {
        assert_eq!(
            format_published("2024-07-27T15:04:00Z"),
            "July 27, 2024 at 03:04 PM"
        );
        assert_eq!(format_published_short("2024-07-27T15:04:00Z"), "Jul 27, 2024");
    }

    #[test]
    fn test_format_published_offset_normalized_to_utc() {
        assert_eq!(
            format_published("2024-07-27T10:04:00-05:00"),
            "July 27, 2024 at 03:04 PM"
        );
    }

    #[test]
    fn test_format_published_unparseable() {
        assert_eq!(format_published("yesterday"), UNKNOWN_DATE);
        assert_eq!(format_published_short(""), UNKNOWN_DATE);
    }
}
