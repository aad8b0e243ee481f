//! Plain-text helpers for rich-text post bodies.

use std::sync::LazyLock;

use regex::Regex;

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern is valid"));

/// Remove markup tags, keeping the text between them.
pub fn strip_tags(html: &str) -> String {
    TAG.replace_all(html, "").into_owned()
}

/// First `max` characters of `text` (character-based, never splits a code point).
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Truncate to `max` characters and append `...` when something was cut.
pub fn limit(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    format!("{}...", truncate_chars(text, max).trim_end())
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tags() {
        assert_eq!(
            strip_tags("<p>Hello <strong>world</strong></p>\n<p>Again</p>"),
            "Hello world\nAgain"
        );
        assert_eq!(strip_tags("<img src=\"a.png\"\n alt=\"x\">caption"), "caption");
        assert_eq!(strip_tags("no markup"), "no markup");
    }

    #[test]
    fn test_truncate_chars_is_char_based() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("বাংলা", 2), "বা");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn test_limit_appends_ellipsis_only_when_cut() {
        assert_eq!(limit("short", 160), "short");
        assert_eq!(limit("hello world", 6), "hello...");
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("  one two\nthree  "), 3);
        assert_eq!(word_count(""), 0);
    }
}
