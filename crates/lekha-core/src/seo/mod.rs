//! SEO suggestion bundle, its limits, and the provider-independent pieces of
//! the assistant: prompt text, response parsing and the offline heuristic.

mod fallback;
mod parse;
mod prompt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::text::{strip_tags, truncate_chars};
use crate::validation::{FieldErrors, max_chars, min_chars, required};

pub use fallback::{STOP_WORDS, extract_keywords, fallback_suggestion};
pub use parse::{parse_suggestion, strip_code_fences};
pub use prompt::build_prompt;

pub const META_TITLE_MAX: usize = 60;
pub const META_DESCRIPTION_MAX: usize = 155;
pub const EXCERPT_MAX: usize = 200;
pub const MAX_KEYWORDS: usize = 5;
pub const MAX_TIPS: usize = 5;
pub const MAX_SCORE: u8 = 100;
pub const TITLE_MAX: usize = 255;
pub const MIN_CONTENT_CHARS: usize = 50;
pub const CONTENT_PREVIEW_CHARS: usize = 2000;

/// Suggestions returned to the admin SEO panel.
///
/// `success` is true only when the bundle came from the AI provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoSuggestion {
    pub success: bool,
    pub meta_title: String,
    pub meta_description: String,
    pub focus_keyword: String,
    pub keywords: Vec<String>,
    pub excerpt: String,
    pub seo_score: u8,
    pub tips: Vec<String>,
}

impl SeoSuggestion {
    /// Enforce every length and range limit of the bundle.
    pub fn clamped(mut self) -> Self {
        self.meta_title = truncate_chars(&self.meta_title, META_TITLE_MAX);
        self.meta_description = truncate_chars(&self.meta_description, META_DESCRIPTION_MAX);
        self.excerpt = truncate_chars(&self.excerpt, EXCERPT_MAX);
        self.keywords.truncate(MAX_KEYWORDS);
        self.tips.truncate(MAX_TIPS);
        self.seo_score = self.seo_score.min(MAX_SCORE);
        self
    }
}

/// Check an SEO generation request: title 1..=255 chars, content at least 50
/// characters once markup is stripped.
pub fn validate_request(title: &str, content: &str) -> Result<(), DomainError> {
    let mut errors = FieldErrors::new();
    required(&mut errors, "title", title);
    max_chars(&mut errors, "title", title, TITLE_MAX);
    required(&mut errors, "content", content);
    if !errors.contains("content") {
        min_chars(&mut errors, "content", &strip_tags(content), MIN_CONTENT_CHARS);
    }
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_of_49_chars_is_rejected() {
        let content = "x".repeat(49);
        let err = validate_request("Getting Started", &content).unwrap_err();
        match err {
            DomainError::Validation(errors) => assert!(errors.contains("content")),
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(validate_request("Getting Started", &"x".repeat(50)).is_ok());
    }

    #[test]
    fn test_markup_does_not_count_towards_content_length() {
        let content = format!("<p><strong>{}</strong></p>", "x".repeat(45));
        assert!(validate_request("Title", &content).is_err());
    }

    #[test]
    fn test_title_limits() {
        let content = "y".repeat(60);
        assert!(validate_request("", &content).is_err());
        assert!(validate_request(&"t".repeat(256), &content).is_err());
        assert!(validate_request(&"t".repeat(255), &content).is_ok());
    }

    #[test]
    fn test_clamped_enforces_limits() {
        let s = SeoSuggestion {
            success: true,
            meta_title: "t".repeat(80),
            meta_description: "d".repeat(200),
            focus_keyword: "k".into(),
            keywords: (0..9).map(|i| i.to_string()).collect(),
            excerpt: "e".repeat(300),
            seo_score: 250,
            tips: (0..7).map(|i| i.to_string()).collect(),
        }
        .clamped();

        assert_eq!(s.meta_title.chars().count(), META_TITLE_MAX);
        assert_eq!(s.meta_description.chars().count(), META_DESCRIPTION_MAX);
        assert_eq!(s.excerpt.chars().count(), EXCERPT_MAX);
        assert_eq!(s.keywords.len(), MAX_KEYWORDS);
        assert_eq!(s.tips.len(), MAX_TIPS);
        assert_eq!(s.seo_score, 100);
    }
}
