use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use super::{EXCERPT_MAX, MAX_KEYWORDS, META_DESCRIPTION_MAX, META_TITLE_MAX, SeoSuggestion};
use crate::text::{strip_tags, truncate_chars};

const FALLBACK_SCORE: u8 = 50;
const MIN_KEYWORD_CHARS: usize = 4;

// English only; Bangla text gets no stop-word filtering on this path.
pub const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "is", "are", "was", "were", "be", "been", "to", "of", "and", "in", "that",
    "it", "for", "on", "with", "as", "at", "by", "this", "from", "or", "you", "your", "we", "our",
];

const TIPS: [&str; 3] = [
    "Add Gemini API key for AI-powered SEO suggestions",
    "Include your focus keyword in the title",
    "Write a compelling meta description",
];

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}\s]").expect("word pattern is valid"));

/// Deterministic suggestion bundle built without any network call.
pub fn fallback_suggestion(title: &str, content: &str) -> SeoSuggestion {
    let plain = strip_tags(content);
    let keywords = extract_keywords(&plain, MAX_KEYWORDS);

    SeoSuggestion {
        success: false,
        meta_title: truncate_chars(title, META_TITLE_MAX),
        meta_description: truncate_chars(&plain, META_DESCRIPTION_MAX),
        focus_keyword: keywords.first().cloned().unwrap_or_default(),
        keywords,
        excerpt: truncate_chars(&plain, EXCERPT_MAX),
        seo_score: FALLBACK_SCORE,
        tips: TIPS.iter().map(|t| t.to_string()).collect(),
    }
}

/// Most frequent words of `plain`, skipping stop words and words of three
/// characters or fewer. Ties keep first-occurrence order.
pub fn extract_keywords(plain: &str, limit: usize) -> Vec<String> {
    let lowered = plain.to_lowercase();
    let cleaned = NON_WORD.replace_all(&lowered, "");

    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for word in cleaned.split_whitespace() {
        let count = counts.entry(word).or_insert(0);
        if *count == 0 {
            order.push(word);
        }
        *count += 1;
    }

    // stable: equal counts stay in first-seen order
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));

    order
        .into_iter()
        .filter(|w| w.chars().count() >= MIN_KEYWORD_CHARS && !STOP_WORDS.contains(w))
        .take(limit)
        .map(str::to_string)
        .collect()
}
