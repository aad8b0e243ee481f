use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::CategorySummary;
use crate::text::{limit, strip_tags, word_count};

const EXCERPT_FALLBACK_CHARS: usize = 160;
const WORDS_PER_MINUTE: usize = 200;

/// Post entity - a blog article with its SEO metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub featured_image: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub focus_keyword: Option<String>,
    pub keywords: Vec<String>,
    pub og_image: Option<String>,
    pub canonical_url: Option<String>,
    pub seo_score: Option<u8>,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Live means published, with a publication time that is not in the future.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.is_published && self.published_at.is_some_and(|at| at <= now)
    }

    pub fn is_live(&self) -> bool {
        self.is_live_at(Utc::now())
    }

    /// The stored excerpt, or the first 160 characters of the plain-text body.
    pub fn excerpt_text(&self) -> String {
        match self.excerpt.as_deref().map(str::trim) {
            Some(excerpt) if !excerpt.is_empty() => excerpt.to_string(),
            _ => limit(&strip_tags(&self.content), EXCERPT_FALLBACK_CHARS),
        }
    }

    /// Estimated reading time in whole minutes, never less than one.
    pub fn reading_time(&self) -> u32 {
        let words = word_count(&strip_tags(&self.content));
        words.div_ceil(WORDS_PER_MINUTE).max(1) as u32
    }
}

/// A post ready for display, with its category summary and derived fields.
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    pub category: Option<CategorySummary>,
    pub excerpt_text: String,
    pub reading_time: u32,
}

impl PostView {
    pub fn new(post: Post, category: Option<CategorySummary>) -> Self {
        Self {
            excerpt_text: post.excerpt_text(),
            reading_time: post.reading_time(),
            post,
            category,
        }
    }
}

/// Validated field set for creating or updating a post.
///
/// `slug` and `published_at` are optional overrides; the lifecycle functions in
/// [`crate::domain::lifecycle`] compute the stored values from them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostDraft {
    pub category_id: Uuid,
    pub title: String,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: String,
    pub featured_image: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub focus_keyword: Option<String>,
    pub keywords: Vec<String>,
    pub og_image: Option<String>,
    pub canonical_url: Option<String>,
    pub seo_score: Option<u8>,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
}
