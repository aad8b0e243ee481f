//! Search and pagination value types shared by repositories and services.

use serde::Serialize;

use crate::domain::Post;

pub const DEFAULT_PUBLIC_PER_PAGE: u64 = 12;
pub const DEFAULT_ADMIN_PER_PAGE: u64 = 15;
pub const MAX_PER_PAGE: u64 = 100;
/// Keeps `offset()` within a Postgres `BIGINT` at any page size.
pub const MAX_PAGE: u64 = i64::MAX as u64 / MAX_PER_PAGE;

/// A 1-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

impl PageRequest {
    /// Clamp to `1 <= page <= MAX_PAGE` and `1 <= per_page <= 100`.
    pub fn new(page: Option<u64>, per_page: Option<u64>, default_per_page: u64) -> Self {
        Self {
            page: page.unwrap_or(1).clamp(1, MAX_PAGE),
            per_page: per_page
                .unwrap_or(default_per_page)
                .clamp(1, MAX_PER_PAGE),
        }
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }
}

/// Filters for the public post listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSearch {
    pub query: Option<String>,
    pub category_slug: Option<String>,
    pub page: PageRequest,
}

impl PostSearch {
    pub fn new(query: Option<String>, category_slug: Option<String>, page: PageRequest) -> Self {
        Self {
            query,
            category_slug,
            page,
        }
    }

    /// Trimmed search text, `None` when blank.
    pub fn term(&self) -> Option<&str> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }

    pub fn category(&self) -> Option<&str> {
        self.category_slug
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// Case-insensitive substring match over title, content and excerpt.
pub fn matches_term(post: &Post, term: &str) -> bool {
    let needle = term.to_lowercase();
    post.title.to_lowercase().contains(&needle)
        || post.content.to_lowercase().contains(&needle)
        || post
            .excerpt
            .as_deref()
            .is_some_and(|e| e.to_lowercase().contains(&needle))
}

/// One page of results plus the totals needed to render pagination links.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub current_page: u64,
    pub per_page: u64,
    pub total: u64,
    pub last_page: u64,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, page: PageRequest, total: u64) -> Self {
        Self {
            data,
            current_page: page.page,
            per_page: page.per_page,
            total,
            last_page: total.div_ceil(page.per_page).max(1),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            current_page: self.current_page,
            per_page: self.per_page,
            total: self.total,
            last_page: self.last_page,
        }
    }
}
