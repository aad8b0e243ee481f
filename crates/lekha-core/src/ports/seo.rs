//! SEO assistant port.

use async_trait::async_trait;

use crate::seo::SeoSuggestion;

/// Produces SEO suggestions for a post.
///
/// Implementations never fail: any provider problem degrades to
/// [`crate::seo::fallback_suggestion`].
#[async_trait]
pub trait SeoAssistant: Send + Sync {
    async fn generate(&self, title: &str, content: &str) -> SeoSuggestion;
}
