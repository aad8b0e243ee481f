//! Post queries (read side) and commands (write side).

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::lifecycle::{apply_post_update, prepare_post};
use crate::domain::{CategorySummary, Post, PostDraft, PostView};
use crate::error::{DomainError, RepoError};
use crate::ports::{CategoryRepository, PostRepository};
use crate::query::{PageRequest, Paginated, PostSearch};
use crate::validation::{FieldErrors, max_chars, optional_max_chars, required, slug_format};

pub const RELATED_LIMIT: u64 = 4;
pub const LATEST_LIMIT: u64 = 6;
pub const POPULAR_LIMIT: u64 = 5;
pub const SEARCH_LIMIT: u64 = 10;

/// Read-only post operations. Every post comes back with its category summary.
#[derive(Clone)]
pub struct PostQuery {
    posts: Arc<dyn PostRepository>,
    categories: Arc<dyn CategoryRepository>,
}

impl PostQuery {
    pub fn new(posts: Arc<dyn PostRepository>, categories: Arc<dyn CategoryRepository>) -> Self {
        Self { posts, categories }
    }

    /// Public listing: live posts → search → category → newest first → page.
    pub async fn paginate_published(
        &self,
        search: &PostSearch,
    ) -> Result<Paginated<PostView>, DomainError> {
        let page = self.posts.paginate_published(search, Utc::now()).await?;
        self.hydrate_page(page).await
    }

    /// Admin listing of every post, newest created first.
    pub async fn paginate_all(&self, page: PageRequest) -> Result<Paginated<PostView>, DomainError> {
        let page = self.posts.paginate_all(page).await?;
        self.hydrate_page(page).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<PostView>, DomainError> {
        let post = self.posts.find_by_id(id).await?;
        self.hydrate_one(post).await
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<PostView>, DomainError> {
        let post = self.posts.find_by_slug(slug).await?;
        self.hydrate_one(post).await
    }

    /// Like [`Self::find_by_slug`] but `None` unless the post is live.
    pub async fn find_published_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<PostView>, DomainError> {
        let now = Utc::now();
        let post = self
            .posts
            .find_by_slug(slug)
            .await?
            .filter(|p| p.is_live_at(now));
        self.hydrate_one(post).await
    }

    /// Other live posts from the same category.
    pub async fn related(&self, post: &Post, limit: u64) -> Result<Vec<PostView>, DomainError> {
        let posts = self
            .posts
            .related(post.category_id, post.id, limit, Utc::now())
            .await?;
        self.hydrate(posts).await
    }

    pub async fn latest(&self, limit: u64) -> Result<Vec<PostView>, DomainError> {
        let posts = self.posts.latest(limit, Utc::now()).await?;
        self.hydrate(posts).await
    }

    pub async fn popular(&self, limit: u64) -> Result<Vec<PostView>, DomainError> {
        let posts = self.posts.popular(limit, Utc::now()).await?;
        self.hydrate(posts).await
    }

    /// Quick search over live posts, no category filter.
    pub async fn search(&self, query: &str, limit: u64) -> Result<Vec<PostView>, DomainError> {
        let search = PostSearch::new(
            Some(query.to_string()),
            None,
            PageRequest::new(Some(1), Some(limit), limit),
        );
        Ok(self.paginate_published(&search).await?.data)
    }

    async fn hydrate_one(&self, post: Option<Post>) -> Result<Option<PostView>, DomainError> {
        match post {
            Some(post) => Ok(self.hydrate(vec![post]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn hydrate(&self, posts: Vec<Post>) -> Result<Vec<PostView>, DomainError> {
        let lookup = self.category_lookup(&posts).await?;
        Ok(posts
            .into_iter()
            .map(|p| {
                let category = lookup.get(&p.category_id).cloned();
                PostView::new(p, category)
            })
            .collect())
    }

    async fn hydrate_page(
        &self,
        page: Paginated<Post>,
    ) -> Result<Paginated<PostView>, DomainError> {
        let lookup = self.category_lookup(&page.data).await?;
        Ok(page.map(|p| {
            let category = lookup.get(&p.category_id).cloned();
            PostView::new(p, category)
        }))
    }

    async fn category_lookup(
        &self,
        posts: &[Post],
    ) -> Result<HashMap<Uuid, CategorySummary>, DomainError> {
        let mut ids: Vec<Uuid> = posts.iter().map(|p| p.category_id).collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let categories = self.categories.find_by_ids(&ids).await?;
        Ok(categories.iter().map(|c| (c.id, c.summary())).collect())
    }
}

/// Write-side post operations.
#[derive(Clone)]
pub struct PostCommand {
    posts: Arc<dyn PostRepository>,
    categories: Arc<dyn CategoryRepository>,
}

impl PostCommand {
    pub fn new(posts: Arc<dyn PostRepository>, categories: Arc<dyn CategoryRepository>) -> Self {
        Self { posts, categories }
    }

    pub async fn create(&self, draft: PostDraft) -> Result<Post, DomainError> {
        let mut errors = self.validate(&draft).await?;
        let post = match prepare_post(draft, Utc::now()) {
            Ok(post) => post,
            Err(slug_errors) => {
                errors.merge(slug_errors);
                return Err(DomainError::Validation(errors));
            }
        };
        if self.posts.slug_exists(&post.slug, None).await? {
            errors.add("slug", "The slug has already been taken.");
        }
        errors.into_result()?;

        let post = self.posts.create(post).await?;
        tracing::info!(post_id = %post.id, slug = %post.slug, "Post created");
        Ok(post)
    }

    /// Update from an explicit previous/new comparison, then re-read the row.
    pub async fn update(&self, id: Uuid, draft: PostDraft) -> Result<Post, DomainError> {
        let previous = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", id))?;

        let mut errors = self.validate(&draft).await?;
        let next = match apply_post_update(&previous, draft, Utc::now()) {
            Ok(next) => next,
            Err(slug_errors) => {
                errors.merge(slug_errors);
                return Err(DomainError::Validation(errors));
            }
        };
        if next.slug != previous.slug && self.posts.slug_exists(&next.slug, Some(id)).await? {
            errors.add("slug", "The slug has already been taken.");
        }
        errors.into_result()?;

        self.posts.update(next).await.map_err(|e| not_found(e, id))?;
        tracing::info!(post_id = %id, "Post updated");

        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", id))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        self.posts.delete(id).await.map_err(|e| not_found(e, id))?;
        tracing::info!(post_id = %id, "Post deleted");
        Ok(())
    }

    /// Best-effort counter bump; concurrent reads may race, the total converges.
    pub async fn increment_view_count(&self, id: Uuid) -> Result<(), DomainError> {
        self.posts
            .increment_view_count(id)
            .await
            .map_err(|e| not_found(e, id))
    }

    async fn validate(&self, draft: &PostDraft) -> Result<FieldErrors, DomainError> {
        let mut errors = validate_draft(draft);
        if self.categories.find_by_id(draft.category_id).await?.is_none() {
            errors.add("category_id", "The selected category is invalid.");
        }
        Ok(errors)
    }
}

fn validate_draft(draft: &PostDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();
    required(&mut errors, "title", &draft.title);
    max_chars(&mut errors, "title", &draft.title, 255);
    slug_format(&mut errors, "slug", draft.slug.as_deref());
    optional_max_chars(&mut errors, "excerpt", draft.excerpt.as_deref(), 500);
    required(&mut errors, "content", &draft.content);
    required(
        &mut errors,
        "featured_image",
        draft.featured_image.as_deref().unwrap_or_default(),
    );
    optional_max_chars(&mut errors, "featured_image", draft.featured_image.as_deref(), 500);
    optional_max_chars(&mut errors, "meta_title", draft.meta_title.as_deref(), 60);
    optional_max_chars(&mut errors, "meta_description", draft.meta_description.as_deref(), 160);
    optional_max_chars(&mut errors, "focus_keyword", draft.focus_keyword.as_deref(), 100);
    for keyword in &draft.keywords {
        max_chars(&mut errors, "keywords", keyword, 50);
    }
    optional_max_chars(&mut errors, "og_image", draft.og_image.as_deref(), 500);
    optional_max_chars(&mut errors, "canonical_url", draft.canonical_url.as_deref(), 500);
    if draft.seo_score.is_some_and(|s| s > 100) {
        errors.add("seo_score", "The seo score field must be between 0 and 100.");
    }
    errors
}

fn not_found(err: RepoError, id: Uuid) -> DomainError {
    match err {
        RepoError::NotFound => DomainError::not_found("post", id),
        other => other.into(),
    }
}
