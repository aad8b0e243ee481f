use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Category, Post, User};
use crate::error::RepoError;
use crate::query::{PageRequest, Paginated, PostSearch};

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn create(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Admin user repository.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository.
///
/// Methods taking `now` only ever return live posts: published, with a
/// publication time at or before `now`.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    /// Whether another post (other than `except`) already uses `slug`.
    async fn slug_exists(&self, slug: &str, except: Option<Uuid>) -> Result<bool, RepoError>;

    /// Live posts filtered by search text and category slug, newest published first.
    async fn paginate_published(
        &self,
        search: &PostSearch,
        now: DateTime<Utc>,
    ) -> Result<Paginated<Post>, RepoError>;

    /// Every post, newest created first.
    async fn paginate_all(&self, page: PageRequest) -> Result<Paginated<Post>, RepoError>;

    /// Live posts of `category_id`, excluding `exclude`, newest published first.
    async fn related(
        &self,
        category_id: Uuid,
        exclude: Uuid,
        limit: u64,
        now: DateTime<Utc>,
    ) -> Result<Vec<Post>, RepoError>;

    async fn latest(&self, limit: u64, now: DateTime<Utc>) -> Result<Vec<Post>, RepoError>;

    /// Live posts with the highest view counts.
    async fn popular(&self, limit: u64, now: DateTime<Utc>) -> Result<Vec<Post>, RepoError>;

    /// Live post counts keyed by category id.
    async fn count_live_by_category(
        &self,
        now: DateTime<Utc>,
    ) -> Result<HashMap<Uuid, u64>, RepoError>;

    /// `view_count = view_count + 1`, no read-modify-write.
    async fn increment_view_count(&self, id: Uuid) -> Result<(), RepoError>;
}

/// Category repository. Deleting a category deletes its posts.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Category>, RepoError>;

    async fn slug_exists(&self, slug: &str, except: Option<Uuid>) -> Result<bool, RepoError>;

    /// Categories ordered by sort order, then name.
    async fn list(&self, active_only: bool) -> Result<Vec<Category>, RepoError>;

    async fn paginate(&self, page: PageRequest) -> Result<Paginated<Category>, RepoError>;
}
