use std::cmp::Reverse;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use lekha_core::domain::Post;
use lekha_core::error::RepoError;
use lekha_core::ports::{BaseRepository, PostRepository};
use lekha_core::query::{PageRequest, Paginated, PostSearch, matches_term};

use super::{InMemoryStore, Tables, paginate};

pub struct InMemoryPostRepository {
    store: InMemoryStore,
}

impl InMemoryPostRepository {
    pub fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

fn check_constraints(tables: &Tables, post: &Post) -> Result<(), RepoError> {
    if !tables.categories.contains_key(&post.category_id) {
        return Err(RepoError::Constraint(
            "posts_category_id_fkey: foreign key violation".to_string(),
        ));
    }
    if tables
        .posts
        .values()
        .any(|p| p.slug == post.slug && p.id != post.id)
    {
        return Err(RepoError::Constraint("posts_slug_key".to_string()));
    }
    Ok(())
}

/// Live posts, newest publication first.
fn live(tables: &Tables, now: DateTime<Utc>) -> Vec<Post> {
    let mut posts: Vec<Post> = tables
        .posts
        .values()
        .filter(|p| p.is_live_at(now))
        .cloned()
        .collect();
    posts.sort_by_key(|p| Reverse((p.published_at, p.created_at)));
    posts
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.posts.get(&id).cloned())
    }

    async fn create(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.posts.contains_key(&post.id) {
            return Err(RepoError::Constraint("posts_pkey".to_string()));
        }
        check_constraints(&tables, &post)?;
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.store.tables.write().await;
        if !tables.posts.contains_key(&post.id) {
            return Err(RepoError::NotFound);
        }
        check_constraints(&tables, &post)?;
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        tables
            .posts
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.posts.values().find(|p| p.slug == slug).cloned())
    }

    async fn slug_exists(&self, slug: &str, except: Option<Uuid>) -> Result<bool, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .posts
            .values()
            .any(|p| p.slug == slug && Some(p.id) != except))
    }

    async fn paginate_published(
        &self,
        search: &PostSearch,
        now: DateTime<Utc>,
    ) -> Result<Paginated<Post>, RepoError> {
        let tables = self.store.tables.read().await;

        let category_id = match search.category() {
            Some(slug) => match tables.categories.values().find(|c| c.slug == slug) {
                Some(category) => Some(category.id),
                None => return Ok(Paginated::new(Vec::new(), search.page, 0)),
            },
            None => None,
        };

        let posts: Vec<Post> = live(&tables, now)
            .into_iter()
            .filter(|p| search.term().is_none_or(|term| matches_term(p, term)))
            .filter(|p| category_id.is_none_or(|id| p.category_id == id))
            .collect();

        Ok(paginate(posts, search.page))
    }

    async fn paginate_all(&self, page: PageRequest) -> Result<Paginated<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut posts: Vec<Post> = tables.posts.values().cloned().collect();
        posts.sort_by_key(|p| Reverse(p.created_at));
        Ok(paginate(posts, page))
    }

    async fn related(
        &self,
        category_id: Uuid,
        exclude: Uuid,
        limit: u64,
        now: DateTime<Utc>,
    ) -> Result<Vec<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(live(&tables, now)
            .into_iter()
            .filter(|p| p.category_id == category_id && p.id != exclude)
            .take(limit as usize)
            .collect())
    }

    async fn latest(&self, limit: u64, now: DateTime<Utc>) -> Result<Vec<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(live(&tables, now).into_iter().take(limit as usize).collect())
    }

    async fn popular(&self, limit: u64, now: DateTime<Utc>) -> Result<Vec<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut posts = live(&tables, now);
        // Stable: equal view counts keep newest-first.
        posts.sort_by_key(|p| Reverse(p.view_count));
        posts.truncate(limit as usize);
        Ok(posts)
    }

    async fn count_live_by_category(
        &self,
        now: DateTime<Utc>,
    ) -> Result<HashMap<Uuid, u64>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut counts = HashMap::new();
        for post in tables.posts.values().filter(|p| p.is_live_at(now)) {
            *counts.entry(post.category_id).or_insert(0) += 1;
        }
        Ok(counts)
    }

    async fn increment_view_count(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        let post = tables.posts.get_mut(&id).ok_or(RepoError::NotFound)?;
        post.view_count += 1;
        Ok(())
    }
}
