//! In-memory repositories - used when no database is configured, and in tests.
//!
//! All three repositories share one [`InMemoryStore`] so that cross-table
//! rules hold: unique slugs and emails, posts must reference an existing
//! category, and deleting a category deletes its posts.
//! Data is lost on process restart.

mod categories;
mod posts;
mod users;

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use lekha_core::domain::{Category, Post, User};
use lekha_core::query::{PageRequest, Paginated};

pub use categories::InMemoryCategoryRepository;
pub use posts::InMemoryPostRepository;
pub use users::InMemoryUserRepository;

#[derive(Default)]
pub(crate) struct Tables {
    pub(crate) users: HashMap<Uuid, User>,
    pub(crate) categories: HashMap<Uuid, Category>,
    pub(crate) posts: HashMap<Uuid, Post>,
}

/// Shared backing store for the in-memory repositories.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository::new(self.clone())
    }

    pub fn categories(&self) -> InMemoryCategoryRepository {
        InMemoryCategoryRepository::new(self.clone())
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository::new(self.clone())
    }
}

/// Cut one page out of an already ordered list.
fn paginate<T>(items: Vec<T>, page: PageRequest) -> Paginated<T> {
    let total = items.len() as u64;
    let data = items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.per_page as usize)
        .collect();
    Paginated::new(data, page, total)
}
