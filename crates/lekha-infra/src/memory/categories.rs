use async_trait::async_trait;
use uuid::Uuid;

use lekha_core::domain::Category;
use lekha_core::error::RepoError;
use lekha_core::ports::{BaseRepository, CategoryRepository};
use lekha_core::query::{PageRequest, Paginated};

use super::{InMemoryStore, Tables, paginate};

pub struct InMemoryCategoryRepository {
    store: InMemoryStore,
}

impl InMemoryCategoryRepository {
    pub fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

fn slug_taken(tables: &Tables, slug: &str, except: Option<Uuid>) -> bool {
    tables
        .categories
        .values()
        .any(|c| c.slug == slug && Some(c.id) != except)
}

/// Sort order, then name.
fn ordered(tables: &Tables, active_only: bool) -> Vec<Category> {
    let mut categories: Vec<Category> = tables
        .categories
        .values()
        .filter(|c| !active_only || c.is_active)
        .cloned()
        .collect();
    categories.sort_by(|a, b| {
        a.sort_order
            .cmp(&b.sort_order)
            .then_with(|| a.name.cmp(&b.name))
    });
    categories
}

#[async_trait]
impl BaseRepository<Category, Uuid> for InMemoryCategoryRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.categories.get(&id).cloned())
    }

    async fn create(&self, category: Category) -> Result<Category, RepoError> {
        let mut tables = self.store.tables.write().await;
        if slug_taken(&tables, &category.slug, None) {
            return Err(RepoError::Constraint("categories_slug_key".to_string()));
        }
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update(&self, category: Category) -> Result<Category, RepoError> {
        let mut tables = self.store.tables.write().await;
        if !tables.categories.contains_key(&category.id) {
            return Err(RepoError::NotFound);
        }
        if slug_taken(&tables, &category.slug, Some(category.id)) {
            return Err(RepoError::Constraint("categories_slug_key".to_string()));
        }
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    /// Removes the category and cascades to its posts.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.categories.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        tables.posts.retain(|_, p| p.category_id != id);
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.categories.values().find(|c| c.slug == slug).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Category>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.categories.get(id).cloned())
            .collect())
    }

    async fn slug_exists(&self, slug: &str, except: Option<Uuid>) -> Result<bool, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(slug_taken(&tables, slug, except))
    }

    async fn list(&self, active_only: bool) -> Result<Vec<Category>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(ordered(&tables, active_only))
    }

    async fn paginate(&self, page: PageRequest) -> Result<Paginated<Category>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(paginate(ordered(&tables, false), page))
    }
}
