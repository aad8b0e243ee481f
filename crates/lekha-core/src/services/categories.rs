//! Category queries and commands.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::lifecycle::{apply_category_update, prepare_category};
use crate::domain::{Category, CategoryDraft, CategoryWithCount};
use crate::error::{DomainError, RepoError};
use crate::ports::{CategoryRepository, PostRepository};
use crate::query::{PageRequest, Paginated};
use crate::validation::{FieldErrors, max_chars, optional_max_chars, required, slug_format};

#[derive(Clone)]
pub struct CategoryQuery {
    categories: Arc<dyn CategoryRepository>,
    posts: Arc<dyn PostRepository>,
}

impl CategoryQuery {
    pub fn new(categories: Arc<dyn CategoryRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { categories, posts }
    }

    pub async fn all(&self) -> Result<Vec<Category>, DomainError> {
        Ok(self.categories.list(false).await?)
    }

    pub async fn active(&self) -> Result<Vec<Category>, DomainError> {
        Ok(self.categories.list(true).await?)
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, DomainError> {
        Ok(self.categories.find_by_slug(slug).await?)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, DomainError> {
        Ok(self.categories.find_by_id(id).await?)
    }

    pub async fn paginate(&self, page: PageRequest) -> Result<Paginated<Category>, DomainError> {
        Ok(self.categories.paginate(page).await?)
    }

    /// Active categories, each with its number of live posts.
    pub async fn active_with_post_counts(&self) -> Result<Vec<CategoryWithCount>, DomainError> {
        let categories = self.categories.list(true).await?;
        let counts = self.posts.count_live_by_category(Utc::now()).await?;

        Ok(categories
            .into_iter()
            .map(|category| CategoryWithCount {
                posts_count: counts.get(&category.id).copied().unwrap_or(0),
                category,
            })
            .collect())
    }
}

#[derive(Clone)]
pub struct CategoryCommand {
    categories: Arc<dyn CategoryRepository>,
}

impl CategoryCommand {
    pub fn new(categories: Arc<dyn CategoryRepository>) -> Self {
        Self { categories }
    }

    pub async fn create(&self, draft: CategoryDraft) -> Result<Category, DomainError> {
        let mut errors = validate_draft(&draft);
        let category = match prepare_category(draft, Utc::now()) {
            Ok(category) => category,
            Err(slug_errors) => {
                errors.merge(slug_errors);
                return Err(DomainError::Validation(errors));
            }
        };
        if self.categories.slug_exists(&category.slug, None).await? {
            errors.add("slug", "The slug has already been taken.");
        }
        errors.into_result()?;

        let category = self.categories.create(category).await?;
        tracing::info!(category_id = %category.id, slug = %category.slug, "Category created");
        Ok(category)
    }

    pub async fn update(&self, id: Uuid, draft: CategoryDraft) -> Result<Category, DomainError> {
        let previous = self
            .categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("category", id))?;

        let mut errors = validate_draft(&draft);
        let next = match apply_category_update(&previous, draft, Utc::now()) {
            Ok(next) => next,
            Err(slug_errors) => {
                errors.merge(slug_errors);
                return Err(DomainError::Validation(errors));
            }
        };
        if next.slug != previous.slug && self.categories.slug_exists(&next.slug, Some(id)).await? {
            errors.add("slug", "The slug has already been taken.");
        }
        errors.into_result()?;

        self.categories
            .update(next)
            .await
            .map_err(|e| not_found(e, id))?;
        tracing::info!(category_id = %id, "Category updated");

        self.categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("category", id))
    }

    /// Delete the category together with all of its posts.
    pub async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        self.categories
            .delete(id)
            .await
            .map_err(|e| not_found(e, id))?;
        tracing::info!(category_id = %id, "Category deleted with its posts");
        Ok(())
    }
}

fn validate_draft(draft: &CategoryDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();
    required(&mut errors, "name", &draft.name);
    max_chars(&mut errors, "name", &draft.name, 255);
    slug_format(&mut errors, "slug", draft.slug.as_deref());
    optional_max_chars(&mut errors, "description", draft.description.as_deref(), 1000);
    if draft.sort_order < 0 {
        errors.add("order", "The order field must be at least 0.");
    }
    errors
}

fn not_found(err: RepoError, id: Uuid) -> DomainError {
    match err {
        RepoError::NotFound => DomainError::not_found("category", id),
        other => other.into(),
    }
}
