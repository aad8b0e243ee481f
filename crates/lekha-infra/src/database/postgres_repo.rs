//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    Select,
};
use uuid::Uuid;

use lekha_core::domain::{Category, Post, User};
use lekha_core::error::RepoError;
use lekha_core::ports::{CategoryRepository, PostRepository, UserRepository};
use lekha_core::query::{PageRequest, Paginated, PostSearch};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// Mask an email for logging to avoid PII in logs.
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => match local.chars().next() {
            Some(first) if local.chars().count() > 1 => format!("{first}***@{domain}"),
            _ => format!("***@{domain}"),
        },
        None => "***".to_string(),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

/// Published, with a publication time at or before `now`.
fn live(now: DateTime<Utc>) -> Condition {
    Condition::all()
        .add(post::Column::IsPublished.eq(true))
        .add(post::Column::PublishedAt.is_not_null())
        .add(post::Column::PublishedAt.lte(now.fixed_offset()))
}

/// Newest publication first; creation time breaks ties so pages stay stable.
fn newest_first(query: Select<PostEntity>) -> Select<PostEntity> {
    query
        .order_by_desc(post::Column::PublishedAt)
        .order_by_desc(post::Column::CreatedAt)
}

/// Live posts matching the search filters, newest first.
fn published_query(search: &PostSearch, now: DateTime<Utc>) -> Select<PostEntity> {
    let mut query = PostEntity::find().filter(live(now));

    if let Some(term) = search.term() {
        query = query.filter(matches_term(term));
    }
    if let Some(slug) = search.category() {
        query = query
            .inner_join(CategoryEntity)
            .filter(category::Column::Slug.eq(slug));
    }

    newest_first(query)
}

/// `%term%` with LIKE metacharacters escaped.
fn like_pattern(term: &str) -> LikeExpr {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    LikeExpr::new(escaped).escape('\\')
}

/// Case-insensitive match on title, content or excerpt.
fn matches_term(term: &str) -> Condition {
    Condition::any()
        .add(Expr::col((PostEntity, post::Column::Title)).ilike(like_pattern(term)))
        .add(Expr::col((PostEntity, post::Column::Content)).ilike(like_pattern(term)))
        .add(Expr::col((PostEntity, post::Column::Excerpt)).ilike(like_pattern(term)))
}

async fn fetch_page<E>(
    db: &sea_orm::DbConn,
    query: Select<E>,
    page: PageRequest,
) -> Result<Paginated<E::Model>, RepoError>
where
    E: EntityTrait,
    E::Model: Send + Sync,
{
    let paginator = query.paginate(db, page.per_page);
    let total = paginator.num_items().await.map_err(map_db_err)?;
    let data = paginator
        .fetch_page(page.page - 1)
        .await
        .map_err(map_db_err)?;
    Ok(Paginated::new(data, page, total))
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn slug_exists(&self, slug: &str, except: Option<Uuid>) -> Result<bool, RepoError> {
        let mut query = PostEntity::find().filter(post::Column::Slug.eq(slug));
        if let Some(id) = except {
            query = query.filter(post::Column::Id.ne(id));
        }
        let count = query.count(&self.db).await.map_err(map_db_err)?;
        Ok(count > 0)
    }

    async fn paginate_published(
        &self,
        search: &PostSearch,
        now: DateTime<Utc>,
    ) -> Result<Paginated<Post>, RepoError> {
        let query = published_query(search, now);
        let page = fetch_page(&self.db, query, search.page).await?;
        Ok(page.map(Into::into))
    }

    async fn paginate_all(&self, page: PageRequest) -> Result<Paginated<Post>, RepoError> {
        let query = PostEntity::find().order_by_desc(post::Column::CreatedAt);
        let page = fetch_page(&self.db, query, page).await?;
        Ok(page.map(Into::into))
    }

    async fn related(
        &self,
        category_id: Uuid,
        exclude: Uuid,
        limit: u64,
        now: DateTime<Utc>,
    ) -> Result<Vec<Post>, RepoError> {
        let query = PostEntity::find()
            .filter(live(now))
            .filter(post::Column::CategoryId.eq(category_id))
            .filter(post::Column::Id.ne(exclude));
        let result = newest_first(query)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn latest(&self, limit: u64, now: DateTime<Utc>) -> Result<Vec<Post>, RepoError> {
        let result = newest_first(PostEntity::find().filter(live(now)))
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn popular(&self, limit: u64, now: DateTime<Utc>) -> Result<Vec<Post>, RepoError> {
        let query = PostEntity::find()
            .filter(live(now))
            .order_by_desc(post::Column::ViewCount);
        let result = newest_first(query)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count_live_by_category(
        &self,
        now: DateTime<Utc>,
    ) -> Result<HashMap<Uuid, u64>, RepoError> {
        let rows: Vec<(Uuid, i64)> = PostEntity::find()
            .select_only()
            .column(post::Column::CategoryId)
            .column_as(post::Column::Id.count(), "posts_count")
            .filter(live(now))
            .group_by(post::Column::CategoryId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows
            .into_iter()
            .map(|(id, count)| (id, count.max(0) as u64))
            .collect())
    }

    async fn increment_view_count(&self, id: Uuid) -> Result<(), RepoError> {
        let result = PostEntity::update_many()
            .col_expr(
                post::Column::ViewCount,
                Expr::col(post::Column::ViewCount).add(1),
            )
            .filter(post::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn slug_exists(&self, slug: &str, except: Option<Uuid>) -> Result<bool, RepoError> {
        let mut query = CategoryEntity::find().filter(category::Column::Slug.eq(slug));
        if let Some(id) = except {
            query = query.filter(category::Column::Id.ne(id));
        }
        let count = query.count(&self.db).await.map_err(map_db_err)?;
        Ok(count > 0)
    }

    async fn list(&self, active_only: bool) -> Result<Vec<Category>, RepoError> {
        let mut query = CategoryEntity::find();
        if active_only {
            query = query.filter(category::Column::IsActive.eq(true));
        }

        let result = query
            .order_by_asc(category::Column::SortOrder)
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn paginate(&self, page: PageRequest) -> Result<Paginated<Category>, RepoError> {
        let query = CategoryEntity::find()
            .order_by_asc(category::Column::SortOrder)
            .order_by_asc(category::Column::Name);
        let page = fetch_page(&self.db, query, page).await?;
        Ok(page.map(Into::into))
    }
}
