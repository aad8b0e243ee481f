use chrono::Utc;
use lekha_core::domain::{Category, Post};
use lekha_core::error::RepoError;
use lekha_core::ports::{BaseRepository, CategoryRepository, PostRepository, UserRepository};
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use uuid::Uuid;

use crate::database::entity::{category, post, user};
use crate::database::postgres_repo::{
    PostgresCategoryRepository, PostgresPostRepository, PostgresUserRepository,
};

fn post_model(id: Uuid, category_id: Uuid) -> post::Model {
    let now = Utc::now();
    post::Model {
        id,
        category_id,
        title: "Rust Ownership".to_owned(),
        slug: "rust-ownership".to_owned(),
        excerpt: None,
        content: "<p>Borrowing rules.</p>".to_owned(),
        featured_image: Some("/storage/posts/cover.png".to_owned()),
        meta_title: None,
        meta_description: None,
        focus_keyword: Some("ownership".to_owned()),
        keywords: Some(serde_json::json!(["rust", "ownership"])),
        og_image: None,
        canonical_url: None,
        seo_score: Some(82),
        is_published: true,
        published_at: Some(now.into()),
        view_count: 7,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let post_id = Uuid::new_v4();
    let category_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(post_id, category_id)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

    let post = result.unwrap();
    assert_eq!(post.id, post_id);
    assert_eq!(post.category_id, category_id);
    assert_eq!(post.keywords, vec!["rust", "ownership"]);
    assert_eq!(post.seo_score, Some(82));
    assert_eq!(post.view_count, 7);
}

#[tokio::test]
async fn test_find_post_by_slug_missing() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    assert!(repo.find_by_slug("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn test_malformed_keywords_become_empty() {
    let mut model = post_model(Uuid::new_v4(), Uuid::new_v4());
    model.keywords = Some(serde_json::json!({"not": "a list"}));

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![model]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let post = repo.find_by_slug("rust-ownership").await.unwrap().unwrap();

    assert!(post.keywords.is_empty());
}

#[tokio::test]
async fn test_create_post_returns_inserted_row() {
    let category_id = Uuid::new_v4();
    let model = post_model(Uuid::new_v4(), category_id);
    let domain: Post = model.clone().into();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![model]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let created = repo.create(domain.clone()).await.unwrap();

    assert_eq!(created.slug, domain.slug);
    assert_eq!(created.category_id, category_id);
}

#[tokio::test]
async fn test_increment_view_count_unknown_post() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let err = repo.increment_view_count(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, RepoError::NotFound));
}

#[tokio::test]
async fn test_increment_view_count() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    repo.increment_view_count(Uuid::new_v4()).await.unwrap();
}

#[tokio::test]
async fn test_delete_category_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresCategoryRepository::new(db);

    let err = BaseRepository::<Category, Uuid>::delete(&repo, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound));
}

#[tokio::test]
async fn test_find_category_by_slug() {
    let now = Utc::now();
    let id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![category::Model {
            id,
            name: "Technology".to_owned(),
            slug: "technology".to_owned(),
            description: None,
            is_active: true,
            sort_order: 2,
            created_at: now.into(),
            updated_at: now.into(),
        }]])
        .into_connection();

    let repo = PostgresCategoryRepository::new(db);
    let category = repo.find_by_slug("technology").await.unwrap().unwrap();

    assert_eq!(category.id, id);
    assert_eq!(category.sort_order, 2);
}

#[tokio::test]
async fn test_find_user_by_email() {
    let now = Utc::now();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![user::Model {
            id: Uuid::new_v4(),
            name: "Admin".to_owned(),
            email: "admin@example.com".to_owned(),
            password_hash: "$argon2id$stub".to_owned(),
            created_at: now.into(),
            updated_at: now.into(),
        }]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);
    let user = repo.find_by_email("admin@example.com").await.unwrap().unwrap();

    assert_eq!(user.name, "Admin");
}
