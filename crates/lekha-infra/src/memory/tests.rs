//! Service-level tests: the core query/command services over the in-memory store.

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use lekha_core::DomainError;
use lekha_core::domain::{Category, CategoryDraft, PostDraft};
use lekha_core::query::{PageRequest, PostSearch};
use lekha_core::services::{CategoryCommand, CategoryQuery, PostCommand, PostQuery};

use super::InMemoryStore;

struct Fixture {
    posts: PostQuery,
    post_commands: PostCommand,
    categories: CategoryQuery,
    category_commands: CategoryCommand,
}

fn fixture() -> Fixture {
    let store = InMemoryStore::new();
    let posts = Arc::new(store.posts());
    let categories = Arc::new(store.categories());
    Fixture {
        posts: PostQuery::new(posts.clone(), categories.clone()),
        post_commands: PostCommand::new(posts.clone(), categories.clone()),
        categories: CategoryQuery::new(categories.clone(), posts),
        category_commands: CategoryCommand::new(categories),
    }
}

fn post_draft(category_id: Uuid, title: &str) -> PostDraft {
    PostDraft {
        category_id,
        title: title.to_string(),
        content: format!("<p>{title} body text</p>"),
        featured_image: Some("/storage/posts/cover.png".to_string()),
        is_published: true,
        ..Default::default()
    }
}

async fn category(f: &Fixture, name: &str) -> Category {
    f.category_commands
        .create(CategoryDraft {
            name: name.to_string(),
            ..Default::default()
        })
        .await
        .unwrap()
}

fn field_errors(err: DomainError) -> lekha_core::FieldErrors {
    match err {
        DomainError::Validation(errors) => errors,
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn create_derives_slug_and_publication_time() {
    let f = fixture();
    let tech = category(&f, "Technology").await;

    let post = f
        .post_commands
        .create(post_draft(tech.id, "Hello Rust World"))
        .await
        .unwrap();

    assert_eq!(post.slug, "hello-rust-world");
    assert!(post.published_at.is_some());
    assert_eq!(post.view_count, 0);
}

#[tokio::test]
async fn duplicate_derived_slug_is_a_field_error() {
    let f = fixture();
    let tech = category(&f, "Technology").await;
    f.post_commands
        .create(post_draft(tech.id, "Same Title"))
        .await
        .unwrap();

    let err = f
        .post_commands
        .create(post_draft(tech.id, "Same Title"))
        .await
        .unwrap_err();

    let errors = field_errors(err);
    assert_eq!(
        errors.get("slug").unwrap(),
        ["The slug has already been taken."]
    );
}

#[tokio::test]
async fn unknown_category_is_rejected() {
    let f = fixture();

    let err = f
        .post_commands
        .create(post_draft(Uuid::new_v4(), "Orphan"))
        .await
        .unwrap_err();

    let errors = field_errors(err);
    assert!(errors.contains("category_id"));
}

#[tokio::test]
async fn missing_required_fields_are_reported_together() {
    let f = fixture();
    let tech = category(&f, "Technology").await;
    let draft = PostDraft {
        category_id: tech.id,
        slug: Some("Not A Slug".to_string()),
        ..Default::default()
    };

    let errors = field_errors(f.post_commands.create(draft).await.unwrap_err());

    assert!(errors.contains("title"));
    assert!(errors.contains("content"));
    assert!(errors.contains("featured_image"));
    assert!(errors.contains("slug"));
}

#[tokio::test]
async fn title_change_regenerates_slug_unless_slug_given() {
    let f = fixture();
    let tech = category(&f, "Technology").await;
    let post = f
        .post_commands
        .create(post_draft(tech.id, "First Title"))
        .await
        .unwrap();
    f.post_commands.increment_view_count(post.id).await.unwrap();

    let renamed = f
        .post_commands
        .update(post.id, post_draft(tech.id, "Second Title"))
        .await
        .unwrap();
    assert_eq!(renamed.slug, "second-title");
    assert_eq!(renamed.view_count, 1);
    assert_eq!(renamed.published_at, post.published_at);

    let mut draft = post_draft(tech.id, "Third Title");
    draft.slug = Some("custom-slug".to_string());
    let custom = f.post_commands.update(post.id, draft).await.unwrap();
    assert_eq!(custom.slug, "custom-slug");
}

#[tokio::test]
async fn update_of_missing_post_is_not_found() {
    let f = fixture();
    let tech = category(&f, "Technology").await;

    let err = f
        .post_commands
        .update(Uuid::new_v4(), post_draft(tech.id, "Ghost"))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::NotFound { entity_type: "post", .. }));
}

#[tokio::test]
async fn public_listing_hides_drafts_and_scheduled_posts() {
    let f = fixture();
    let tech = category(&f, "Technology").await;

    f.post_commands
        .create(post_draft(tech.id, "Live Post"))
        .await
        .unwrap();

    let mut draft = post_draft(tech.id, "Draft Post");
    draft.is_published = false;
    f.post_commands.create(draft).await.unwrap();

    let mut scheduled = post_draft(tech.id, "Scheduled Post");
    scheduled.published_at = Some(Utc::now() + Duration::days(3));
    let scheduled = f.post_commands.create(scheduled).await.unwrap();

    let page = f
        .posts
        .paginate_published(&PostSearch::new(None, None, PageRequest::new(None, None, 12)))
        .await
        .unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.data[0].post.title, "Live Post");
    assert_eq!(page.data[0].category.as_ref().unwrap().slug, "technology");

    assert!(
        f.posts
            .find_published_by_slug(&scheduled.slug)
            .await
            .unwrap()
            .is_none()
    );
    assert!(f.posts.find_by_slug(&scheduled.slug).await.unwrap().is_some());
}

#[tokio::test]
async fn search_and_category_filter_combine() {
    let f = fixture();
    let tech = category(&f, "Technology").await;
    let life = category(&f, "Lifestyle").await;

    f.post_commands
        .create(post_draft(tech.id, "Learning RUST"))
        .await
        .unwrap();
    f.post_commands
        .create(post_draft(life.id, "Rust on bikes"))
        .await
        .unwrap();
    f.post_commands
        .create(post_draft(tech.id, "Go routines"))
        .await
        .unwrap();

    let all_rust = f.posts.search("rust", 10).await.unwrap();
    assert_eq!(all_rust.len(), 2);

    let tech_rust = f
        .posts
        .paginate_published(&PostSearch::new(
            Some("  rust ".to_string()),
            Some("technology".to_string()),
            PageRequest::new(None, None, 12),
        ))
        .await
        .unwrap();
    assert_eq!(tech_rust.total, 1);
    assert_eq!(tech_rust.data[0].post.title, "Learning RUST");

    let unknown = f
        .posts
        .paginate_published(&PostSearch::new(
            None,
            Some("no-such-category".to_string()),
            PageRequest::new(None, None, 12),
        ))
        .await
        .unwrap();
    assert_eq!(unknown.total, 0);
    assert_eq!(unknown.last_page, 1);
}

#[tokio::test]
async fn pagination_reports_last_page() {
    let f = fixture();
    let tech = category(&f, "Technology").await;
    for i in 0..5 {
        f.post_commands
            .create(post_draft(tech.id, &format!("Post number {i}")))
            .await
            .unwrap();
    }

    let page = f
        .posts
        .paginate_all(PageRequest::new(Some(3), Some(2), 15))
        .await
        .unwrap();

    assert_eq!(page.total, 5);
    assert_eq!(page.last_page, 3);
    assert_eq!(page.data.len(), 1);
}

#[tokio::test]
async fn related_popular_and_latest() {
    let f = fixture();
    let tech = category(&f, "Technology").await;
    let life = category(&f, "Lifestyle").await;

    let main = f
        .post_commands
        .create(post_draft(tech.id, "Main"))
        .await
        .unwrap();
    let sibling = f
        .post_commands
        .create(post_draft(tech.id, "Sibling"))
        .await
        .unwrap();
    f.post_commands
        .create(post_draft(life.id, "Elsewhere"))
        .await
        .unwrap();

    for _ in 0..3 {
        f.post_commands
            .increment_view_count(sibling.id)
            .await
            .unwrap();
    }

    let related = f.posts.related(&main, 4).await.unwrap();
    assert_eq!(related.len(), 1);
    assert_eq!(related[0].post.id, sibling.id);

    let popular = f.posts.popular(5).await.unwrap();
    assert_eq!(popular[0].post.id, sibling.id);
    assert_eq!(popular[0].post.view_count, 3);

    let latest = f.posts.latest(2).await.unwrap();
    assert_eq!(latest.len(), 2);
    assert!(latest.iter().all(|view| view.category.is_some()));
}

#[tokio::test]
async fn deleting_category_deletes_its_posts() {
    let f = fixture();
    let tech = category(&f, "Technology").await;
    let post = f
        .post_commands
        .create(post_draft(tech.id, "Doomed"))
        .await
        .unwrap();

    f.category_commands.delete(tech.id).await.unwrap();

    assert!(f.posts.find_by_id(post.id).await.unwrap().is_none());
    assert!(matches!(
        f.category_commands.delete(tech.id).await.unwrap_err(),
        DomainError::NotFound { .. }
    ));
}

#[tokio::test]
async fn sidebar_counts_only_live_posts_in_active_categories() {
    let f = fixture();
    let tech = category(&f, "Technology").await;
    let hidden = f
        .category_commands
        .create(CategoryDraft {
            name: "Hidden".to_string(),
            is_active: false,
            ..Default::default()
        })
        .await
        .unwrap();

    f.post_commands
        .create(post_draft(tech.id, "Counted"))
        .await
        .unwrap();
    let mut draft = post_draft(tech.id, "Not counted");
    draft.is_published = false;
    f.post_commands.create(draft).await.unwrap();
    f.post_commands
        .create(post_draft(hidden.id, "Hidden post"))
        .await
        .unwrap();

    let sidebar = f.categories.active_with_post_counts().await.unwrap();

    assert_eq!(sidebar.len(), 1);
    assert_eq!(sidebar[0].category.id, tech.id);
    assert_eq!(sidebar[0].posts_count, 1);
}

#[tokio::test]
async fn categories_are_ordered_by_sort_order_then_name() {
    let f = fixture();
    for (name, order) in [("Zeta", 0), ("Alpha", 1), ("Beta", 0)] {
        f.category_commands
            .create(CategoryDraft {
                name: name.to_string(),
                sort_order: order,
                ..Default::default()
            })
            .await
            .unwrap();
    }

    let names: Vec<String> = f
        .categories
        .all()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();

    assert_eq!(names, ["Beta", "Zeta", "Alpha"]);
}

#[tokio::test]
async fn category_rename_regenerates_slug_and_rejects_clash() {
    let f = fixture();
    let tech = category(&f, "Technology").await;
    category(&f, "Science").await;

    let renamed = f
        .category_commands
        .update(
            tech.id,
            CategoryDraft {
                name: "Tech News".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.slug, "tech-news");

    let err = f
        .category_commands
        .update(
            tech.id,
            CategoryDraft {
                name: "Tech News".to_string(),
                slug: Some("science".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(field_errors(err).contains("slug"));
}

#[cfg(feature = "auth")]
mod accounts {
    use std::sync::Arc;

    use lekha_core::DomainError;
    use lekha_core::services::AccountService;

    use crate::auth::Argon2PasswordService;
    use crate::memory::InMemoryStore;

    fn service() -> AccountService {
        let store = InMemoryStore::new();
        let passwords = Argon2PasswordService::with_params(1024, 1, 1).unwrap();
        AccountService::new(Arc::new(store.users()), Arc::new(passwords))
    }

    #[tokio::test]
    async fn seeded_admin_can_sign_in_once_seeded() {
        let accounts = service();
        let admin = accounts
            .ensure_admin("Admin", "admin@example.com", "secret-pass")
            .await
            .unwrap();
        let again = accounts
            .ensure_admin("Other", "admin@example.com", "ignored")
            .await
            .unwrap();
        assert_eq!(admin.id, again.id);

        let user = accounts
            .authenticate("admin@example.com", "secret-pass")
            .await
            .unwrap();
        assert_eq!(user.id, admin.id);

        assert!(matches!(
            accounts
                .authenticate("admin@example.com", "wrong")
                .await
                .unwrap_err(),
            DomainError::Unauthorized
        ));
        assert!(matches!(
            accounts
                .authenticate("nobody@example.com", "secret-pass")
                .await
                .unwrap_err(),
            DomainError::Unauthorized
        ));
    }

    #[tokio::test]
    async fn password_change_checks_current_length_and_confirmation() {
        let accounts = service();
        let admin = accounts
            .ensure_admin("Admin", "admin@example.com", "secret-pass")
            .await
            .unwrap();

        let err = accounts
            .change_password(admin.id, "wrong", "short", "different")
            .await
            .unwrap_err();
        let DomainError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert!(errors.contains("current_password"));
        assert_eq!(errors.get("password").unwrap().len(), 2);

        accounts
            .change_password(admin.id, "secret-pass", "new-secret", "new-secret")
            .await
            .unwrap();
        assert!(
            accounts
                .authenticate("admin@example.com", "new-secret")
                .await
                .is_ok()
        );
    }
}
