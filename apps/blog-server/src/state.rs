//! Application state - shared across all handlers.

use std::sync::Arc;

use lekha_core::error::DomainError;
use lekha_core::ports::{
    CategoryRepository, ImageStorage, PostRepository, RateLimiter, SeoAssistant, TokenService,
    UserRepository,
};
use lekha_core::services::{AccountService, CategoryCommand, CategoryQuery, PostCommand, PostQuery};
use lekha_infra::database::{
    DatabaseConnections, PostgresCategoryRepository, PostgresPostRepository,
    PostgresUserRepository,
};
use lekha_infra::{
    Argon2PasswordService, GeminiSeoAssistant, InMemoryRateLimiter, InMemoryStore,
    LocalImageStorage, SessionTokenService,
};

use crate::config::{AppConfig, SiteConfig};

/// Repositories backing the services.
struct Repositories {
    users: Arc<dyn UserRepository>,
    categories: Arc<dyn CategoryRepository>,
    posts: Arc<dyn PostRepository>,
}

impl Repositories {
    fn in_memory() -> Self {
        let store = InMemoryStore::new();
        Self {
            users: Arc::new(store.users()),
            categories: Arc::new(store.categories()),
            posts: Arc::new(store.posts()),
        }
    }

    fn postgres(db: &DatabaseConnections) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(db.main.clone())),
            categories: Arc::new(PostgresCategoryRepository::new(db.main.clone())),
            posts: Arc::new(PostgresPostRepository::new(db.main.clone())),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostQuery,
    pub post_commands: PostCommand,
    pub categories: CategoryQuery,
    pub category_commands: CategoryCommand,
    pub accounts: AccountService,
    pub seo: Arc<dyn SeoAssistant>,
    pub storage: Arc<dyn ImageStorage>,
    pub tokens: Arc<dyn TokenService>,
    pub login_limiter: Arc<dyn RateLimiter>,
    pub site: SiteConfig,
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let (db, repos) = match &config.database {
            Some(db_config) => match DatabaseConnections::init(db_config).await {
                Ok(connections) => {
                    let repos = Repositories::postgres(&connections);
                    (Some(Arc::new(connections)), repos)
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    (None, Repositories::in_memory())
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                (None, Repositories::in_memory())
            }
        };

        let state = Self::assemble(config, repos, db);
        tracing::info!("Application state initialized");
        state
    }

    /// In-memory state, used by the handler tests.
    #[cfg(test)]
    pub fn in_memory(config: &AppConfig) -> Self {
        Self::assemble(config, Repositories::in_memory(), None)
    }

    fn assemble(
        config: &AppConfig,
        repos: Repositories,
        db: Option<Arc<DatabaseConnections>>,
    ) -> Self {
        let Repositories {
            users,
            categories,
            posts,
        } = repos;

        Self {
            posts: PostQuery::new(posts.clone(), categories.clone()),
            post_commands: PostCommand::new(posts.clone(), categories.clone()),
            categories: CategoryQuery::new(categories.clone(), posts),
            category_commands: CategoryCommand::new(categories),
            accounts: AccountService::new(users, Arc::new(Argon2PasswordService::new())),
            seo: Arc::new(GeminiSeoAssistant::new(config.gemini())),
            storage: Arc::new(LocalImageStorage::new(config.upload.dir.clone())),
            tokens: Arc::new(SessionTokenService::new(config.jwt())),
            login_limiter: Arc::new(InMemoryRateLimiter::new(config.login_limit())),
            site: config.site.clone(),
            db,
        }
    }

    /// Create the configured admin account unless it already exists.
    pub async fn seed_admin(&self, config: &AppConfig) -> Result<(), DomainError> {
        match &config.admin {
            Some(seed) => {
                self.accounts
                    .ensure_admin(&seed.name, &seed.email, &seed.password)
                    .await?;
            }
            None => tracing::warn!(
                "ADMIN_EMAIL/ADMIN_PASSWORD not set; no admin account will be seeded"
            ),
        }
        Ok(())
    }
}
