//! # Lekha Infrastructure
//!
//! Concrete implementations of the ports defined in `lekha-core`.
//! This crate contains the database, in-memory store, auth, rate limiting,
//! the Gemini SEO provider and local image storage.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No database, in-memory repositories only
//! - `postgres` - PostgreSQL database support via SeaORM
//! - `auth` - JWT sessions + Argon2 password hashing
//! - `rate-limit` - Login rate limiting via governor

pub mod database;
pub mod memory;
pub mod seo;
pub mod storage;

#[cfg(feature = "auth")]
pub mod auth;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

pub use database::DatabaseConfig;
#[cfg(feature = "postgres")]
pub use database::DatabaseConnections;
pub use memory::{InMemoryCategoryRepository, InMemoryPostRepository, InMemoryStore, InMemoryUserRepository};
pub use seo::{GeminiConfig, GeminiSeoAssistant};
pub use storage::LocalImageStorage;

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, SessionTokenService};

#[cfg(feature = "rate-limit")]
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};
