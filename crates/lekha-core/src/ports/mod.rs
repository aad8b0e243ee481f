//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod rate_limit;
mod repository;
mod seo;
mod storage;

pub use auth::{AuthError, PasswordService, SessionClaims, TokenService};
pub use rate_limit::{RateLimitError, RateLimitResult, RateLimiter};
pub use repository::{BaseRepository, CategoryRepository, PostRepository, UserRepository};
pub use seo::SeoAssistant;
pub use storage::{ImageStorage, StorageError};
