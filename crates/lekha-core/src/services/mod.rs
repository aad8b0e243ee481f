//! Application services - queries and commands over the repository ports.

mod accounts;
mod categories;
mod posts;

pub use accounts::{AccountService, INVALID_CREDENTIALS, MIN_PASSWORD_CHARS};
pub use categories::{CategoryCommand, CategoryQuery};
pub use posts::{
    LATEST_LIMIT, POPULAR_LIMIT, PostCommand, PostQuery, RELATED_LIMIT, SEARCH_LIMIT,
};
