//! Domain entities - the core business objects.

mod category;
pub mod lifecycle;
mod post;
mod user;

pub use category::{Category, CategoryDraft, CategorySummary, CategoryWithCount};
pub use post::{Post, PostDraft, PostView};
pub use user::User;
