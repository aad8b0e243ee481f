//! # Lekha Shared
//!
//! Wire types between the server and the client-side page templates:
//! request DTOs, the RFC 7807 error body and the page envelope.

pub mod dto;
pub mod page;
pub mod response;

pub use page::{Flash, Page, SeoMeta};
pub use response::ErrorResponse;
