//! # Lekha Core
//!
//! The domain layer of the Lekha blog platform.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! entities and their pre-write lifecycle, validation, the SEO heuristics and
//! the query/command services written against the ports.

pub mod domain;
pub mod error;
pub mod ports;
pub mod query;
pub mod seo;
pub mod services;
pub mod slug;
pub mod text;
pub mod validation;

pub use error::{DomainError, RepoError};
pub use validation::FieldErrors;
