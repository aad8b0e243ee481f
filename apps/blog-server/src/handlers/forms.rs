//! Wire forms to domain drafts.
//!
//! Only type-level problems are caught here (ids that are not UUIDs,
//! unparseable dates, out-of-range numbers); every other rule lives in the
//! command services.

use chrono::{DateTime, NaiveDateTime, Utc};
use uuid::Uuid;

use lekha_core::domain::{CategoryDraft, PostDraft};
use lekha_core::validation::FieldErrors;
use lekha_shared::dto::{CategoryForm, PostForm};

use crate::middleware::error::AppError;

/// Accepted `published_at` layouts besides RFC 3339 (read as UTC).
const LOCAL_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

pub fn post_draft(form: PostForm) -> Result<PostDraft, AppError> {
    let mut errors = FieldErrors::new();

    let category_id = match form.category_id.trim() {
        "" => {
            errors.add("category_id", "The category id field is required.");
            Uuid::nil()
        }
        raw => Uuid::parse_str(raw).unwrap_or_else(|_| {
            errors.add("category_id", "The selected category is invalid.");
            Uuid::nil()
        }),
    };

    let seo_score = match form.seo_score {
        None => None,
        Some(score) => match u8::try_from(score) {
            Ok(score) if score <= 100 => Some(score),
            _ => {
                errors.add("seo_score", "The seo score field must be between 0 and 100.");
                None
            }
        },
    };

    let published_at = match non_empty(form.published_at) {
        None => None,
        Some(raw) => parse_timestamp(&raw).or_else(|| {
            errors.add("published_at", "The published at field must be a valid date.");
            None
        }),
    };

    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    Ok(PostDraft {
        category_id,
        title: form.title.trim().to_string(),
        slug: non_empty(form.slug),
        excerpt: non_empty(form.excerpt),
        content: form.content,
        featured_image: non_empty(form.featured_image),
        meta_title: non_empty(form.meta_title),
        meta_description: non_empty(form.meta_description),
        focus_keyword: non_empty(form.focus_keyword),
        keywords: form
            .keywords
            .unwrap_or_default()
            .into_iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect(),
        og_image: non_empty(form.og_image),
        canonical_url: non_empty(form.canonical_url),
        seo_score,
        is_published: form.is_published,
        published_at,
    })
}

pub fn category_draft(form: CategoryForm) -> Result<CategoryDraft, AppError> {
    let sort_order = i32::try_from(form.order)
        .map_err(|_| AppError::field("order", "The order field must be an integer."))?;

    Ok(CategoryDraft {
        name: form.name.trim().to_string(),
        slug: non_empty(form.slug),
        description: non_empty(form.description),
        is_active: form.is_active,
        sort_order,
    })
}

/// Blank inputs count as absent.
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    LOCAL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}
