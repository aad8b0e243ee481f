//! Pre-write transformations for posts and categories.
//!
//! The command layer calls these explicitly before every write. They own the
//! computed fields: slugs, publication timestamps and bookkeeping timestamps.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{Category, CategoryDraft, Post, PostDraft};
use crate::slug::slugify;
use crate::validation::FieldErrors;

/// Build a new post from a draft.
///
/// The slug is the explicit one when given, otherwise derived from the title.
/// A published draft without a timestamp is stamped with `now`.
pub fn prepare_post(draft: PostDraft, now: DateTime<Utc>) -> Result<Post, FieldErrors> {
    let slug = match explicit(draft.slug.as_deref()) {
        Some(slug) => slug.to_string(),
        None => derive_slug(&draft.title, "title")?,
    };
    let published_at = match draft.published_at {
        Some(at) => Some(at),
        None if draft.is_published => Some(now),
        None => None,
    };

    Ok(Post {
        id: Uuid::new_v4(),
        category_id: draft.category_id,
        title: draft.title,
        slug,
        excerpt: draft.excerpt,
        content: draft.content,
        featured_image: draft.featured_image,
        meta_title: draft.meta_title,
        meta_description: draft.meta_description,
        focus_keyword: draft.focus_keyword,
        keywords: draft.keywords,
        og_image: draft.og_image,
        canonical_url: draft.canonical_url,
        seo_score: draft.seo_score,
        is_published: draft.is_published,
        published_at,
        view_count: 0,
        created_at: now,
        updated_at: now,
    })
}

/// Apply a draft on top of the stored post.
///
/// Slug: an explicit slug that differs from the stored one wins; otherwise a
/// changed title regenerates it; otherwise the stored slug is kept.
/// Publication time: the explicit one, else the stored one, else `now` when the
/// post becomes published. Identity, view count and creation time carry over.
pub fn apply_post_update(
    previous: &Post,
    draft: PostDraft,
    now: DateTime<Utc>,
) -> Result<Post, FieldErrors> {
    let slug = next_slug(
        &previous.title,
        &draft.title,
        &previous.slug,
        draft.slug.as_deref(),
        "title",
    )?;
    let published_at = match (draft.published_at, previous.published_at) {
        (Some(at), _) => Some(at),
        (None, Some(at)) => Some(at),
        (None, None) if draft.is_published => Some(now),
        (None, None) => None,
    };

    Ok(Post {
        id: previous.id,
        category_id: draft.category_id,
        title: draft.title,
        slug,
        excerpt: draft.excerpt,
        content: draft.content,
        featured_image: draft.featured_image,
        meta_title: draft.meta_title,
        meta_description: draft.meta_description,
        focus_keyword: draft.focus_keyword,
        keywords: draft.keywords,
        og_image: draft.og_image,
        canonical_url: draft.canonical_url,
        seo_score: draft.seo_score,
        is_published: draft.is_published,
        published_at,
        view_count: previous.view_count,
        created_at: previous.created_at,
        updated_at: now,
    })
}

pub fn prepare_category(draft: CategoryDraft, now: DateTime<Utc>) -> Result<Category, FieldErrors> {
    let slug = match explicit(draft.slug.as_deref()) {
        Some(slug) => slug.to_string(),
        None => derive_slug(&draft.name, "name")?,
    };

    Ok(Category {
        id: Uuid::new_v4(),
        name: draft.name,
        slug,
        description: draft.description,
        is_active: draft.is_active,
        sort_order: draft.sort_order,
        created_at: now,
        updated_at: now,
    })
}

/// Same slug rule as [`apply_post_update`], keyed on the category name.
pub fn apply_category_update(
    previous: &Category,
    draft: CategoryDraft,
    now: DateTime<Utc>,
) -> Result<Category, FieldErrors> {
    let slug = next_slug(
        &previous.name,
        &draft.name,
        &previous.slug,
        draft.slug.as_deref(),
        "name",
    )?;

    Ok(Category {
        id: previous.id,
        name: draft.name,
        slug,
        description: draft.description,
        is_active: draft.is_active,
        sort_order: draft.sort_order,
        created_at: previous.created_at,
        updated_at: now,
    })
}

fn next_slug(
    previous_source: &str,
    new_source: &str,
    previous_slug: &str,
    new_slug: Option<&str>,
    source_field: &str,
) -> Result<String, FieldErrors> {
    let slug_changed = explicit(new_slug).filter(|slug| *slug != previous_slug);
    if let Some(slug) = slug_changed {
        return Ok(slug.to_string());
    }
    if previous_source != new_source {
        return derive_slug(new_source, source_field);
    }
    Ok(previous_slug.to_string())
}

fn explicit(slug: Option<&str>) -> Option<&str> {
    slug.map(str::trim).filter(|s| !s.is_empty())
}

fn derive_slug(source: &str, source_field: &str) -> Result<String, FieldErrors> {
    let slug = slugify(source);
    if slug.is_empty() {
        let mut errors = FieldErrors::new();
        errors.add(
            "slug",
            format!("A slug could not be derived from the {source_field}; please provide one."),
        );
        return Err(errors);
    }
    Ok(slug)
}
