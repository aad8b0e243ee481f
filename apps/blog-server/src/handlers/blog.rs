//! Public blog pages.

use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;

use lekha_core::domain::PostView;
use lekha_core::query::{DEFAULT_PUBLIC_PER_PAGE, PageRequest, PostSearch};
use lekha_core::services::{LATEST_LIMIT, POPULAR_LIMIT, RELATED_LIMIT};
use lekha_shared::SeoMeta;
use lekha_shared::dto::PostSearchParams;

use crate::config::SiteConfig;
use crate::middleware::error::{AppError, AppResult};
use crate::render::render;
use crate::state::AppState;

/// GET / and GET /blog
pub async fn index(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<PostSearchParams>,
) -> AppResult<HttpResponse> {
    let params = query.into_inner();
    let search = PostSearch::new(
        params.q.clone(),
        params.category.clone(),
        PageRequest::new(params.page, params.per_page, DEFAULT_PUBLIC_PER_PAGE),
    );

    let posts = state.posts.paginate_published(&search).await?;
    let categories = state.categories.active_with_post_counts().await?;
    let latest = state.posts.latest(LATEST_LIMIT).await?;
    let popular = state.posts.popular(POPULAR_LIMIT).await?;

    Ok(render(
        &req,
        &state,
        "blog/index",
        json!({
            "posts": posts,
            "categories": categories,
            "latestPosts": latest,
            "popularPosts": popular,
            "filters": { "q": params.q, "category": params.category },
        }),
    ))
}

/// GET /blog/{slug} - live posts only; counts the view.
pub async fn show(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let mut view = state
        .posts
        .find_published_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {} not found", slug)))?;

    match state.post_commands.increment_view_count(view.post.id).await {
        Ok(()) => view.post.view_count += 1,
        Err(e) => tracing::warn!(post_id = %view.post.id, error = %e, "View count not updated"),
    }

    let related = state.posts.related(&view.post, RELATED_LIMIT).await?;
    let categories = state.categories.active_with_post_counts().await?;
    let seo = seo_meta(&view, &state.site);

    Ok(render(
        &req,
        &state,
        "blog/show",
        json!({
            "post": view,
            "relatedPosts": related,
            "categories": categories,
            "seo": seo,
        }),
    ))
}

/// GET /category/{slug}
pub async fn category(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PostSearchParams>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let category = state
        .categories
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("category {} not found", slug)))?;

    let params = query.into_inner();
    let search = PostSearch::new(
        params.q.clone(),
        Some(category.slug.clone()),
        PageRequest::new(params.page, params.per_page, DEFAULT_PUBLIC_PER_PAGE),
    );
    let posts = state.posts.paginate_published(&search).await?;
    let categories = state.categories.active_with_post_counts().await?;

    Ok(render(
        &req,
        &state,
        "blog/category",
        json!({
            "posts": posts,
            "category": category,
            "categories": categories,
            "filters": { "q": params.q },
        }),
    ))
}

/// Search-engine metadata for an article page.
fn seo_meta(view: &PostView, site: &SiteConfig) -> SeoMeta {
    let post = &view.post;
    let url = site.absolute(&format!("/blog/{}", post.slug));

    SeoMeta {
        title: non_blank(post.meta_title.as_deref())
            .unwrap_or(post.title.as_str())
            .to_string(),
        description: non_blank(post.meta_description.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| view.excerpt_text.clone()),
        keywords: post.keywords.clone(),
        image: non_blank(post.og_image.as_deref())
            .or(non_blank(post.featured_image.as_deref()))
            .map(|image| site.absolute(image)),
        canonical: non_blank(post.canonical_url.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| url.clone()),
        url,
        kind: "article".to_string(),
        published_time: post.published_at.map(|t| t.to_rfc3339()),
        section: view.category.as_ref().map(|c| c.name.clone()),
        author: site.name.clone(),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
