//! Admin category management.

use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;
use uuid::Uuid;

use lekha_core::query::{DEFAULT_ADMIN_PER_PAGE, PageRequest};
use lekha_shared::dto::{CategoryForm, PageParams};

use super::forms::category_draft;
use crate::middleware::auth::AdminSession;
use crate::middleware::error::{AppError, AppResult};
use crate::render::{redirect_with_flash, render};
use crate::state::AppState;

/// GET /admin/categories
pub async fn index(
    req: HttpRequest,
    state: web::Data<AppState>,
    _session: AdminSession,
    query: web::Query<PageParams>,
) -> AppResult<HttpResponse> {
    let page = PageRequest::new(query.page, query.per_page, DEFAULT_ADMIN_PER_PAGE);
    let categories = state.categories.paginate(page).await?;

    Ok(render(
        &req,
        &state,
        "admin/categories/index",
        json!({ "categories": categories }),
    ))
}

/// GET /admin/categories/create
pub async fn create(
    req: HttpRequest,
    state: web::Data<AppState>,
    _session: AdminSession,
) -> HttpResponse {
    render(&req, &state, "admin/categories/create", json!({}))
}

/// POST /admin/categories
pub async fn store(
    state: web::Data<AppState>,
    _session: AdminSession,
    body: web::Json<CategoryForm>,
) -> AppResult<HttpResponse> {
    let draft = category_draft(body.into_inner())?;
    state.category_commands.create(draft).await?;

    Ok(redirect_with_flash(
        "/admin/categories",
        "Category created successfully.",
    ))
}

/// GET /admin/categories/{id}/edit
pub async fn edit(
    req: HttpRequest,
    state: web::Data<AppState>,
    _session: AdminSession,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let category = state
        .categories
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("category {} not found", id)))?;

    Ok(render(
        &req,
        &state,
        "admin/categories/edit",
        json!({ "category": category }),
    ))
}

/// PUT /admin/categories/{id}
pub async fn update(
    state: web::Data<AppState>,
    _session: AdminSession,
    path: web::Path<Uuid>,
    body: web::Json<CategoryForm>,
) -> AppResult<HttpResponse> {
    let draft = category_draft(body.into_inner())?;
    state
        .category_commands
        .update(path.into_inner(), draft)
        .await?;

    Ok(redirect_with_flash(
        "/admin/categories",
        "Category updated successfully.",
    ))
}

/// DELETE /admin/categories/{id} - removes the category's posts too.
pub async fn destroy(
    state: web::Data<AppState>,
    _session: AdminSession,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.category_commands.delete(path.into_inner()).await?;

    Ok(redirect_with_flash(
        "/admin/categories",
        "Category deleted successfully.",
    ))
}
