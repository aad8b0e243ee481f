//! Admin post management.

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, web};
use futures::TryStreamExt;
use serde_json::json;
use uuid::Uuid;

use lekha_core::query::{DEFAULT_ADMIN_PER_PAGE, PageRequest};
use lekha_core::validation::{MAX_IMAGE_BYTES, image_upload};
use lekha_shared::dto::{PageParams, PostForm, UploadResponse};

use super::forms::post_draft;
use crate::middleware::auth::AdminSession;
use crate::middleware::error::{AppError, AppResult};
use crate::render::{redirect, redirect_with_flash, render};
use crate::state::AppState;

/// Multipart field carrying the upload.
const IMAGE_FIELD: &str = "image";

/// Folder under the storage root for post images.
const POST_IMAGE_FOLDER: &str = "posts";

/// GET /admin - the dashboard is the post list.
pub async fn dashboard(_session: AdminSession) -> HttpResponse {
    redirect("/admin/posts")
}

/// GET /admin/posts
pub async fn index(
    req: HttpRequest,
    state: web::Data<AppState>,
    _session: AdminSession,
    query: web::Query<PageParams>,
) -> AppResult<HttpResponse> {
    let page = PageRequest::new(query.page, query.per_page, DEFAULT_ADMIN_PER_PAGE);
    let posts = state.posts.paginate_all(page).await?;

    Ok(render(&req, &state, "admin/posts/index", json!({ "posts": posts })))
}

/// GET /admin/posts/create
pub async fn create(
    req: HttpRequest,
    state: web::Data<AppState>,
    _session: AdminSession,
) -> AppResult<HttpResponse> {
    let categories = state.categories.active().await?;

    Ok(render(
        &req,
        &state,
        "admin/posts/create",
        json!({ "categories": categories }),
    ))
}

/// POST /admin/posts
pub async fn store(
    state: web::Data<AppState>,
    _session: AdminSession,
    body: web::Json<PostForm>,
) -> AppResult<HttpResponse> {
    let draft = post_draft(body.into_inner())?;
    state.post_commands.create(draft).await?;

    Ok(redirect_with_flash("/admin/posts", "Post created successfully."))
}

/// GET /admin/posts/{id}/edit
pub async fn edit(
    req: HttpRequest,
    state: web::Data<AppState>,
    _session: AdminSession,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {} not found", id)))?;
    let categories = state.categories.active().await?;

    Ok(render(
        &req,
        &state,
        "admin/posts/edit",
        json!({ "post": post, "categories": categories }),
    ))
}

/// PUT /admin/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    _session: AdminSession,
    path: web::Path<Uuid>,
    body: web::Json<PostForm>,
) -> AppResult<HttpResponse> {
    let draft = post_draft(body.into_inner())?;
    state.post_commands.update(path.into_inner(), draft).await?;

    Ok(redirect_with_flash("/admin/posts", "Post updated successfully."))
}

/// DELETE /admin/posts/{id}
pub async fn destroy(
    state: web::Data<AppState>,
    _session: AdminSession,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.post_commands.delete(path.into_inner()).await?;

    Ok(redirect_with_flash("/admin/posts", "Post deleted successfully."))
}

/// GET /admin/posts/{id}/preview - drafts included.
pub async fn preview(
    req: HttpRequest,
    state: web::Data<AppState>,
    _session: AdminSession,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {} not found", id)))?;

    Ok(render(&req, &state, "admin/posts/preview", json!({ "post": post })))
}

/// POST /admin/posts/upload-image - multipart field `image`.
pub async fn upload_image(
    state: web::Data<AppState>,
    session: AdminSession,
    mut payload: Multipart,
) -> AppResult<HttpResponse> {
    while let Some(mut field) = payload.try_next().await.map_err(bad_multipart)? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let content_type = field.content_type().map(|mime| mime.essence_str().to_string());
        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(bad_multipart)? {
            // Stop buffering once the limit is exceeded; the size check below reports it
            if bytes.len() <= MAX_IMAGE_BYTES {
                bytes.extend_from_slice(&chunk);
            }
        }

        let errors = image_upload(content_type.as_deref(), bytes.len());
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let content_type = content_type.unwrap_or_default();
        let url = state
            .storage
            .store(POST_IMAGE_FOLDER, &content_type, &bytes)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        tracing::info!(user_id = %session.user_id, url = %url, size = bytes.len(), "Image uploaded");
        return Ok(HttpResponse::Ok().json(UploadResponse { url }));
    }

    Err(AppError::field(IMAGE_FIELD, "The image field is required."))
}

fn bad_multipart(err: actix_multipart::MultipartError) -> AppError {
    AppError::BadRequest(err.to_string())
}
