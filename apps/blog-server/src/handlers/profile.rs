//! Admin profile and password change.

use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;

use lekha_shared::dto::{PasswordChangeRequest, UserResponse};

use crate::middleware::auth::AdminSession;
use crate::middleware::error::{AppError, AppResult};
use crate::render::{redirect_with_flash, render};
use crate::state::AppState;

/// GET /admin/profile
pub async fn edit(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: AdminSession,
) -> AppResult<HttpResponse> {
    // A valid token for a deleted account is treated as signed out
    let user = state
        .accounts
        .find(session.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let user = UserResponse {
        id: user.id.to_string(),
        name: user.name,
        email: user.email,
    };

    Ok(render(&req, &state, "admin/profile/edit", json!({ "user": user })))
}

/// PUT /admin/profile/password
pub async fn update_password(
    state: web::Data<AppState>,
    session: AdminSession,
    body: web::Json<PasswordChangeRequest>,
) -> AppResult<HttpResponse> {
    let request = body.into_inner();
    state
        .accounts
        .change_password(
            session.user_id,
            &request.current_password,
            &request.password,
            &request.password_confirmation,
        )
        .await?;

    Ok(redirect_with_flash(
        "/admin/profile",
        "Password updated successfully.",
    ))
}
