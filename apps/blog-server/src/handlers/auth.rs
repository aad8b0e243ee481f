//! Sign-in and sign-out.

use actix_web::{HttpRequest, HttpResponse, web};
use chrono::Duration;
use serde_json::json;

use lekha_core::error::DomainError;
use lekha_core::services::INVALID_CREDENTIALS;
use lekha_shared::dto::LoginRequest;

use crate::middleware::auth::{OptionalSession, removal_cookie, session_cookie};
use crate::middleware::error::{AppError, AppResult};
use crate::render::{redirect, render};
use crate::state::AppState;

/// Session lifetime with "remember me".
const REMEMBER_DAYS: i64 = 30;

/// GET /login
pub async fn login_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: OptionalSession,
) -> HttpResponse {
    if session.0.is_some() {
        return redirect("/admin/posts");
    }
    render(&req, &state, "auth/login", json!({}))
}

/// POST /login - JSON or urlencoded body.
pub async fn login(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Either<web::Json<LoginRequest>, web::Form<LoginRequest>>,
) -> AppResult<HttpResponse> {
    let login = match body {
        web::Either::Left(json) => json.into_inner(),
        web::Either::Right(form) => form.into_inner(),
    };

    let client = req
        .connection_info()
        .realip_remote_addr()
        .unwrap_or("unknown")
        .to_string();
    let limit = state
        .login_limiter
        .check(&client)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    if !limit.allowed {
        tracing::warn!(client = %client, "Login rate limit exceeded");
        return Err(AppError::TooManyRequests(limit.retry_after));
    }

    let user = match state.accounts.authenticate(&login.email, &login.password).await {
        Ok(user) => user,
        Err(DomainError::Unauthorized) => {
            tracing::info!(client = %client, "Rejected login attempt");
            return Err(AppError::field("email", INVALID_CREDENTIALS));
        }
        Err(e) => return Err(e.into()),
    };

    let ttl = if login.remember {
        Duration::days(REMEMBER_DAYS)
    } else {
        state.tokens.default_ttl()
    };
    let token = state
        .tokens
        .issue(user.id, &user.email, ttl)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::info!(user_id = %user.id, remember = login.remember, "Admin signed in");

    let mut response = redirect("/admin/posts");
    response
        .add_cookie(&session_cookie(token, ttl, state.site.is_https()))
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(response)
}

/// POST /logout
pub async fn logout() -> AppResult<HttpResponse> {
    let mut response = redirect("/login");
    response
        .add_cookie(&removal_cookie())
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(response)
}
