//! Admin session extractors and the session cookie.

use std::future::{Ready, ready};

use actix_web::cookie::{Cookie, SameSite, time};
use actix_web::http::{StatusCode, header};
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, dev::Payload, web};
use uuid::Uuid;

use lekha_core::ports::{AuthError, SessionClaims};
use lekha_shared::ErrorResponse;

use crate::render::is_inertia;
use crate::state::AppState;

/// Cookie holding the signed session token.
pub const SESSION_COOKIE: &str = "lekha_session";

/// Signed-in admin.
///
/// HTML navigations without a valid session are redirected to `/login`;
/// JSON clients get a 401 problem body.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub user_id: Uuid,
    pub email: String,
}

impl From<SessionClaims> for AdminSession {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
        }
    }
}

/// Error type for authentication failures.
#[derive(Debug)]
pub struct AuthenticationError {
    cause: AuthError,
    wants_json: bool,
}

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.cause)
    }
}

impl ResponseError for AuthenticationError {
    fn status_code(&self) -> StatusCode {
        if self.wants_json {
            StatusCode::UNAUTHORIZED
        } else {
            StatusCode::SEE_OTHER
        }
    }

    fn error_response(&self) -> HttpResponse {
        if !self.wants_json {
            return HttpResponse::SeeOther()
                .insert_header((header::LOCATION, "/login"))
                .finish();
        }

        let error = match &self.cause {
            AuthError::TokenExpired => ErrorResponse::new(401, "Session Expired")
                .with_detail("Your session has expired. Please sign in again."),
            AuthError::InvalidToken(_) => {
                ErrorResponse::new(401, "Invalid Session").with_detail("Please sign in again.")
            }
            _ => ErrorResponse::new(401, "Authentication Required")
                .with_detail("Sign in or provide a Bearer token in the Authorization header."),
        };

        HttpResponse::Unauthorized().json(error)
    }
}

/// JSON callers (API clients, XHR) as opposed to page navigations.
fn wants_json(req: &HttpRequest) -> bool {
    if is_inertia(req) {
        return false;
    }
    let accepts_json = req
        .headers()
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));
    accepts_json || bearer_token(req).is_some()
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
}

/// Session token from the `Authorization` header, falling back to the cookie.
fn session_token(req: &HttpRequest) -> Option<String> {
    bearer_token(req).or_else(|| req.cookie(SESSION_COOKIE).map(|c| c.value().to_string()))
}

/// Decode the request's session, if any.
pub fn current_session(req: &HttpRequest) -> Result<AdminSession, AuthError> {
    let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
        tracing::error!("AppState not found in app data");
        AuthError::InvalidToken("Server configuration error".to_string())
    })?;
    let token = session_token(req).ok_or(AuthError::MissingSession)?;
    state.tokens.validate(&token).map(AdminSession::from)
}

impl FromRequest for AdminSession {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(current_session(req).map_err(|cause| {
            tracing::debug!(error = %cause, path = %req.path(), "Admin session rejected");
            AuthenticationError {
                cause,
                wants_json: wants_json(req),
            }
        }))
    }
}

/// Optional session extractor - doesn't fail if not signed in.
pub struct OptionalSession(pub Option<AdminSession>);

impl FromRequest for OptionalSession {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(OptionalSession(current_session(req).ok())))
    }
}

/// HttpOnly, SameSite=Lax session cookie living as long as the token.
pub fn session_cookie(token: String, ttl: chrono::Duration, secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(ttl.num_seconds()))
        .finish()
}

/// Expired session cookie that clears the browser's copy.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish();
    cookie.make_removal();
    cookie
}
