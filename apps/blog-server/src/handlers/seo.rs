//! SEO assistant endpoint.

use actix_web::{HttpResponse, web};

use lekha_core::seo::validate_request;
use lekha_shared::dto::SeoGenerateRequest;

use crate::middleware::auth::AdminSession;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /admin/seo/generate
///
/// Always answers with a suggestion bundle once the input is valid;
/// `success` tells whether it came from the AI provider.
pub async fn generate(
    state: web::Data<AppState>,
    _session: AdminSession,
    body: web::Json<SeoGenerateRequest>,
) -> AppResult<HttpResponse> {
    let request = body.into_inner();
    validate_request(&request.title, &request.content)?;

    let suggestion = state.seo.generate(&request.title, &request.content).await;
    tracing::debug!(success = suggestion.success, score = suggestion.seo_score, "SEO suggestions generated");

    Ok(HttpResponse::Ok().json(suggestion))
}
