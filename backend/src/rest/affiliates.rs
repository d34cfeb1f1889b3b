use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::info;

use shared::{
    AffiliateActionRequest, AffiliateActionResponse, AffiliateApplyRequest, AffiliateApplyResponse,
};

use crate::domain::auth::SessionUser;
use crate::domain::error::DomainError;
use crate::rest::AppState;

/// Public route; no session required.
pub async fn apply(
    State(state): State<AppState>,
    Json(request): Json<AffiliateApplyRequest>,
) -> Result<impl IntoResponse, DomainError> {
    info!("POST /api/affiliate/apply");
    let outcome = state.affiliates.apply(request)?;
    Ok((
        StatusCode::CREATED,
        Json(AffiliateApplyResponse {
            success: true,
            reapplication: outcome.reapplication,
        }),
    ))
}

pub async fn list_applications(
    State(state): State<AppState>,
    ctx: SessionUser,
) -> Result<impl IntoResponse, DomainError> {
    let applications = state.affiliates.list_applications(&ctx)?;
    Ok(Json(applications))
}

pub async fn action(
    State(state): State<AppState>,
    ctx: SessionUser,
    Path(application_id): Path<String>,
    Json(request): Json<AffiliateActionRequest>,
) -> Result<impl IntoResponse, DomainError> {
    info!("PATCH /api/affiliate/{}", application_id);
    let application = state.affiliates.action(&ctx, &application_id, request)?;
    Ok(Json(AffiliateActionResponse {
        success: true,
        referral_code: application.referral_code,
    }))
}
