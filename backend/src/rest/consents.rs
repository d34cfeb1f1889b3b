use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::info;

use shared::{CreateConsentTemplateRequest, UpsertConsentRequest};

use crate::domain::auth::SessionUser;
use crate::domain::error::DomainError;
use crate::rest::AppState;

pub async fn overview(
    State(state): State<AppState>,
    ctx: SessionUser,
) -> Result<impl IntoResponse, DomainError> {
    let overview = state.consents.overview(&ctx)?;
    Ok(Json(overview))
}

pub async fn create_template(
    State(state): State<AppState>,
    ctx: SessionUser,
    Json(request): Json<CreateConsentTemplateRequest>,
) -> Result<impl IntoResponse, DomainError> {
    info!("POST /api/consent-templates - {}", request.name);
    let template = state.consents.create_template(&ctx, request)?;
    Ok((StatusCode::CREATED, Json(template)))
}

pub async fn upsert_consent(
    State(state): State<AppState>,
    ctx: SessionUser,
    Json(request): Json<UpsertConsentRequest>,
) -> Result<impl IntoResponse, DomainError> {
    info!(
        "POST /api/consents - child {} template {}",
        request.child_id, request.template_id
    );
    let record = state.consents.upsert_consent(&ctx, request)?;
    Ok(Json(record))
}

pub async fn consents_for_child(
    State(state): State<AppState>,
    ctx: SessionUser,
    Path(child_id): Path<String>,
) -> Result<impl IntoResponse, DomainError> {
    let records = state.consents.consents_for_child(&ctx, &child_id)?;
    Ok(Json(records))
}
