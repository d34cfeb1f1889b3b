use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::info;

use shared::{CreateEvidenceRequest, SetEvidenceStatusRequest};

use crate::domain::auth::SessionUser;
use crate::domain::error::DomainError;
use crate::rest::AppState;

pub async fn list_items(
    State(state): State<AppState>,
    ctx: SessionUser,
) -> Result<impl IntoResponse, DomainError> {
    let items = state.evidence.list_items(&ctx)?;
    Ok(Json(items))
}

pub async fn create_item(
    State(state): State<AppState>,
    ctx: SessionUser,
    Json(request): Json<CreateEvidenceRequest>,
) -> Result<impl IntoResponse, DomainError> {
    info!("POST /api/evidence - {}", request.name);
    let item = state.evidence.create_item(&ctx, request)?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn set_status(
    State(state): State<AppState>,
    ctx: SessionUser,
    Path(item_id): Path<String>,
    Json(request): Json<SetEvidenceStatusRequest>,
) -> Result<impl IntoResponse, DomainError> {
    info!("POST /api/evidence/{}/status - {}", item_id, request.status);
    let item = state.evidence.set_status(&ctx, &item_id, request)?;
    Ok(Json(item))
}
