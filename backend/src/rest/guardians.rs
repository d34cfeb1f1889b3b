use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use tracing::info;

use shared::{CreateGuardianRequest, LinkGuardianRequest};

use crate::domain::auth::SessionUser;
use crate::domain::error::DomainError;
use crate::domain::models::guardian::Guardian;
use crate::rest::AppState;

#[derive(Serialize)]
pub struct LinkedGuardian {
    #[serde(flatten)]
    pub guardian: Guardian,
    pub is_primary: bool,
}

pub async fn create_guardian(
    State(state): State<AppState>,
    ctx: SessionUser,
    Json(request): Json<CreateGuardianRequest>,
) -> Result<impl IntoResponse, DomainError> {
    info!("POST /api/guardians - {} {}", request.first_name, request.last_name);
    let guardian = state.guardians.create_guardian(&ctx, request)?;
    Ok((StatusCode::CREATED, Json(guardian)))
}

pub async fn link_guardian(
    State(state): State<AppState>,
    ctx: SessionUser,
    Path((child_id, guardian_id)): Path<(String, String)>,
    Json(request): Json<LinkGuardianRequest>,
) -> Result<impl IntoResponse, DomainError> {
    info!("POST /api/children/{}/guardians/{}", child_id, guardian_id);
    state
        .guardians
        .link_guardian(&ctx, &child_id, &guardian_id, request)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn guardians_for_child(
    State(state): State<AppState>,
    ctx: SessionUser,
    Path(child_id): Path<String>,
) -> Result<impl IntoResponse, DomainError> {
    let linked: Vec<LinkedGuardian> = state
        .guardians
        .guardians_for_child(&ctx, &child_id)?
        .into_iter()
        .map(|(guardian, is_primary)| LinkedGuardian {
            guardian,
            is_primary,
        })
        .collect();
    Ok(Json(linked))
}
