use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use tracing::info;

use shared::UpdateOrganisationSettingsRequest;

use crate::domain::auth::SessionUser;
use crate::domain::error::DomainError;
use crate::rest::AppState;

pub async fn get_settings(
    State(state): State<AppState>,
    ctx: SessionUser,
) -> Result<impl IntoResponse, DomainError> {
    let settings = state.organisation.get_settings(&ctx)?;
    Ok(Json(settings))
}

pub async fn update_settings(
    State(state): State<AppState>,
    ctx: SessionUser,
    Json(request): Json<UpdateOrganisationSettingsRequest>,
) -> Result<impl IntoResponse, DomainError> {
    info!("PUT /api/settings/organisation");
    let settings = state.organisation.update_settings(&ctx, request)?;
    Ok(Json(settings))
}
