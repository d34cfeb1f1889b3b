use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::info;

use shared::CreateIncidentRequest;

use crate::domain::auth::SessionUser;
use crate::domain::error::DomainError;
use crate::rest::AppState;

pub async fn list_incidents(
    State(state): State<AppState>,
    ctx: SessionUser,
) -> Result<impl IntoResponse, DomainError> {
    let incidents = state.incidents.list_incidents(&ctx)?;
    Ok(Json(incidents))
}

pub async fn report_incident(
    State(state): State<AppState>,
    ctx: SessionUser,
    Json(request): Json<CreateIncidentRequest>,
) -> Result<impl IntoResponse, DomainError> {
    info!("POST /api/incidents - child {}", request.child_id);
    let incident = state.incidents.report_incident(&ctx, request)?;
    Ok((StatusCode::CREATED, Json(incident)))
}

pub async fn mark_parent_notified(
    State(state): State<AppState>,
    ctx: SessionUser,
    Path(incident_id): Path<String>,
) -> Result<impl IntoResponse, DomainError> {
    info!("POST /api/incidents/{}/notify", incident_id);
    let incident = state.incidents.mark_parent_notified(&ctx, &incident_id)?;
    Ok(Json(incident))
}
