use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::domain::auth::SessionUser;
use crate::domain::error::DomainError;
use crate::rest::AppState;

pub async fn get_dashboard(
    State(state): State<AppState>,
    ctx: SessionUser,
) -> Result<impl IntoResponse, DomainError> {
    let metrics = state.dashboard.metrics(&ctx)?;
    Ok(Json(metrics))
}
