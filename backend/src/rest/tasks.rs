use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::info;

use shared::{CreateTaskRequest, SetTaskStatusRequest};

use crate::domain::auth::SessionUser;
use crate::domain::error::DomainError;
use crate::rest::AppState;

pub async fn list_tasks(
    State(state): State<AppState>,
    ctx: SessionUser,
) -> Result<impl IntoResponse, DomainError> {
    let tasks = state.tasks.list_tasks(&ctx)?;
    Ok(Json(tasks))
}

pub async fn create_task(
    State(state): State<AppState>,
    ctx: SessionUser,
    Json(request): Json<CreateTaskRequest>,
) -> Result<impl IntoResponse, DomainError> {
    info!("POST /api/tasks - {}", request.title);
    let task = state.tasks.create_task(&ctx, request)?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn set_status(
    State(state): State<AppState>,
    ctx: SessionUser,
    Path(task_id): Path<String>,
    Json(request): Json<SetTaskStatusRequest>,
) -> Result<impl IntoResponse, DomainError> {
    info!("POST /api/tasks/{}/status - {}", task_id, request.status);
    let task = state.tasks.set_status(&ctx, &task_id, request)?;
    Ok(Json(task))
}
