use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::info;

use shared::{CreateChildRequest, UpdateChildRequest};

use crate::domain::auth::SessionUser;
use crate::domain::error::DomainError;
use crate::rest::AppState;

pub async fn list_children(
    State(state): State<AppState>,
    ctx: SessionUser,
) -> Result<impl IntoResponse, DomainError> {
    let children = state.children.list_children(&ctx)?;
    Ok(Json(children))
}

pub async fn create_child(
    State(state): State<AppState>,
    ctx: SessionUser,
    Json(request): Json<CreateChildRequest>,
) -> Result<impl IntoResponse, DomainError> {
    info!("POST /api/children - {} {}", request.first_name, request.last_name);
    let child = state.children.create_child(&ctx, request)?;
    Ok((StatusCode::CREATED, Json(child)))
}

pub async fn get_child(
    State(state): State<AppState>,
    ctx: SessionUser,
    Path(child_id): Path<String>,
) -> Result<impl IntoResponse, DomainError> {
    let child = state.children.get_child(&ctx, &child_id)?;
    Ok(Json(child))
}

pub async fn update_child(
    State(state): State<AppState>,
    ctx: SessionUser,
    Path(child_id): Path<String>,
    Json(request): Json<UpdateChildRequest>,
) -> Result<impl IntoResponse, DomainError> {
    info!("PUT /api/children/{}", child_id);
    let child = state.children.update_child(&ctx, &child_id, request)?;
    Ok(Json(child))
}

pub async fn delete_child(
    State(state): State<AppState>,
    ctx: SessionUser,
    Path(child_id): Path<String>,
) -> Result<impl IntoResponse, DomainError> {
    info!("DELETE /api/children/{}", child_id);
    state.children.delete_child(&ctx, &child_id)?;
    Ok(StatusCode::NO_CONTENT)
}
