use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use shared::{ApprovalQueueSummary, SaveDailyNoteRequest};

use crate::domain::auth::SessionUser;
use crate::domain::daily_update_service::ApprovalQueueEntry;
use crate::domain::error::DomainError;
use crate::domain::models::daily_update::{DailyNote, DailyUpdate};
use crate::rest::AppState;

#[derive(Serialize)]
pub struct SaveNoteResponse {
    pub note: DailyNote,
    pub update: DailyUpdate,
}

#[derive(Serialize)]
pub struct ApprovalQueueResponse {
    pub entries: Vec<ApprovalQueueEntry>,
    pub summary: ApprovalQueueSummary,
}

pub async fn save_note(
    State(state): State<AppState>,
    ctx: SessionUser,
    Path((child_id, date)): Path<(String, String)>,
    Json(request): Json<SaveDailyNoteRequest>,
) -> Result<impl IntoResponse, DomainError> {
    info!("PUT /api/daily-notes/{}/{}", child_id, date);
    let date = crate::domain::child_service::parse_date(&date, "date")?;
    let (note, update) = state.daily_updates.save_note(&ctx, &child_id, date, request)?;
    Ok(Json(SaveNoteResponse { note, update }))
}

pub async fn approval_queue(
    State(state): State<AppState>,
    ctx: SessionUser,
) -> Result<impl IntoResponse, DomainError> {
    let today = Utc::now().date_naive();
    let (entries, summary) = state.daily_updates.approval_queue(&ctx, today)?;
    Ok(Json(ApprovalQueueResponse { entries, summary }))
}

pub async fn approve(
    State(state): State<AppState>,
    ctx: SessionUser,
    Path(update_id): Path<String>,
) -> Result<impl IntoResponse, DomainError> {
    info!("POST /api/daily-updates/{}/approve", update_id);
    let (update, _approval) = state.daily_updates.approve(&ctx, &update_id)?;
    Ok(Json(update))
}

pub async fn dispatch_due(
    State(state): State<AppState>,
    ctx: SessionUser,
) -> Result<impl IntoResponse, DomainError> {
    info!("POST /api/daily-updates/dispatch-due");
    let report = state.daily_updates.dispatch_due(&ctx, Utc::now())?;
    Ok(Json(report))
}
