use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use shared::{CheckInRequest, CheckOutRequest, MarkAbsenceRequest, RegisterSummary};

use crate::domain::auth::SessionUser;
use crate::domain::error::DomainError;
use crate::domain::models::attendance::Attendance;
use crate::rest::AppState;

#[derive(Serialize)]
pub struct RegisterResponse {
    pub summary: RegisterSummary,
    pub records: Vec<Attendance>,
}

pub async fn todays_register(
    State(state): State<AppState>,
    ctx: SessionUser,
) -> Result<impl IntoResponse, DomainError> {
    let today = Utc::now().date_naive();
    let summary = state.attendance.summary_for_date(&ctx, today)?;
    let records = state.attendance.register_for_date(&ctx, today)?;
    Ok(Json(RegisterResponse { summary, records }))
}

pub async fn check_in(
    State(state): State<AppState>,
    ctx: SessionUser,
    Json(request): Json<CheckInRequest>,
) -> Result<impl IntoResponse, DomainError> {
    info!("POST /api/attendance/check-in - child {}", request.child_id);
    let record = state.attendance.check_in(&ctx, request)?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn mark_absence(
    State(state): State<AppState>,
    ctx: SessionUser,
    Json(request): Json<MarkAbsenceRequest>,
) -> Result<impl IntoResponse, DomainError> {
    info!(
        "POST /api/attendance/absence - child {} {}",
        request.child_id, request.status
    );
    let date = crate::domain::child_service::parse_date(&request.date, "date")?;
    let status = crate::domain::models::attendance::AttendanceStatus::parse(&request.status)
        .ok_or_else(|| {
            DomainError::validation("status must be ABSENT, SICK or HOLIDAY")
        })?;
    let record = state
        .attendance
        .mark_absence(&ctx, &request.child_id, date, status)?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn check_out(
    State(state): State<AppState>,
    ctx: SessionUser,
    Path(attendance_id): Path<String>,
    Json(request): Json<CheckOutRequest>,
) -> Result<impl IntoResponse, DomainError> {
    info!("POST /api/attendance/{}/check-out", attendance_id);
    let record = state.attendance.check_out(&ctx, &attendance_id, request)?;
    Ok(Json(record))
}
