use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::info;

use shared::CreateInvoiceRequest;

use crate::domain::auth::SessionUser;
use crate::domain::error::DomainError;
use crate::rest::AppState;

pub async fn list_invoices(
    State(state): State<AppState>,
    ctx: SessionUser,
) -> Result<impl IntoResponse, DomainError> {
    let invoices = state.invoices.list_invoices(&ctx)?;
    Ok(Json(invoices))
}

pub async fn create_invoice(
    State(state): State<AppState>,
    ctx: SessionUser,
    Json(request): Json<CreateInvoiceRequest>,
) -> Result<impl IntoResponse, DomainError> {
    info!("POST /api/invoices - child {}", request.child_id);
    let invoice = state.invoices.create_invoice(&ctx, request)?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

pub async fn mark_paid(
    State(state): State<AppState>,
    ctx: SessionUser,
    Path(invoice_id): Path<String>,
) -> Result<impl IntoResponse, DomainError> {
    info!("POST /api/invoices/{}/pay", invoice_id);
    let invoice = state.invoices.mark_paid(&ctx, &invoice_id)?;
    Ok(Json(invoice))
}
