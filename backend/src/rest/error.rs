//! Maps domain failures onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use shared::ErrorResponse;

use crate::domain::error::DomainError;

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            DomainError::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            DomainError::Forbidden(message) => (StatusCode::FORBIDDEN, message.clone()),
            DomainError::NotFound(message) => (StatusCode::NOT_FOUND, message.clone()),
            DomainError::Conflict(message) => (StatusCode::CONFLICT, message.clone()),
            DomainError::Storage(err) => {
                // Internals are logged, never leaked to the caller.
                error!("Storage failure: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// 401 body for requests without a usable session.
pub fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}
