//! Maps domain errors to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use ticketboss_core::error::{AppError, ErrorKind};
use ticketboss_service::ReservationError;

/// Message shown in place of internal error details.
const INTERNAL_MESSAGE: &str = "Internal server error";

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// Handler error: an [`AppError`] on its way to the client.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// A 400 response with the given message.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(AppError::invalid_input(message))
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self.0.kind {
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::InsufficientCapacity | ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Internal
            | ErrorKind::Database
            | ErrorKind::Configuration
            | ErrorKind::Serialization => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<ReservationError> for ApiError {
    fn from(err: ReservationError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let err = self.0;

        let (error_code, message) = if err.kind.is_client_facing() {
            (err.kind.to_string(), err.message)
        } else if status == StatusCode::SERVICE_UNAVAILABLE {
            tracing::warn!(error = %err, "Service unavailable");
            (err.kind.to_string(), "Service temporarily unavailable".to_string())
        } else {
            tracing::error!(
                kind = %err.kind,
                error = %err.message,
                source = ?err.source,
                "Internal server error"
            );
            ("INTERNAL_ERROR".to_string(), INTERNAL_MESSAGE.to_string())
        };

        let body = ApiErrorResponse {
            error: error_code,
            message,
        };

        (status, Json(body)).into_response()
    }
}
