//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::models::ValidationError;
use crate::service::ServiceError;
use crate::store::StoreError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (422)
    Validation(ValidationError),

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Unique name already taken (400)
    AlreadyExists { message: String },

    /// Other store constraint failure (400, detail logged)
    Constraint { message: String },

    /// Database error (500, logged)
    Database(StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Validation(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "error": "validation_failed",
                    "message": e.to_string(),
                    "field": e.field(),
                }),
            ),
            Self::NotFound { resource, id } => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "not_found",
                    "message": format!("{} '{}' not found", resource, id)
                }),
            ),
            Self::AlreadyExists { message } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "already_exists",
                    "message": message
                }),
            ),
            Self::Constraint { message } => {
                tracing::warn!("Constraint violation: {}", message);
                (
                    StatusCode::BAD_REQUEST,
                    json!({
                        "error": "constraint_violation",
                        "message": "Database constraint violation"
                    }),
                )
            }
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "internal_error",
                        "message": "an internal error occurred"
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(e) => Self::Validation(e),
            ServiceError::NotFound { id } => Self::NotFound {
                resource: "Product",
                id: id.to_string(),
            },
            e @ ServiceError::AlreadyExists { .. } => Self::AlreadyExists {
                message: e.to_string(),
            },
            ServiceError::ConstraintViolation { message } => Self::Constraint { message },
            ServiceError::Store(e) => Self::Database(e),
        }
    }
}
