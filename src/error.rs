//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and envelope bodies.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::response::ApiResponse;

/// Application-wide error type.
///
/// Each variant maps to a specific HTTP status code and envelope message.
///
/// # Error Categories
///
/// - **Validation Errors**: malformed or out-of-range input, reported per field
/// - **Authentication Errors**: missing, unknown, or inactive credentials
/// - **Resource Errors**: requested record not found
/// - **Store Errors**: constraint violations, unavailable store, anything else from sqlx
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// One or more request fields are invalid.
    ///
    /// Returns HTTP 400 Bad Request. Each entry names the offending field.
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Credential is missing, wrong, or belongs to an inactive key.
    ///
    /// Returns HTTP 401 Unauthorized. The message never reveals which of those it was.
    #[error("Unauthorized")]
    Unauthorized,

    /// No record exists for the given id.
    ///
    /// Returns HTTP 404 Not Found. Holds the entity name used in the message.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The store rejected a write because of a unique, foreign-key, or check constraint.
    ///
    /// Returns HTTP 409 Conflict. The detail is logged, not returned.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// The store could not be reached (pool exhausted or closed, I/O or TLS failure).
    ///
    /// Returns HTTP 503 Service Unavailable.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(sqlx::Error),

    /// Any other database failure.
    ///
    /// Returns HTTP 500 Internal Server Error (hides details from client).
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl AppError {
    /// Shorthand for a single-field validation failure.
    pub fn invalid(message: impl Into<String>) -> Self {
        AppError::Validation(vec![message.into()])
    }
}

/// Classify sqlx errors into the store error variants.
///
/// SQLSTATE class 23 covers every integrity constraint violation
/// (`23505` unique, `23503` foreign key, `23514` check, ...).
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err)
                if db_err.code().is_some_and(|code| code.starts_with("23")) =>
            {
                AppError::ConstraintViolation(db_err.message().to_string())
            }
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => AppError::StoreUnavailable(err),
            _ => AppError::Database(err),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::invalid(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::invalid(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::invalid(rejection.body_text())
    }
}

/// Convert AppError into an HTTP response.
///
/// All errors use the standard envelope without a `data` field:
/// ```json
/// {
///   "status": 404,
///   "message": "Category not found"
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `Validation` → 400 Bad Request
/// - `Unauthorized` → 401 Unauthorized
/// - `NotFound` → 404 Not Found
/// - `ConstraintViolation` → 409 Conflict
/// - `StoreUnavailable` → 503 Service Unavailable
/// - `Database` → 500 Internal Server Error
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Invalid or missing credentials".to_string(),
            ),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::ConstraintViolation(detail) => {
                tracing::warn!(detail = %detail, "store constraint rejected write");
                (
                    StatusCode::CONFLICT,
                    "Request conflicts with existing data".to_string(),
                )
            }
            AppError::StoreUnavailable(err) => {
                tracing::error!(error = %err, "store unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Service temporarily unavailable".to_string(),
                )
            }
            AppError::Database(err) => {
                tracing::error!(error = %err, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        ApiResponse::message(status, message).into_response()
    }
}
