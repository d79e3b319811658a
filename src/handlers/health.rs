//! Health check and connectivity endpoints.

use axum::{Extension, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    db::DbPool, error::AppError, middleware::auth::AuthContext, response::ApiResponse,
};

/// Health check payload.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    /// Database connection status
    pub database: &'static str,

    /// Current server timestamp
    pub timestamp: DateTime<Utc>,
}

/// Health check handler.
///
/// # Checks
///
/// - Database connectivity (executes simple query)
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "status": 200,
///   "message": "ok",
///   "data": { "database": "connected", "timestamp": "2025-12-21T19:00:00Z" }
/// }
/// ```
///
/// If the database is unreachable the standard error envelope is returned instead.
pub async fn health_check(State(pool): State<DbPool>) -> Result<ApiResponse<HealthStatus>, AppError> {
    sqlx::query("SELECT 1").execute(&pool).await?;

    Ok(ApiResponse::success(
        StatusCode::OK,
        "ok",
        HealthStatus {
            database: "connected",
            timestamp: Utc::now(),
        },
    ))
}

/// Lets a client confirm its API key is accepted.
pub async fn ping(Extension(auth): Extension<AuthContext>) -> ApiResponse<()> {
    tracing::debug!(api_key_id = %auth.api_key_id, name = %auth.name, "ping");

    ApiResponse::message(StatusCode::OK, "pong")
}
