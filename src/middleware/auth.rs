//! API key authentication middleware.
//!
//! This middleware intercepts every `/api/v1` request to:
//! 1. Extract the API key from the `X-API-Key` header
//! 2. Validate it against the stored hashes (active keys only)
//! 3. Inject authentication context into the request
//! 4. Reject unauthorized requests with HTTP 401

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{db::DbPool, error::AppError, services::api_key_service};

/// Header carrying the client API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Authentication context attached to authenticated requests.
///
/// This struct is inserted into the request's extension map and can be
/// extracted by route handlers to know who made the request.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// ID of the authenticated API key
    pub api_key_id: Uuid,

    /// Display name of the key
    pub name: String,
}

/// API key authentication middleware function.
///
/// # Flow
///
/// 1. Read the `X-API-Key` header; missing or empty is rejected without touching the store
/// 2. Look up an active key with a matching hash, stamping `last_used_at`
/// 3. If found: inject `AuthContext` into request, call next handler
/// 4. If not found: return 401 Unauthorized
pub async fn api_key_middleware(
    State(pool): State<DbPool>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let key = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|key| !key.is_empty())
        .ok_or(AppError::Unauthorized)?;

    let api_key = api_key_service::validate_key(&pool, key).await?;

    // Route handlers can now extract this using Extension<AuthContext>
    request.extensions_mut().insert(AuthContext {
        api_key_id: api_key.id,
        name: api_key.name,
    });

    Ok(next.run(request).await)
}
