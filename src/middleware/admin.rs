//! Admin secret gate.
//!
//! Guards the `/admin/v1` routes with the shared secret from `ADMIN_API_KEY`.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{error::AppError, state::AdminKey};

/// Header carrying the admin secret.
pub const ADMIN_KEY_HEADER: &str = "X-Admin-Key";

/// Admin authentication middleware function.
///
/// A missing header is compared as an empty value, so a missing and a wrong secret
/// follow the same path and produce the same 401 response.
pub async fn admin_middleware(
    State(admin_key): State<AdminKey>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let presented = request
        .headers()
        .get(ADMIN_KEY_HEADER)
        .map(|value| value.as_bytes())
        .unwrap_or_default();

    if !admin_key.matches(presented) {
        tracing::warn!(path = %request.uri().path(), "admin request rejected");
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}
