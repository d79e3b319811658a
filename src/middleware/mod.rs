//! HTTP middleware components.
//!
//! Both gates run before route handlers and short-circuit with a 401 envelope
//! when the credential is missing or wrong.

/// Admin secret gate for `/admin/v1`
pub mod admin;
/// API key authentication for `/api/v1`
pub mod auth;
