//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Extracts request data (JSON body, path id, query string), turning rejections into 400s
//! 2. Validates it into a typed value and calls the matching service
//! 3. Wraps the result in the response envelope

/// Admin API key management endpoints
pub mod api_keys;
/// Category endpoints
pub mod categories;
/// Liveness and key check endpoints
pub mod health;
/// Transaction endpoints
pub mod transactions;
