//! API key administration handlers.
//!
//! This module implements the admin endpoints, all behind the `X-Admin-Key` gate:
//! - POST /admin/v1/api-keys - Issue a key (plaintext shown once)
//! - GET /admin/v1/api-keys - List keys
//! - GET /admin/v1/api-keys/{id} - Get key details
//! - PATCH /admin/v1/api-keys/{id} - Rename or (de)activate
//! - DELETE /admin/v1/api-keys/{id} - Delete

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::api_key::{
        ApiKeyList, ApiKeyListQuery, ApiKeyResponse, CreateApiKeyRequest, UpdateApiKeyRequest,
    },
    response::ApiResponse,
    services::api_key_service,
};

/// Issue a new API key.
///
/// # Request Body
///
/// ```json
/// { "name": "budget-frontend" }
/// ```
///
/// # Response (201)
///
/// The `key` field is present only in this response.
pub async fn create_api_key(
    State(pool): State<DbPool>,
    body: Result<Json<CreateApiKeyRequest>, JsonRejection>,
) -> Result<ApiResponse<ApiKeyResponse>, AppError> {
    let Json(request) = body?;
    let new_key = request.validate()?;

    let api_key = api_key_service::create_api_key(&pool, new_key).await?;

    Ok(ApiResponse::created(
        "API key created. Save this key, it won't be shown again.",
        api_key,
    ))
}

pub async fn list_api_keys(
    State(pool): State<DbPool>,
    query: Result<Query<ApiKeyListQuery>, QueryRejection>,
) -> Result<ApiResponse<ApiKeyList>, AppError> {
    let Query(query) = query?;
    let page = query.page();

    let (api_keys, total) = api_key_service::list_api_keys(&pool, page).await?;

    Ok(ApiResponse::ok(ApiKeyList {
        api_keys: api_keys.into_iter().map(Into::into).collect(),
        total,
        page,
    }))
}

pub async fn get_api_key(
    State(pool): State<DbPool>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<ApiResponse<ApiKeyResponse>, AppError> {
    let Path(id) = id?;

    let api_key = api_key_service::get_api_key(&pool, id).await?;

    Ok(ApiResponse::ok(api_key.into()))
}

pub async fn update_api_key(
    State(pool): State<DbPool>,
    id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<UpdateApiKeyRequest>, JsonRejection>,
) -> Result<ApiResponse<ApiKeyResponse>, AppError> {
    let Path(id) = id?;
    let Json(request) = body?;
    let changes = request.validate()?;

    let api_key = api_key_service::update_api_key(&pool, id, changes).await?;

    Ok(ApiResponse::success(
        StatusCode::OK,
        "API key updated",
        api_key.into(),
    ))
}

pub async fn delete_api_key(
    State(pool): State<DbPool>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<ApiResponse<()>, AppError> {
    let Path(id) = id?;

    api_key_service::delete_api_key(&pool, id).await?;

    Ok(ApiResponse::message(StatusCode::OK, "API key deleted"))
}
