//! Category HTTP handlers.
//!
//! - POST /api/v1/categories - Create a category
//! - GET /api/v1/categories - List, optionally filtered by `type`
//! - GET /api/v1/categories/{id} - Get category
//! - PATCH /api/v1/categories/{id} - Partial update
//! - DELETE /api/v1/categories/{id} - Delete (409 while transactions reference it)

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
    models::category::{
        Category, CategoryList, CategoryListQuery, CreateCategoryRequest, UpdateCategoryRequest,
    },
    response::ApiResponse,
    services::category_service,
};

/// Create a category.
///
/// # Request Body
///
/// ```json
/// { "name": "Groceries", "type": "expense" }
/// ```
pub async fn create_category(
    State(pool): State<DbPool>,
    body: Result<Json<CreateCategoryRequest>, JsonRejection>,
) -> Result<ApiResponse<Category>, AppError> {
    let Json(request) = body?;
    let new_category = request.validate()?;

    let category = category_service::create_category(&pool, new_category).await?;

    Ok(ApiResponse::created("Category created", category))
}

pub async fn list_categories(
    State(pool): State<DbPool>,
    query: Result<Query<CategoryListQuery>, QueryRejection>,
) -> Result<ApiResponse<CategoryList>, AppError> {
    let Query(query) = query?;
    let (filter, page) = query.validate()?;

    let (categories, total) = category_service::list_categories(&pool, filter, page).await?;

    Ok(ApiResponse::ok(CategoryList {
        categories,
        total,
        page,
    }))
}

pub async fn get_category(
    State(pool): State<DbPool>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<ApiResponse<Category>, AppError> {
    let Path(id) = id?;

    let category = category_service::get_category(&pool, id).await?;

    Ok(ApiResponse::ok(category))
}

pub async fn update_category(
    State(pool): State<DbPool>,
    id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<UpdateCategoryRequest>, JsonRejection>,
) -> Result<ApiResponse<Category>, AppError> {
    let Path(id) = id?;
    let Json(request) = body?;
    let changes = request.validate()?;

    let category = category_service::update_category(&pool, id, changes).await?;

    Ok(ApiResponse::success(StatusCode::OK, "Category updated", category))
}

pub async fn delete_category(
    State(pool): State<DbPool>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<ApiResponse<()>, AppError> {
    let Path(id) = id?;

    category_service::delete_category(&pool, id).await?;

    Ok(ApiResponse::message(StatusCode::OK, "Category deleted"))
}
