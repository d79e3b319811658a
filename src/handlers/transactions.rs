//! Transaction HTTP handlers.
//!
//! This module implements transaction-related API endpoints:
//! - POST /api/v1/transactions - Record a transaction
//! - GET /api/v1/transactions - Filtered, paginated listing
//! - GET /api/v1/transactions/{id} - Get transaction details
//! - PATCH /api/v1/transactions/{id} - Partial update
//! - DELETE /api/v1/transactions/{id} - Delete

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
    models::transaction::{
        CreateTransactionRequest, Transaction, TransactionList, TransactionListQuery,
        UpdateTransactionRequest,
    },
    response::ApiResponse,
    services::transaction_service,
};

/// Record a transaction.
///
/// # Request Body
///
/// ```json
/// {
///   "type": "expense",
///   "category_id": "550e8400-...",
///   "amount": 42.50,
///   "description": "Weekly shop",
///   "date": "2025-01-15"
/// }
/// ```
///
/// `currency` defaults to `IDR`, `status` to `completed`, `date` to today.
///
/// # Response (201)
///
/// The stored transaction including the joined `category_name`.
pub async fn create_transaction(
    State(pool): State<DbPool>,
    body: Result<Json<CreateTransactionRequest>, JsonRejection>,
) -> Result<ApiResponse<Transaction>, AppError> {
    let Json(request) = body?;
    let new_tx = request.validate()?;

    let transaction = transaction_service::create_transaction(&pool, new_tx).await?;

    Ok(ApiResponse::created("Transaction created", transaction))
}

/// List transactions, newest date first.
///
/// # Query Parameters
///
/// `type`, `category_id`, `status`, `date_from`, `date_to` (inclusive, `YYYY-MM-DD`),
/// `page`, `limit`. Every supplied filter must match.
pub async fn list_transactions(
    State(pool): State<DbPool>,
    query: Result<Query<TransactionListQuery>, QueryRejection>,
) -> Result<ApiResponse<TransactionList>, AppError> {
    let Query(query) = query?;
    let (filter, page) = query.validate()?;

    let (transactions, total) =
        transaction_service::list_transactions(&pool, filter, page).await?;

    Ok(ApiResponse::ok(TransactionList {
        transactions,
        total,
        page,
    }))
}

pub async fn get_transaction(
    State(pool): State<DbPool>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<ApiResponse<Transaction>, AppError> {
    let Path(id) = id?;

    let transaction = transaction_service::get_transaction(&pool, id).await?;

    Ok(ApiResponse::ok(transaction))
}

pub async fn update_transaction(
    State(pool): State<DbPool>,
    id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<UpdateTransactionRequest>, JsonRejection>,
) -> Result<ApiResponse<Transaction>, AppError> {
    let Path(id) = id?;
    let Json(request) = body?;
    let changes = request.validate()?;

    let transaction = transaction_service::update_transaction(&pool, id, changes).await?;

    Ok(ApiResponse::success(
        StatusCode::OK,
        "Transaction updated",
        transaction,
    ))
}

pub async fn delete_transaction(
    State(pool): State<DbPool>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<ApiResponse<()>, AppError> {
    let Path(id) = id?;

    transaction_service::delete_transaction(&pool, id).await?;

    Ok(ApiResponse::message(StatusCode::OK, "Transaction deleted"))
}
