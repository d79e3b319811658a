//! Transaction service - storage and retrieval of financial transactions.
//!
//! This service handles:
//! - Recording transactions with store-side defaults (date)
//! - Filtered, paginated listing joined with category names
//! - Single-statement partial updates
//!
//! # Atomicity
//!
//! Every write is exactly one SQL statement, so concurrent writers can never observe or
//! produce a half-applied partial update. Writes that need the joined `category_name`
//! wrap the INSERT/UPDATE in a CTE and join in the same statement.

use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        pagination::Page,
        transaction::{NewTransaction, Transaction, TransactionChanges, TransactionFilter},
    },
};

/// Columns of a transaction row `t` joined with its category `c`.
const TRANSACTION_COLUMNS: &str = "t.id, t.type, t.category_id, c.name AS category_name, \
     t.amount, t.currency, t.description, t.status, t.date, t.created_at, t.updated_at";

/// Record a new transaction.
///
/// A missing `date` is filled with the store's `CURRENT_DATE`.
///
/// # Errors
///
/// - `ConstraintViolation`: `category_id` does not reference an existing category
pub async fn create_transaction(
    pool: &DbPool,
    new_tx: NewTransaction,
) -> Result<Transaction, AppError> {
    let sql = format!(
        r#"
        WITH t AS (
            INSERT INTO transactions (type, category_id, amount, currency, description, status, date)
            VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, CURRENT_DATE))
            RETURNING *
        )
        SELECT {TRANSACTION_COLUMNS}
        FROM t
        JOIN categories c ON c.id = t.category_id
        "#
    );

    let transaction = sqlx::query_as::<_, Transaction>(&sql)
        .bind(new_tx.transaction_type)
        .bind(new_tx.category_id)
        .bind(new_tx.amount)
        .bind(new_tx.currency)
        .bind(new_tx.description)
        .bind(new_tx.status)
        .bind(new_tx.date)
        .fetch_one(pool)
        .await?;

    tracing::debug!(transaction_id = %transaction.id, "transaction recorded");

    Ok(transaction)
}

/// Append `WHERE`/`AND` predicates for every filter field that is present.
fn push_filters(query: &mut QueryBuilder<'static, Postgres>, filter: &TransactionFilter) {
    let mut keyword = " WHERE ";

    if let Some(transaction_type) = filter.transaction_type {
        query.push(keyword).push("t.type = ").push_bind(transaction_type);
        keyword = " AND ";
    }
    if let Some(category_id) = filter.category_id {
        query.push(keyword).push("t.category_id = ").push_bind(category_id);
        keyword = " AND ";
    }
    if let Some(status) = filter.status {
        query.push(keyword).push("t.status = ").push_bind(status);
        keyword = " AND ";
    }
    if let Some(date_from) = filter.date_from {
        query.push(keyword).push("t.date >= ").push_bind(date_from);
        keyword = " AND ";
    }
    if let Some(date_to) = filter.date_to {
        query.push(keyword).push("t.date <= ").push_bind(date_to);
    }
}

fn count_query(filter: &TransactionFilter) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new("SELECT COUNT(*) FROM transactions t");
    push_filters(&mut query, filter);
    query
}

fn list_query(filter: &TransactionFilter, page: Page) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new("SELECT ");
    query
        .push(TRANSACTION_COLUMNS)
        .push(" FROM transactions t JOIN categories c ON c.id = t.category_id");
    push_filters(&mut query, filter);
    query
        .push(" ORDER BY t.date DESC, t.created_at DESC LIMIT ")
        .push_bind(page.limit)
        .push(" OFFSET ")
        .push_bind(page.offset());
    query
}

/// List transactions matching `filter`, newest date first.
///
/// Returns one page of results plus the total number of matches across all pages.
pub async fn list_transactions(
    pool: &DbPool,
    filter: TransactionFilter,
    page: Page,
) -> Result<(Vec<Transaction>, i64), AppError> {
    let total = count_query(&filter)
        .build_query_scalar::<i64>()
        .fetch_one(pool)
        .await?;

    let transactions = list_query(&filter, page)
        .build_query_as::<Transaction>()
        .fetch_all(pool)
        .await?;

    Ok((transactions, total))
}

/// Get transaction by ID.
pub async fn get_transaction(pool: &DbPool, id: Uuid) -> Result<Transaction, AppError> {
    let sql = format!(
        "SELECT {TRANSACTION_COLUMNS} FROM transactions t \
         JOIN categories c ON c.id = t.category_id WHERE t.id = $1"
    );

    sqlx::query_as::<_, Transaction>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("Transaction"))
}

/// Build the single UPDATE statement for a partial change, or `None` if nothing changes.
fn update_query(id: Uuid, changes: &TransactionChanges) -> Option<QueryBuilder<'static, Postgres>> {
    if changes.is_empty() {
        return None;
    }

    let mut query = QueryBuilder::new("WITH t AS (UPDATE transactions SET ");
    let mut assignments = query.separated(", ");

    if let Some(transaction_type) = changes.transaction_type {
        assignments.push("type = ").push_bind_unseparated(transaction_type);
    }
    if let Some(category_id) = changes.category_id {
        assignments.push("category_id = ").push_bind_unseparated(category_id);
    }
    if let Some(amount) = changes.amount {
        assignments.push("amount = ").push_bind_unseparated(amount);
    }
    if let Some(currency) = &changes.currency {
        assignments.push("currency = ").push_bind_unseparated(currency.clone());
    }
    if let Some(description) = &changes.description {
        assignments
            .push("description = ")
            .push_bind_unseparated(description.clone());
    }
    if let Some(status) = changes.status {
        assignments.push("status = ").push_bind_unseparated(status);
    }
    if let Some(date) = changes.date {
        assignments.push("date = ").push_bind_unseparated(date);
    }
    assignments.push("updated_at = NOW()");

    query
        .push(" WHERE id = ")
        .push_bind(id)
        .push(" RETURNING *) SELECT ")
        .push(TRANSACTION_COLUMNS)
        .push(" FROM t JOIN categories c ON c.id = t.category_id");

    Some(query)
}

/// Apply a partial update in one statement and return the updated transaction.
///
/// # Errors
///
/// - `NotFound`: no transaction with this id
/// - `ConstraintViolation`: the new `category_id` does not exist
pub async fn update_transaction(
    pool: &DbPool,
    id: Uuid,
    changes: TransactionChanges,
) -> Result<Transaction, AppError> {
    let Some(mut query) = update_query(id, &changes) else {
        return get_transaction(pool, id).await;
    };

    query
        .build_query_as::<Transaction>()
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("Transaction"))
}

/// Delete a transaction by id. Deleting a transaction that does not exist is not an error.
pub async fn delete_transaction(pool: &DbPool, id: Uuid) -> Result<(), AppError> {
    sqlx::query("DELETE FROM transactions WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transaction::{TransactionStatus, TransactionType};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    #[test]
    fn unfiltered_list_has_no_where_clause() {
        let filter = TransactionFilter::default();

        assert_eq!(
            count_query(&filter).sql(),
            "SELECT COUNT(*) FROM transactions t"
        );
        assert_eq!(
            list_query(&filter, Page::default()).sql(),
            format!(
                "SELECT {TRANSACTION_COLUMNS} FROM transactions t \
                 JOIN categories c ON c.id = t.category_id \
                 ORDER BY t.date DESC, t.created_at DESC LIMIT $1 OFFSET $2"
            )
        );
    }

    #[test]
    fn filters_are_conjunctive_and_numbered_in_order() {
        let filter = TransactionFilter {
            transaction_type: Some(TransactionType::Expense),
            category_id: Some(Uuid::new_v4()),
            status: Some(TransactionStatus::Completed),
            date_from: NaiveDate::from_ymd_opt(2025, 1, 1),
            date_to: NaiveDate::from_ymd_opt(2025, 1, 31),
        };

        assert_eq!(
            count_query(&filter).sql(),
            "SELECT COUNT(*) FROM transactions t WHERE t.type = $1 AND t.category_id = $2 \
             AND t.status = $3 AND t.date >= $4 AND t.date <= $5"
        );
        assert!(
            list_query(&filter, Page::default())
                .sql()
                .ends_with("AND t.date <= $5 ORDER BY t.date DESC, t.created_at DESC LIMIT $6 OFFSET $7")
        );
    }

    #[test]
    fn absent_filters_are_omitted() {
        let filter = TransactionFilter {
            status: Some(TransactionStatus::Pending),
            date_to: NaiveDate::from_ymd_opt(2025, 1, 31),
            ..Default::default()
        };

        assert_eq!(
            count_query(&filter).sql(),
            "SELECT COUNT(*) FROM transactions t WHERE t.status = $1 AND t.date <= $2"
        );
    }

    #[test]
    fn update_assigns_supplied_fields_in_one_statement() {
        let query = update_query(
            Uuid::new_v4(),
            &TransactionChanges {
                amount: Some(Decimal::new(1000, 2)),
                description: Some("Dinner".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(
            query.sql(),
            format!(
                "WITH t AS (UPDATE transactions SET amount = $1, description = $2, \
                 updated_at = NOW() WHERE id = $3 RETURNING *) SELECT {TRANSACTION_COLUMNS} \
                 FROM t JOIN categories c ON c.id = t.category_id"
            )
        );
    }

    #[test]
    fn empty_update_builds_nothing() {
        assert!(update_query(Uuid::new_v4(), &TransactionChanges::default()).is_none());
    }
}
