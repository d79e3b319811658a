//! Transaction data models and API request/response types.
//!
//! This module defines:
//! - `Transaction`: a transaction row joined with its category name
//! - Request types for create, partial update, and filtered listing
//! - The validated forms of those requests handed to the service layer

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    pagination::Page,
    validation::{FieldErrors, non_empty},
};
use crate::error::AppError;

/// Currency applied when a create request does not name one.
pub const DEFAULT_CURRENCY: &str = "IDR";

const TRANSACTION_TYPES: &str = "income, expense, transfer";
const TRANSACTION_STATUSES: &str = "pending, completed, cancelled";

/// Direction of a transaction. Stored as the `transaction_type` PostgreSQL enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "transaction_type", rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
    Transfer,
}

impl FromStr for TransactionType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            "transfer" => Ok(TransactionType::Transfer),
            _ => Err(()),
        }
    }
}

/// Settlement state of a transaction. Stored as the `transaction_status` PostgreSQL enum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "transaction_status", rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    #[default]
    Completed,
    Cancelled,
}

impl FromStr for TransactionStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TransactionStatus::Pending),
            "completed" => Ok(TransactionStatus::Completed),
            "cancelled" => Ok(TransactionStatus::Cancelled),
            _ => Err(()),
        }
    }
}

/// Represents a transaction record, joined with its category.
///
/// # Database Table
///
/// Maps to the `transactions` table. Each transaction:
/// - References exactly one category (foreign key, `ON DELETE RESTRICT`)
/// - Stores `amount` as `NUMERIC(15,2)`, always positive (CHECK constraint)
/// - Carries a calendar `date` separate from its `created_at` timestamp
///
/// # JSON Example
///
/// ```json
/// {
///   "id": "770e8400-e29b-41d4-a716-446655440002",
///   "type": "expense",
///   "category_id": "550e8400-e29b-41d4-a716-446655440000",
///   "category_name": "Groceries",
///   "amount": 42.5,
///   "currency": "IDR",
///   "description": "Weekly shop",
///   "status": "completed",
///   "date": "2025-01-15",
///   "created_at": "2025-01-15T10:30:00Z",
///   "updated_at": "2025-01-15T10:30:00Z"
/// }
/// ```
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Transaction {
    pub id: Uuid,

    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub transaction_type: TransactionType,

    pub category_id: Uuid,

    /// Joined from `categories.name`
    pub category_name: String,

    pub amount: Decimal,

    /// ISO 4217 style code, 3 characters
    pub currency: String,

    pub description: Option<String>,

    pub status: TransactionStatus,

    pub date: NaiveDate,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Request to record a transaction.
///
/// # JSON Example
///
/// ```json
/// {
///   "type": "expense",
///   "category_id": "550e8400-e29b-41d4-a716-446655440000",
///   "amount": 42.50,
///   "currency": "IDR",
///   "description": "Weekly shop",
///   "status": "completed",
///   "date": "2025-01-15"
/// }
/// ```
///
/// Only `type`, `category_id` and `amount` are required.
#[derive(Debug, Default, Deserialize)]
pub struct CreateTransactionRequest {
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub category_id: Option<String>,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub date: Option<String>,
}

/// A validated create request with defaults applied.
///
/// `date` stays optional: when absent the store fills in its current date.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub transaction_type: TransactionType,
    pub category_id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub description: Option<String>,
    pub status: TransactionStatus,
    pub date: Option<NaiveDate>,
}

/// Decimal places the `NUMERIC(15,2)` amount column keeps.
const AMOUNT_SCALE: u32 = 2;

/// Exclusive upper bound of the amount column (13 integer digits).
const AMOUNT_LIMIT: Decimal = Decimal::from_parts(1_316_134_912, 2_328, 0, false, 0);

fn check_amount(errors: &mut FieldErrors, amount: Decimal) -> Option<Decimal> {
    if amount <= Decimal::ZERO {
        errors.add("amount", "must be greater than 0");
        return None;
    }
    if amount.normalize().scale() > AMOUNT_SCALE {
        errors.add(
            "amount",
            format_args!("must have at most {AMOUNT_SCALE} decimal places"),
        );
        return None;
    }
    if amount >= AMOUNT_LIMIT {
        errors.add("amount", format_args!("must be less than {AMOUNT_LIMIT}"));
        return None;
    }
    Some(amount)
}

impl CreateTransactionRequest {
    /// # Validation
    ///
    /// - `type`: required, `income`, `expense` or `transfer`
    /// - `category_id`: required UUID (existence is checked by the foreign key)
    /// - `amount`: required, > 0
    /// - `currency`: optional, 3 characters, defaults to `IDR`
    /// - `status`: optional, `pending`, `completed` or `cancelled`, defaults to `completed`
    /// - `date`: optional `YYYY-MM-DD`
    pub fn validate(self) -> Result<NewTransaction, AppError> {
        let mut errors = FieldErrors::new();

        let transaction_type = match self.transaction_type.as_deref() {
            Some(value) => errors.one_of("type", value, TRANSACTION_TYPES),
            None => {
                errors.add("type", "is required");
                None
            }
        };

        let category_id = match self.category_id.as_deref() {
            Some(value) => errors.uuid("category_id", value),
            None => {
                errors.add("category_id", "is required");
                None
            }
        };

        let amount = match self.amount {
            Some(amount) => check_amount(&mut errors, amount),
            None => {
                errors.add("amount", "is required");
                None
            }
        };

        let currency = match self.currency.as_deref() {
            Some(value) => errors.currency("currency", value),
            None => Some(DEFAULT_CURRENCY.to_string()),
        };

        let status = match self.status.as_deref() {
            Some(value) => errors.one_of("status", value, TRANSACTION_STATUSES),
            None => Some(TransactionStatus::default()),
        };

        let date = self
            .date
            .as_deref()
            .and_then(|value| errors.date("date", value));

        errors.finish(|| NewTransaction {
            transaction_type: transaction_type.unwrap_or(TransactionType::Expense),
            category_id: category_id.unwrap_or_default(),
            amount: amount.unwrap_or_default(),
            currency: currency.unwrap_or_default(),
            description: self.description,
            status: status.unwrap_or_default(),
            date,
        })
    }
}

/// Request body for `PATCH /api/v1/transactions/{id}`. Every field is optional;
/// `null` is treated the same as an absent field.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTransactionRequest {
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub category_id: Option<String>,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionChanges {
    pub transaction_type: Option<TransactionType>,
    pub category_id: Option<Uuid>,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub description: Option<String>,
    pub status: Option<TransactionStatus>,
    pub date: Option<NaiveDate>,
}

impl TransactionChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl UpdateTransactionRequest {
    pub fn validate(self) -> Result<TransactionChanges, AppError> {
        let mut errors = FieldErrors::new();

        let transaction_type = self
            .transaction_type
            .as_deref()
            .and_then(|value| errors.one_of("type", value, TRANSACTION_TYPES));
        let category_id = self
            .category_id
            .as_deref()
            .and_then(|value| errors.uuid("category_id", value));
        let amount = self
            .amount
            .and_then(|amount| check_amount(&mut errors, amount));
        let currency = self
            .currency
            .as_deref()
            .and_then(|value| errors.currency("currency", value));
        let status = self
            .status
            .as_deref()
            .and_then(|value| errors.one_of("status", value, TRANSACTION_STATUSES));
        let date = self
            .date
            .as_deref()
            .and_then(|value| errors.date("date", value));

        errors.finish(|| TransactionChanges {
            transaction_type,
            category_id,
            amount,
            currency,
            description: self.description,
            status,
            date,
        })
    }
}

/// Query string for `GET /api/v1/transactions`.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionListQuery {
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub category_id: Option<String>,
    pub status: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Conjunctive list filter. `None` fields add no predicate at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub transaction_type: Option<TransactionType>,
    pub category_id: Option<Uuid>,
    pub status: Option<TransactionStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl TransactionListQuery {
    pub fn validate(self) -> Result<(TransactionFilter, Page), AppError> {
        let mut errors = FieldErrors::new();

        let transaction_type = non_empty(&self.transaction_type)
            .and_then(|value| errors.one_of("type", value, TRANSACTION_TYPES));
        let category_id =
            non_empty(&self.category_id).and_then(|value| errors.uuid("category_id", value));
        let status = non_empty(&self.status)
            .and_then(|value| errors.one_of("status", value, TRANSACTION_STATUSES));
        let date_from =
            non_empty(&self.date_from).and_then(|value| errors.date("date_from", value));
        let date_to = non_empty(&self.date_to).and_then(|value| errors.date("date_to", value));

        if let (Some(from), Some(to)) = (date_from, date_to) {
            if from > to {
                errors.add("date_from", "must not be after date_to");
            }
        }

        let page = Page::new(self.page, self.limit);
        errors.finish(|| {
            (
                TransactionFilter {
                    transaction_type,
                    category_id,
                    status,
                    date_from,
                    date_to,
                },
                page,
            )
        })
    }
}

/// Response data for `GET /api/v1/transactions`.
#[derive(Debug, Serialize)]
pub struct TransactionList {
    pub transactions: Vec<Transaction>,
    pub total: i64,
    #[serde(flatten)]
    pub page: Page,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category_id() -> String {
        "550e8400-e29b-41d4-a716-446655440000".to_string()
    }

    #[test]
    fn create_applies_defaults() {
        let new_tx = CreateTransactionRequest {
            transaction_type: Some("expense".to_string()),
            category_id: Some(category_id()),
            amount: Some(Decimal::new(4250, 2)),
            ..Default::default()
        }
        .validate()
        .unwrap();

        assert_eq!(new_tx.currency, "IDR");
        assert_eq!(new_tx.status, TransactionStatus::Completed);
        assert_eq!(new_tx.date, None);
        assert_eq!(new_tx.amount, Decimal::new(4250, 2));
        assert_eq!(new_tx.category_id, Uuid::parse_str(&category_id()).unwrap());
    }

    #[test]
    fn create_parses_amount_from_json_number() {
        let request: CreateTransactionRequest = serde_json::from_value(serde_json::json!({
            "type": "expense",
            "category_id": category_id(),
            "amount": 42.50,
            "date": "2025-01-15"
        }))
        .unwrap();

        let new_tx = request.validate().unwrap();
        assert_eq!(new_tx.amount, Decimal::new(4250, 2));
        assert_eq!(new_tx.date, NaiveDate::from_ymd_opt(2025, 1, 15));
    }

    #[test]
    fn create_requires_core_fields() {
        let err = CreateTransactionRequest::default().validate().unwrap_err();

        match err {
            AppError::Validation(fields) => assert_eq!(
                fields,
                vec![
                    "type is required".to_string(),
                    "category_id is required".to_string(),
                    "amount is required".to_string(),
                ]
            ),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn create_rejects_non_positive_amount_and_bad_enums() {
        let err = CreateTransactionRequest {
            transaction_type: Some("refund".to_string()),
            category_id: Some("42".to_string()),
            amount: Some(Decimal::ZERO),
            currency: Some("RUPIAH".to_string()),
            status: Some("done".to_string()),
            date: Some("15-01-2025".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap_err();

        match err {
            AppError::Validation(fields) => {
                let joined = fields.join("\n");
                for field in ["type", "category_id", "amount", "currency", "status", "date"] {
                    assert!(joined.contains(field), "missing error for {field}");
                }
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn update_validates_only_present_fields() {
        let changes = UpdateTransactionRequest {
            status: Some("cancelled".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap();

        assert_eq!(
            changes,
            TransactionChanges {
                status: Some(TransactionStatus::Cancelled),
                ..Default::default()
            }
        );
        assert!(!changes.is_empty());
        assert!(
            UpdateTransactionRequest::default()
                .validate()
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn update_rejects_negative_amount() {
        let err = UpdateTransactionRequest {
            amount: Some(Decimal::new(-1, 0)),
            ..Default::default()
        }
        .validate()
        .unwrap_err();

        assert!(err.to_string().contains("amount must be greater than 0"));
    }

    #[test]
    fn amount_limit_is_ten_to_the_thirteenth() {
        assert_eq!(AMOUNT_LIMIT, Decimal::from(10_000_000_000_000_i64));
    }

    #[test]
    fn amount_must_fit_the_stored_precision() {
        let check = |amount: Decimal| {
            let mut errors = FieldErrors::new();
            let checked = check_amount(&mut errors, amount);
            (checked, errors.finish(|| ()).err().map(|e| e.to_string()))
        };

        assert_eq!(
            check(Decimal::new(1, 3)).1.unwrap(),
            "Validation failed: amount must have at most 2 decimal places"
        );
        assert!(check(Decimal::new(1234, 3)).1.unwrap().contains("at most 2 decimal places"));
        assert!(
            check(Decimal::from(10_000_000_000_000_i64))
                .1
                .unwrap()
                .contains("amount must be less than 10000000000000")
        );

        // trailing zeros do not count as precision
        assert_eq!(check(Decimal::new(12_500, 3)).0, Some(Decimal::new(12_500, 3)));
        assert_eq!(check(Decimal::new(999_999_999_999_999, 2)).1, None);
    }

    #[test]
    fn amount_precision_applies_to_json_numbers() {
        let request: UpdateTransactionRequest =
            serde_json::from_value(serde_json::json!({ "amount": 1.234 })).unwrap();

        let err = request.validate().unwrap_err();
        assert!(err.to_string().contains("amount must have at most 2 decimal places"));
    }

    #[test]
    fn list_query_builds_filter() {
        let (filter, page) = TransactionListQuery {
            transaction_type: Some("income".to_string()),
            status: Some(String::new()),
            date_from: Some("2025-01-01".to_string()),
            date_to: Some("2025-01-31".to_string()),
            page: Some(2),
            limit: Some(50),
            ..Default::default()
        }
        .validate()
        .unwrap();

        assert_eq!(filter.transaction_type, Some(TransactionType::Income));
        assert_eq!(filter.status, None);
        assert_eq!(filter.date_from, NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(page, Page { page: 2, limit: 50 });
    }

    #[test]
    fn list_query_rejects_inverted_range() {
        let err = TransactionListQuery {
            date_from: Some("2025-02-01".to_string()),
            date_to: Some("2025-01-01".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap_err();

        assert!(err.to_string().contains("date_from must not be after date_to"));
    }
}
