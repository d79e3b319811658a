//! Category data models and API request/response types.
//!
//! Categories form a flat set; each one is either an income or an expense bucket
//! that transactions point at.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    pagination::Page,
    validation::{FieldErrors, non_empty},
};
use crate::error::AppError;

pub const NAME_MAX_LEN: usize = 50;

const CATEGORY_TYPES: &str = "income, expense";

/// Kind of a category. Stored as the `category_type` PostgreSQL enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "category_type", rename_all = "lowercase")]
pub enum CategoryType {
    Income,
    Expense,
}

impl FromStr for CategoryType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(CategoryType::Income),
            "expense" => Ok(CategoryType::Expense),
            _ => Err(()),
        }
    }
}

/// Represents a category record from the database.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": "550e8400-e29b-41d4-a716-446655440000",
///   "name": "Groceries",
///   "type": "expense",
///   "created_at": "2025-01-15T10:30:00Z",
///   "updated_at": "2025-01-15T10:30:00Z"
/// }
/// ```
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Category {
    pub id: Uuid,

    pub name: String,

    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub category_type: CategoryType,

    pub created_at: DateTime<Utc>,

    /// Refreshed by every update that changes at least one field
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a category.
///
/// Fields are kept as raw strings so that a bad value is reported by name
/// instead of failing JSON decoding as a whole.
#[derive(Debug, Default, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub category_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub name: String,
    pub category_type: CategoryType,
}

impl CreateCategoryRequest {
    /// # Validation
    ///
    /// - `name`: required, 1-50 characters after trimming
    /// - `type`: required, `income` or `expense`
    pub fn validate(self) -> Result<NewCategory, AppError> {
        let mut errors = FieldErrors::new();

        let name = match self.name.as_deref() {
            Some(name) => errors.name("name", name, NAME_MAX_LEN),
            None => {
                errors.add("name", "is required");
                None
            }
        };

        let category_type = match self.category_type.as_deref() {
            Some(value) => errors.one_of("type", value, CATEGORY_TYPES),
            None => {
                errors.add("type", "is required");
                None
            }
        };

        errors.finish(|| NewCategory {
            name: name.unwrap_or_default(),
            category_type: category_type.unwrap_or(CategoryType::Expense),
        })
    }
}

/// Request body for `PATCH /api/v1/categories/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub category_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub category_type: Option<CategoryType>,
}

impl CategoryChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.category_type.is_none()
    }
}

impl UpdateCategoryRequest {
    pub fn validate(self) -> Result<CategoryChanges, AppError> {
        let mut errors = FieldErrors::new();

        let name = self
            .name
            .as_deref()
            .and_then(|name| errors.name("name", name, NAME_MAX_LEN));
        let category_type = self
            .category_type
            .as_deref()
            .and_then(|value| errors.one_of("type", value, CATEGORY_TYPES));

        errors.finish(|| CategoryChanges {
            name,
            category_type,
        })
    }
}

/// Query string for `GET /api/v1/categories`.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryListQuery {
    #[serde(rename = "type")]
    pub category_type: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CategoryFilter {
    pub category_type: Option<CategoryType>,
}

impl CategoryListQuery {
    pub fn validate(self) -> Result<(CategoryFilter, Page), AppError> {
        let mut errors = FieldErrors::new();

        let category_type = non_empty(&self.category_type)
            .and_then(|value| errors.one_of("type", value, CATEGORY_TYPES));

        let page = Page::new(self.page, self.limit);
        errors.finish(|| (CategoryFilter { category_type }, page))
    }
}

/// Response data for `GET /api/v1/categories`.
#[derive(Debug, Serialize)]
pub struct CategoryList {
    pub categories: Vec<Category>,
    pub total: i64,
    #[serde(flatten)]
    pub page: Page,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_accepts_valid_request() {
        let category = CreateCategoryRequest {
            name: Some("Groceries".to_string()),
            category_type: Some("expense".to_string()),
        }
        .validate()
        .unwrap();

        assert_eq!(
            category,
            NewCategory {
                name: "Groceries".to_string(),
                category_type: CategoryType::Expense,
            }
        );
    }

    #[test]
    fn create_reports_every_bad_field() {
        let err = CreateCategoryRequest {
            name: None,
            category_type: Some("savings".to_string()),
        }
        .validate()
        .unwrap_err();

        match err {
            AppError::Validation(fields) => assert_eq!(
                fields,
                vec![
                    "name is required".to_string(),
                    "type must be one of: income, expense".to_string(),
                ]
            ),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn update_rejects_unknown_type() {
        let err = UpdateCategoryRequest {
            name: None,
            category_type: Some("not-a-real-type".to_string()),
        }
        .validate()
        .unwrap_err();

        assert!(err.to_string().contains("type must be one of"));
    }

    #[test]
    fn update_rejects_long_name() {
        let err = UpdateCategoryRequest {
            name: Some("x".repeat(51)),
            category_type: None,
        }
        .validate()
        .unwrap_err();

        assert!(err.to_string().contains("between 1 and 50"));
    }

    #[test]
    fn update_keeps_absent_fields_absent() {
        let changes = UpdateCategoryRequest {
            name: Some("Rent".to_string()),
            category_type: None,
        }
        .validate()
        .unwrap();

        assert_eq!(changes.name.as_deref(), Some("Rent"));
        assert_eq!(changes.category_type, None);
    }

    #[test]
    fn list_query_ignores_empty_type() {
        let (filter, page) = CategoryListQuery {
            category_type: Some(String::new()),
            page: None,
            limit: Some(500),
        }
        .validate()
        .unwrap();

        assert_eq!(filter, CategoryFilter::default());
        assert_eq!(page, Page { page: 1, limit: 20 });
    }

    #[test]
    fn type_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(CategoryType::Income).unwrap(),
            serde_json::json!("income")
        );
        assert_eq!("expense".parse::<CategoryType>(), Ok(CategoryType::Expense));
        assert!("Expense".parse::<CategoryType>().is_err());
    }
}
