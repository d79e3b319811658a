//! Category service - CRUD for the flat set of income/expense categories.

use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        category::{Category, CategoryChanges, CategoryFilter, NewCategory},
        pagination::Page,
    },
};

const CATEGORY_COLUMNS: &str = "id, name, type, created_at, updated_at";

pub async fn create_category(pool: &DbPool, new_category: NewCategory) -> Result<Category, AppError> {
    let category = sqlx::query_as::<_, Category>(
        r#"
        INSERT INTO categories (name, type)
        VALUES ($1, $2)
        RETURNING id, name, type, created_at, updated_at
        "#,
    )
    .bind(new_category.name)
    .bind(new_category.category_type)
    .fetch_one(pool)
    .await?;

    Ok(category)
}

fn push_filter(query: &mut QueryBuilder<'static, Postgres>, filter: &CategoryFilter) {
    if let Some(category_type) = filter.category_type {
        query.push(" WHERE type = ").push_bind(category_type);
    }
}

fn count_query(filter: &CategoryFilter) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new("SELECT COUNT(*) FROM categories");
    push_filter(&mut query, filter);
    query
}

fn list_query(filter: &CategoryFilter, page: Page) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new("SELECT ");
    query.push(CATEGORY_COLUMNS).push(" FROM categories");
    push_filter(&mut query, filter);
    query
        .push(" ORDER BY type::text, name LIMIT ")
        .push_bind(page.limit)
        .push(" OFFSET ")
        .push_bind(page.offset());
    query
}

/// List categories ordered by type label (`expense` before `income`) then name, with the
/// total matching the filter.
pub async fn list_categories(
    pool: &DbPool,
    filter: CategoryFilter,
    page: Page,
) -> Result<(Vec<Category>, i64), AppError> {
    let total = count_query(&filter)
        .build_query_scalar::<i64>()
        .fetch_one(pool)
        .await?;

    let categories = list_query(&filter, page)
        .build_query_as::<Category>()
        .fetch_all(pool)
        .await?;

    Ok((categories, total))
}

pub async fn get_category(pool: &DbPool, id: Uuid) -> Result<Category, AppError> {
    sqlx::query_as::<_, Category>(
        "SELECT id, name, type, created_at, updated_at FROM categories WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Category"))
}

/// Build the single UPDATE statement for a partial change, or `None` if nothing changes.
fn update_query(id: Uuid, changes: &CategoryChanges) -> Option<QueryBuilder<'static, Postgres>> {
    if changes.is_empty() {
        return None;
    }

    let mut query = QueryBuilder::new("UPDATE categories SET ");
    let mut assignments = query.separated(", ");

    if let Some(name) = &changes.name {
        assignments.push("name = ").push_bind_unseparated(name.clone());
    }
    if let Some(category_type) = changes.category_type {
        assignments.push("type = ").push_bind_unseparated(category_type);
    }
    assignments.push("updated_at = NOW()");

    query
        .push(" WHERE id = ")
        .push_bind(id)
        .push(" RETURNING ")
        .push(CATEGORY_COLUMNS);

    Some(query)
}

/// Apply a partial update in one statement and return the updated category.
///
/// Fields absent from `changes` keep their stored values. An empty change set writes
/// nothing, so `updated_at` only moves when something was actually assigned.
///
/// # Errors
///
/// - `NotFound`: no category with this id
pub async fn update_category(
    pool: &DbPool,
    id: Uuid,
    changes: CategoryChanges,
) -> Result<Category, AppError> {
    let Some(mut query) = update_query(id, &changes) else {
        return get_category(pool, id).await;
    };

    query
        .build_query_as::<Category>()
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("Category"))
}

/// Delete a category by id. Deleting a category that does not exist is not an error.
///
/// # Errors
///
/// - `ConstraintViolation`: transactions still reference the category
pub async fn delete_category(pool: &DbPool, id: Uuid) -> Result<(), AppError> {
    sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::category::CategoryType;

    #[test]
    fn list_without_filter() {
        let filter = CategoryFilter::default();

        assert_eq!(count_query(&filter).sql(), "SELECT COUNT(*) FROM categories");
        assert_eq!(
            list_query(&filter, Page::default()).sql(),
            "SELECT id, name, type, created_at, updated_at FROM categories \
             ORDER BY type::text, name LIMIT $1 OFFSET $2"
        );
    }

    #[test]
    fn list_with_type_filter() {
        let filter = CategoryFilter {
            category_type: Some(CategoryType::Income),
        };

        assert_eq!(
            count_query(&filter).sql(),
            "SELECT COUNT(*) FROM categories WHERE type = $1"
        );
        assert_eq!(
            list_query(&filter, Page::default()).sql(),
            "SELECT id, name, type, created_at, updated_at FROM categories WHERE type = $1 \
             ORDER BY type::text, name LIMIT $2 OFFSET $3"
        );
    }

    #[test]
    fn update_always_refreshes_timestamp() {
        let query = update_query(
            Uuid::new_v4(),
            &CategoryChanges {
                name: Some("Rent".to_string()),
                category_type: None,
            },
        )
        .unwrap();

        assert_eq!(
            query.sql(),
            "UPDATE categories SET name = $1, updated_at = NOW() WHERE id = $2 \
             RETURNING id, name, type, created_at, updated_at"
        );
    }

    #[test]
    fn empty_update_builds_nothing() {
        assert!(update_query(Uuid::new_v4(), &CategoryChanges::default()).is_none());
    }
}
