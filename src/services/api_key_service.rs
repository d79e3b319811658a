//! API key service - issuance, management and validation of client keys.
//!
//! # Storage
//!
//! Keys are 64 hex characters drawn from 32 random bytes. Only the SHA-256 hash of a key is
//! written to `api_keys.key_hash` (UNIQUE); the plaintext is returned to the caller once,
//! from [`create_api_key`], and never again.

use sha2::{Digest, Sha256};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        api_key::{ApiKey, ApiKeyChanges, ApiKeyResponse, NewApiKey},
        pagination::Page,
    },
};

const API_KEY_COLUMNS: &str = "id, name, is_active, created_at, last_used_at";

/// Generate cryptographically secure random key.
///
/// # Output
///
/// 64 hex characters (32 random bytes)
pub fn generate_key() -> String {
    let bytes: [u8; 32] = rand::random();
    hex::encode(bytes)
}

/// SHA-256 hash of a key, hex encoded. This is what the database stores and matches on.
pub fn hash_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Issue a new API key.
///
/// # Process
///
/// 1. Generate a random key
/// 2. Store its hash with the requested name
/// 3. Return the record with the plaintext key attached (only time it's shown)
///
/// No uniqueness pre-check is made; at 256 bits a collision is not a practical concern and the
/// UNIQUE constraint on `key_hash` would reject one as a `ConstraintViolation`.
pub async fn create_api_key(pool: &DbPool, new_key: NewApiKey) -> Result<ApiKeyResponse, AppError> {
    let key = generate_key();

    let api_key = sqlx::query_as::<_, ApiKey>(
        r#"
        INSERT INTO api_keys (name, key_hash)
        VALUES ($1, $2)
        RETURNING id, name, is_active, created_at, last_used_at
        "#,
    )
    .bind(&new_key.name)
    .bind(hash_key(&key))
    .fetch_one(pool)
    .await?;

    tracing::info!(api_key_id = %api_key.id, name = %api_key.name, "API key issued");

    Ok(ApiKeyResponse::from(api_key).with_key(key))
}

/// List API keys, newest first, with the total count.
pub async fn list_api_keys(pool: &DbPool, page: Page) -> Result<(Vec<ApiKey>, i64), AppError> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM api_keys")
        .fetch_one(pool)
        .await?;

    let api_keys = sqlx::query_as::<_, ApiKey>(
        r#"
        SELECT id, name, is_active, created_at, last_used_at
        FROM api_keys
        ORDER BY created_at DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(page.limit)
    .bind(page.offset())
    .fetch_all(pool)
    .await?;

    Ok((api_keys, total))
}

pub async fn get_api_key(pool: &DbPool, id: Uuid) -> Result<ApiKey, AppError> {
    sqlx::query_as::<_, ApiKey>(
        "SELECT id, name, is_active, created_at, last_used_at FROM api_keys WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("API key"))
}

/// Build the single UPDATE statement for a partial change, or `None` if nothing changes.
fn update_query(id: Uuid, changes: &ApiKeyChanges) -> Option<QueryBuilder<'static, Postgres>> {
    if changes.is_empty() {
        return None;
    }

    let mut query = QueryBuilder::new("UPDATE api_keys SET ");
    let mut assignments = query.separated(", ");

    if let Some(name) = &changes.name {
        assignments.push("name = ").push_bind_unseparated(name.clone());
    }
    if let Some(is_active) = changes.is_active {
        assignments.push("is_active = ").push_bind_unseparated(is_active);
    }

    query
        .push(" WHERE id = ")
        .push_bind(id)
        .push(" RETURNING ")
        .push(API_KEY_COLUMNS);

    Some(query)
}

/// Apply a partial update in one statement and return the updated record.
///
/// An empty change set writes nothing and returns the current record.
///
/// # Errors
///
/// - `NotFound`: no key with this id
pub async fn update_api_key(
    pool: &DbPool,
    id: Uuid,
    changes: ApiKeyChanges,
) -> Result<ApiKey, AppError> {
    let Some(mut query) = update_query(id, &changes) else {
        return get_api_key(pool, id).await;
    };

    let api_key = query
        .build_query_as::<ApiKey>()
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("API key"))?;

    if changes.is_active == Some(false) {
        tracing::info!(api_key_id = %id, "API key deactivated");
    }

    Ok(api_key)
}

/// Delete a key by id. Deleting a key that does not exist is not an error.
pub async fn delete_api_key(pool: &DbPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM api_keys WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    tracing::debug!(api_key_id = %id, deleted = result.rows_affected(), "API key delete");

    Ok(())
}

/// Check a presented key and stamp `last_used_at` in the same statement.
///
/// # Errors
///
/// - `Unauthorized`: no active key matches
pub async fn validate_key(pool: &DbPool, key: &str) -> Result<ApiKey, AppError> {
    sqlx::query_as::<_, ApiKey>(
        r#"
        UPDATE api_keys
        SET last_used_at = NOW()
        WHERE key_hash = $1 AND is_active = true
        RETURNING id, name, is_active, created_at, last_used_at
        "#,
    )
    .bind(hash_key(key))
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_keys_are_64_hex_chars() {
        let key = generate_key();
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn generated_keys_differ() {
        assert_ne!(generate_key(), generate_key());
    }

    #[test]
    fn hash_is_stable_sha256() {
        assert_eq!(
            hash_key("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_ne!(hash_key("abc"), hash_key("abd"));
    }

    #[test]
    fn update_assigns_only_supplied_fields() {
        let id = Uuid::new_v4();

        let query = update_query(
            id,
            &ApiKeyChanges {
                name: None,
                is_active: Some(false),
            },
        )
        .unwrap();
        assert_eq!(
            query.sql(),
            "UPDATE api_keys SET is_active = $1 WHERE id = $2 \
             RETURNING id, name, is_active, created_at, last_used_at"
        );

        let query = update_query(
            id,
            &ApiKeyChanges {
                name: Some("renamed".to_string()),
                is_active: Some(true),
            },
        )
        .unwrap();
        assert_eq!(
            query.sql(),
            "UPDATE api_keys SET name = $1, is_active = $2 WHERE id = $3 \
             RETURNING id, name, is_active, created_at, last_used_at"
        );
    }

    #[test]
    fn empty_update_builds_nothing() {
        assert!(update_query(Uuid::new_v4(), &ApiKeyChanges::default()).is_none());
    }
}
