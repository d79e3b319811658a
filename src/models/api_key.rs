//! API Key model for client authentication.
//!
//! API keys authenticate the projects and services calling `/api/v1`. They are issued and
//! managed through the admin routes. The key itself is shown once, in the create response;
//! the database keeps only its SHA-256 hash.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{pagination::Page, validation::FieldErrors};
use crate::error::AppError;

pub const NAME_MAX_LEN: usize = 100;

/// Represents an API key record from the database.
///
/// # Database Table
///
/// Maps to the `api_keys` table. The `key_hash` column is never selected into this struct,
/// so nothing read back from the store can leak the credential.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ApiKey {
    /// Unique identifier for this API key
    pub id: Uuid,

    /// Human-readable label, e.g. the name of the calling application
    pub name: String,

    /// Inactive keys are rejected during authentication. This revokes access without
    /// deleting the record.
    pub is_active: bool,

    pub created_at: DateTime<Utc>,

    /// Stamped each time the key passes authentication
    pub last_used_at: Option<DateTime<Utc>>,
}

/// Response body for API key endpoints.
///
/// # JSON Example (create)
///
/// ```json
/// {
///   "id": "550e8400-e29b-41d4-a716-446655440000",
///   "name": "budget-frontend",
///   "key": "9f86d081884c7d65...",
///   "is_active": true,
///   "created_at": "2025-01-15T10:30:00Z",
///   "last_used_at": null
/// }
/// ```
///
/// The `key` field is only present in the create response.
#[derive(Debug, Serialize)]
pub struct ApiKeyResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
}

impl From<ApiKey> for ApiKeyResponse {
    fn from(api_key: ApiKey) -> Self {
        Self {
            id: api_key.id,
            name: api_key.name,
            key: None,
            is_active: api_key.is_active,
            created_at: api_key.created_at,
            last_used_at: api_key.last_used_at,
        }
    }
}

impl ApiKeyResponse {
    /// Attach the plaintext key (only for the create response).
    pub fn with_key(mut self, key: String) -> Self {
        self.key = Some(key);
        self
    }
}

/// Request body for `POST /admin/v1/api-keys`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateApiKeyRequest {
    pub name: Option<String>,
}

/// A validated create request.
#[derive(Debug, Clone, PartialEq)]
pub struct NewApiKey {
    pub name: String,
}

impl CreateApiKeyRequest {
    /// # Validation
    ///
    /// - `name`: required, 1-100 characters after trimming
    pub fn validate(self) -> Result<NewApiKey, AppError> {
        let mut errors = FieldErrors::new();

        let name = match self.name.as_deref() {
            Some(name) => errors.name("name", name, NAME_MAX_LEN),
            None => {
                errors.add("name", "is required");
                None
            }
        };

        errors.finish(|| NewApiKey {
            name: name.unwrap_or_default(),
        })
    }
}

/// Request body for `PATCH /admin/v1/api-keys/{id}`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateApiKeyRequest {
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

/// The fields a PATCH actually supplied, validated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiKeyChanges {
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

impl ApiKeyChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.is_active.is_none()
    }
}

impl UpdateApiKeyRequest {
    pub fn validate(self) -> Result<ApiKeyChanges, AppError> {
        let mut errors = FieldErrors::new();

        let name = self
            .name
            .as_deref()
            .and_then(|name| errors.name("name", name, NAME_MAX_LEN));

        errors.finish(|| ApiKeyChanges {
            name,
            is_active: self.is_active,
        })
    }
}

/// Query string for `GET /admin/v1/api-keys`.
#[derive(Debug, Default, Deserialize)]
pub struct ApiKeyListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl ApiKeyListQuery {
    pub fn page(&self) -> Page {
        Page::new(self.page, self.limit)
    }
}

/// Response data for `GET /admin/v1/api-keys`.
#[derive(Debug, Serialize)]
pub struct ApiKeyList {
    pub api_keys: Vec<ApiKeyResponse>,
    pub total: i64,
    #[serde(flatten)]
    pub page: Page,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_name() {
        let err = CreateApiKeyRequest { name: None }.validate().unwrap_err();
        assert!(err.to_string().contains("name is required"));

        let err = CreateApiKeyRequest {
            name: Some("x".repeat(101)),
        }
        .validate()
        .unwrap_err();
        assert!(err.to_string().contains("name must be between 1 and 100"));
    }

    #[test]
    fn create_trims_name() {
        let new_key = CreateApiKeyRequest {
            name: Some("  budget-frontend ".to_string()),
        }
        .validate()
        .unwrap();

        assert_eq!(new_key.name, "budget-frontend");
    }

    #[test]
    fn update_forwards_only_present_fields() {
        let changes = UpdateApiKeyRequest {
            name: None,
            is_active: Some(false),
        }
        .validate()
        .unwrap();

        assert_eq!(
            changes,
            ApiKeyChanges {
                name: None,
                is_active: Some(false)
            }
        );
        assert!(UpdateApiKeyRequest::default().validate().unwrap().is_empty());
    }

    #[test]
    fn update_rejects_empty_name() {
        let err = UpdateApiKeyRequest {
            name: Some(String::new()),
            is_active: None,
        }
        .validate()
        .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn stored_key_is_never_serialized() {
        let api_key = ApiKey {
            id: Uuid::new_v4(),
            name: "cli".to_string(),
            is_active: true,
            created_at: Utc::now(),
            last_used_at: None,
        };

        let listed = serde_json::to_value(ApiKeyResponse::from(api_key.clone())).unwrap();
        assert!(listed.get("key").is_none());

        let created =
            serde_json::to_value(ApiKeyResponse::from(api_key).with_key("abc".into())).unwrap();
        assert_eq!(created["key"], "abc");
    }
}
