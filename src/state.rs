//! Shared application state handed to the router.

use std::fmt;

use axum::extract::FromRef;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::{config::Config, db::DbPool};

/// State shared by every handler and middleware.
///
/// Built once in `main`; handlers extract only the part they need through [`FromRef`].
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub admin_key: AdminKey,
}

impl AppState {
    pub fn new(pool: DbPool, config: &Config) -> Self {
        Self {
            pool,
            admin_key: AdminKey::new(&config.admin_api_key),
        }
    }
}

/// The configured admin secret, held as its SHA-256 digest.
///
/// Both sides are hashed before comparing, so the comparison always runs over 32 bytes
/// whatever the length of the presented value.
#[derive(Clone)]
pub struct AdminKey([u8; 32]);

impl AdminKey {
    pub fn new(key: &str) -> Self {
        Self(digest(key.as_bytes()))
    }

    /// Constant-time comparison against a presented header value.
    pub fn matches(&self, presented: &[u8]) -> bool {
        self.0[..].ct_eq(&digest(presented)[..]).into()
    }
}

fn digest(value: &[u8]) -> [u8; 32] {
    Sha256::digest(value).into()
}

impl fmt::Debug for AdminKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdminKey(<redacted>)")
    }
}

impl FromRef<AppState> for DbPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for AdminKey {
    fn from_ref(state: &AppState) -> Self {
        state.admin_key.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_only_the_exact_key() {
        let key = AdminKey::new("s3cret");

        assert!(key.matches(b"s3cret"));
        assert!(!key.matches(b"s3cre"));
        assert!(!key.matches(b"s3cret!"));
        assert!(!key.matches(b""));
    }

    #[test]
    fn stores_only_the_digest() {
        let key = AdminKey::new("s3cret");

        assert_eq!(key.0, digest(b"s3cret"));
        assert!(!key.matches("s3cret".repeat(64).as_bytes()));
    }

    #[test]
    fn debug_hides_the_key() {
        assert!(!format!("{:?}", AdminKey::new("s3cret")).contains("s3cret"));
    }
}
