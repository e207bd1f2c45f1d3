//! Namespaced key-value persistence.
//!
//! Cart, session, and remember-me state survive restarts through a small
//! key-value store. The [`KeyValueStore`] trait keeps the rest of the
//! client indifferent to the backend: [`MemoryStore`] for tests and
//! ephemeral runs, [`RedbStore`] for a durable single-file database.
//!
//! Values are JSON strings except the raw token values, which are stored
//! as-is. Key layout:
//!
//! | Key | Value |
//! |-----|-------|
//! | `token` | bearer token (raw string) |
//! | `refreshToken` | refresh token (raw string) |
//! | `user` | JSON-serialized user record |
//! | `cart_<subdomain>` | JSON array of cart items |
//! | `vitrine_remember_me` | `"true"` when an email is remembered |
//! | `vitrine_remembered_email` | the remembered login email |

mod memory;
mod redb_store;

pub use memory::MemoryStore;
pub use redb_store::RedbStore;

use async_trait::async_trait;
use thiserror::Error;

/// Well-known storage keys.
pub mod keys {
    /// Bearer token for the authenticated session.
    pub const TOKEN: &str = "token";

    /// Refresh token, present only when the login response carried one.
    pub const REFRESH_TOKEN: &str = "refreshToken";

    /// JSON-serialized user record for the authenticated session.
    pub const USER: &str = "user";

    /// Remember-me opt-in flag.
    pub const REMEMBER_ME: &str = "vitrine_remember_me";

    /// Remembered login email.
    pub const REMEMBERED_EMAIL: &str = "vitrine_remembered_email";

    /// Cart key for a storefront scope. Two scopes never share a key, so
    /// two storefronts never share cart state.
    #[must_use]
    pub fn cart(scope: &str) -> String {
        format!("cart_{scope}")
    }
}

/// Errors from the storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Backing database could not be opened.
    #[error("storage open error: {0}")]
    Open(String),

    /// Read failed.
    #[error("storage read error: {0}")]
    Read(String),

    /// Write failed.
    #[error("storage write error: {0}")]
    Write(String),
}

/// A persistent string-to-string key-value store.
///
/// All methods are fallible; callers decide whether a failure is fatal.
/// The cart and session stores treat failures as non-fatal (in-memory
/// state stays authoritative) and only log them.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any existing value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value stored under `key`. Removing an absent key is not
    /// an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_keys_are_scope_disjoint() {
        assert_eq!(keys::cart("loja-a"), "cart_loja-a");
        assert_eq!(keys::cart("loja-b"), "cart_loja-b");
        assert_ne!(keys::cart("loja-a"), keys::cart("loja-b"));
    }

    #[test]
    fn test_cart_key_for_empty_scope() {
        // No `subdominio` query parameter means the anonymous scope.
        assert_eq!(keys::cart(""), "cart_");
    }
}
