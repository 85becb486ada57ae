//! Persistent key-value blob storage.
//!
//! The session token, the serialized user and the per-user movie collections
//! survive restarts through a [`BlobStore`]. Values are opaque strings; callers
//! serialize with `serde_json`.

mod keyring_store;
mod memory;
mod sqlite;

use async_trait::async_trait;
use moviebox_auth::UserId;

pub use keyring_store::KeyringBlobStore;
pub use memory::MemoryBlobStore;
pub use sqlite::SqliteBlobStore;

use crate::Result;

/// Key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Key holding the JSON-serialized signed-in user.
pub const USER_KEY: &str = "user";

/// Key holding a user's favorite movie ids.
#[must_use]
pub fn favorites_key(user_id: UserId) -> String {
    format!("favorites:{user_id}")
}

/// Key holding a user's watchlist movie ids.
#[must_use]
pub fn watchlist_key(user_id: UserId) -> String {
    format!("watchlist:{user_id}")
}

/// String-keyed persistent storage.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Reads a value; `None` if the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Deletes a value. Removing an absent key succeeds.
    async fn remove(&self, key: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_keys() {
        assert_eq!(favorites_key(7), "favorites:7");
        assert_eq!(watchlist_key(7), "watchlist:7");
    }
}
