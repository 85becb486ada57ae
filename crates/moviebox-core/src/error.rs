//! Error types for the core library.

use thiserror::Error;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Catalog client could not be built.
    #[error("Catalog error: {0}")]
    Catalog(#[from] moviebox_catalog::Error),

    /// Auth client could not be built.
    #[error("Auth error: {0}")]
    Auth(#[from] moviebox_auth::AuthError),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// System keyring error.
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A storage call did not complete in time.
    #[error("Storage timed out after {0} seconds")]
    Timeout(u64),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
