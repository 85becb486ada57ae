//! Blob storage in the system keyring.
//!
//! Uses the platform's native credential storage:
//! - Linux: Secret Service (GNOME Keyring, `KWallet`)
//! - macOS: Keychain
//! - Windows: Credential Manager

use async_trait::async_trait;
use keyring::Entry;
use tracing::debug;

use super::BlobStore;
use crate::Result;

/// Default keyring service name.
const SERVICE_NAME: &str = "moviebox";

/// [`BlobStore`] keeping one keyring entry per key.
#[derive(Debug, Clone)]
pub struct KeyringBlobStore {
    service: String,
}

impl Default for KeyringBlobStore {
    fn default() -> Self {
        Self::new(SERVICE_NAME)
    }
}

impl KeyringBlobStore {
    /// Creates a store under the given keyring service name.
    #[must_use]
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, key: &str) -> Result<Entry> {
        Ok(Entry::new(&self.service, key)?)
    }
}

#[async_trait]
impl BlobStore for KeyringBlobStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => {
                debug!("No keyring entry for {key}");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entry(key)?.set_password(value)?;
        debug!("Stored keyring entry for {key}");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
