//! Application configuration.
//!
//! Stored as pretty JSON at `<config_dir>/moviebox/config.json`. A missing
//! file yields [`Config::default`]; the `MOVIEBOX_TMDB_API_KEY` environment
//! variable overrides the catalog API key.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use moviebox_auth::{AuthClient, HttpAuthClient, MockAuthBackend};
use moviebox_catalog::{CatalogConfig, TMDB_BASE_URL, TMDB_IMAGE_BASE_URL, TmdbClient};
use serde::{Deserialize, Serialize};
use tracing::info;
use url::Url;

use crate::storage::{BlobStore, KeyringBlobStore, MemoryBlobStore, SqliteBlobStore};
use crate::store::Store;
use crate::{Error, Result};

/// Environment variable overriding [`CatalogSettings::api_key`].
pub const API_KEY_ENV: &str = "MOVIEBOX_TMDB_API_KEY";

const APP_DIR: &str = "moviebox";

/// Catalog service settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// API root.
    pub base_url: String,
    /// Image CDN prefix.
    pub image_base_url: String,
    /// API key.
    pub api_key: String,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_url: TMDB_BASE_URL.to_string(),
            image_base_url: TMDB_IMAGE_BASE_URL.to_string(),
            api_key: String::new(),
        }
    }
}

/// Which auth service implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthBackend {
    /// In-process [`MockAuthBackend`].
    #[default]
    Mock,
    /// Remote JSON API through [`HttpAuthClient`].
    Http,
}

/// Auth service settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// Implementation to use.
    pub backend: AuthBackend,
    /// API root for the `http` backend.
    pub base_url: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            backend: AuthBackend::Mock,
            base_url: "http://localhost:3000/api/".to_string(),
        }
    }
}

/// Which blob store implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Nothing survives the process.
    Memory,
    /// `SQLite` database file.
    #[default]
    Sqlite,
    /// System keyring.
    Keyring,
}

/// Persistent storage settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Implementation to use.
    pub backend: StorageBackend,
    /// Database file for the `sqlite` backend.
    pub path: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Sqlite,
            path: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
                .join("moviebox.db"),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog service.
    pub catalog: CatalogSettings,
    /// Auth service.
    pub auth: AuthSettings,
    /// Blob storage.
    pub storage: StorageSettings,
    /// Timeout applied to every external call, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: CatalogSettings::default(),
            auth: AuthSettings::default(),
            storage: StorageSettings::default(),
            request_timeout_secs: 10,
        }
    }
}

impl Config {
    /// Default location of the configuration file.
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.json")
    }

    /// Loads the configuration from [`Config::default_path`] and applies
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::default_path()).await?;
        config.apply_api_key_override(std::env::var(API_KEY_ENV).ok());
        Ok(config)
    }

    /// Loads the configuration from `path`; a missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = tokio::fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Writes the configuration to `path` as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, contents).await?;
        info!("Configuration saved to {:?}", path);
        Ok(())
    }

    /// Replaces the API key with `key` when it is non-empty.
    pub fn apply_api_key_override(&mut self, key: Option<String>) {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.catalog.api_key = key;
        }
    }

    /// Per-call timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Checks that the configuration can build a [`Store`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.catalog.api_key.trim().is_empty() {
            return Err(Error::Config(format!(
                "catalog API key is missing; set catalog.api_key or {API_KEY_ENV}"
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::Config(
                "request_timeout_secs must be greater than zero".into(),
            ));
        }
        Url::parse(&self.catalog.base_url)
            .map_err(|e| Error::Config(format!("invalid catalog.base_url: {e}")))?;
        if self.auth.backend == AuthBackend::Http {
            Url::parse(&self.auth.base_url)
                .map_err(|e| Error::Config(format!("invalid auth.base_url: {e}")))?;
        }
        Ok(())
    }

    /// Builds the blob store selected by `storage.backend`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub async fn open_blob_store(&self) -> Result<Arc<dyn BlobStore>> {
        Ok(match self.storage.backend {
            StorageBackend::Memory => Arc::new(MemoryBlobStore::new()),
            StorageBackend::Keyring => Arc::new(KeyringBlobStore::default()),
            StorageBackend::Sqlite => {
                if let Some(dir) = self.storage.path.parent() {
                    tokio::fs::create_dir_all(dir).await?;
                }
                let path = self
                    .storage
                    .path
                    .to_str()
                    .ok_or_else(|| Error::Config("storage.path is not valid UTF-8".into()))?;
                Arc::new(SqliteBlobStore::new(path).await?)
            }
        })
    }

    /// Builds a [`Store`] wired to the configured services.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or a client cannot be built.
    pub async fn build_store(&self) -> Result<Store> {
        self.validate()?;

        let catalog_config = CatalogConfig::new(
            &self.catalog.base_url,
            self.catalog.image_base_url.clone(),
            self.catalog.api_key.clone(),
        )?
        .with_timeout(self.request_timeout());
        let catalog = Arc::new(TmdbClient::new(catalog_config)?);

        let auth: Arc<dyn AuthClient> = match self.auth.backend {
            AuthBackend::Mock => Arc::new(MockAuthBackend::new()),
            AuthBackend::Http => Arc::new(HttpAuthClient::new(
                &self.auth.base_url,
                self.request_timeout(),
            )?),
        };

        let blobs = self.open_blob_store().await?;
        info!(
            "Store ready (auth: {:?}, storage: {:?})",
            self.auth.backend, self.storage.backend
        );
        Ok(Store::with_timeout(
            catalog,
            auth,
            blobs,
            self.request_timeout(),
        ))
    }
}
