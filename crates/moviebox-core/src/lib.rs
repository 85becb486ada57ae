//! # moviebox-core
//!
//! Catalog and session state core for the `MovieBox` client.
//!
//! This crate provides:
//! - **Session state** - sign-in, sign-up, verification, profile and password
//!   lifecycle as a pure reducer
//! - **Catalog state** - popular, now playing, upcoming, search and
//!   by-genre lists with page accumulation, genres and the detail view
//! - **Collections** - favorites and watchlist with optimistic toggles and
//!   rollback, persisted per user
//! - **Store** - an injectable state holder with subscriber notification,
//!   staleness guards and call timeouts
//! - **Storage** - memory, `SQLite` and system keyring blob stores
//! - **Configuration** - JSON settings with environment overrides

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod catalog;
pub mod config;
mod error;
mod intent;
pub mod session;
pub mod storage;
mod store;

pub use catalog::{CatalogState, CollectionKind, FiltersPatch, ListKind, Slot};
pub use config::Config;
pub use error::{Error, Result};
pub use intent::Intent;
pub use session::{AuthActivity, SessionState};
pub use storage::{BlobStore, KeyringBlobStore, MemoryBlobStore, SqliteBlobStore};
pub use store::{AppState, DEFAULT_TIMEOUT, Outcome, Store};

