//! The state holder views read from and dispatch intents to.
//!
//! A [`Store`] owns an [`AppState`] inside a `tokio::sync::watch` channel.
//! Every operation is an async method that emits `*Requested`/`Started`
//! events before its external call and one settle event after it; each event
//! goes through the pure reducers, so a snapshot only ever changes between
//! suspension points. Results of superseded requests are dropped.

mod catalog;
mod collections;
mod session;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moviebox_auth::{AuthClient, AuthError};
use moviebox_catalog::CatalogClient;
use serde::Serialize;
use tokio::sync::{Mutex, watch};

use crate::catalog::{CatalogEvent, CatalogState};
use crate::intent::Intent;
use crate::session::{SessionEvent, SessionState};
use crate::storage::BlobStore;

/// Default timeout for external calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Read-only snapshot exposed to views.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppState {
    /// Session slice.
    pub auth: SessionState,
    /// Catalog slice.
    pub movies: CatalogState,
}

/// What became of a dispatched operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The result was applied to state.
    Applied,
    /// The operation failed; the message is also recorded in state.
    Failed(String),
    /// The requested movie does not exist.
    NotFound(String),
    /// The result arrived after a newer request and was dropped.
    Discarded,
    /// New membership after a collection toggle.
    Membership(bool),
    /// The operation needs an authenticated session.
    SignInRequired,
    /// Nothing to do.
    Skipped,
}

impl Outcome {
    /// Returns true for `Failed` and `NotFound`.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_) | Self::NotFound(_))
    }
}

struct Inner {
    state: watch::Sender<AppState>,
    catalog: Arc<dyn CatalogClient>,
    auth: Arc<dyn AuthClient>,
    blobs: Arc<dyn BlobStore>,
    timeout: Duration,
    // Serializes session and collection blob writes with their epoch checks.
    persist: Mutex<()>,
}

/// Catalog and session state core.
///
/// Cheap to clone; clones share state and clients.
#[derive(Clone)]
pub struct Store {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("timeout", &self.inner.timeout)
            .finish_non_exhaustive()
    }
}

impl Store {
    /// Creates a store with empty state and the default timeout.
    #[must_use]
    pub fn new(
        catalog: Arc<dyn CatalogClient>,
        auth: Arc<dyn AuthClient>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self::with_timeout(catalog, auth, blobs, DEFAULT_TIMEOUT)
    }

    /// Creates a store with empty state that bounds every external call by `timeout`.
    #[must_use]
    pub fn with_timeout(
        catalog: Arc<dyn CatalogClient>,
        auth: Arc<dyn AuthClient>,
        blobs: Arc<dyn BlobStore>,
        timeout: Duration,
    ) -> Self {
        let (state, _) = watch::channel(AppState::default());
        Self {
            inner: Arc::new(Inner {
                state,
                catalog,
                auth,
                blobs,
                timeout,
                persist: Mutex::new(()),
            }),
        }
    }

    /// Clones the current state.
    #[must_use]
    pub fn snapshot(&self) -> AppState {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified after every applied transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.inner.state.subscribe()
    }

    /// Runs an intent to completion.
    pub async fn dispatch(&self, intent: Intent) -> Outcome {
        match intent {
            Intent::Initialize => self.initialize().await,
            Intent::SignIn { email, password } => self.sign_in(&email, &password).await,
            Intent::SignUp {
                name,
                email,
                password,
            } => self.sign_up(&name, &email, &password).await,
            Intent::SignOut => self.sign_out().await,
            Intent::VerifySession { token } => self.verify_session(&token).await,
            Intent::UpdateProfile(update) => self.update_profile(update).await,
            Intent::ChangePassword {
                current,
                new,
                confirm,
            } => self.change_password(&current, &new, &confirm).await,
            Intent::ClearAuthError => self.clear_auth_error(),
            Intent::FetchPopular { page } => self.fetch_popular(page).await,
            Intent::FetchNowPlaying { page } => self.fetch_now_playing(page).await,
            Intent::FetchUpcoming { page } => self.fetch_upcoming(page).await,
            Intent::Search { query, page } => self.search(&query, page).await,
            Intent::FetchByGenre { genre_id, page } => self.fetch_by_genre(genre_id, page).await,
            Intent::FetchGenres => self.fetch_genres().await,
            Intent::LoadNextPage(kind) => self.load_next_page(kind).await,
            Intent::ClearSearch => self.clear_search(),
            Intent::FetchMovieDetails(id) => self.fetch_movie_details(id).await,
            Intent::ClearCurrentMovie => self.clear_current_movie(),
            Intent::SetFilters(patch) => self.set_filters(&patch),
            Intent::ClearError(slot) => self.clear_error(slot),
            Intent::ToggleFavorite(id) => self.toggle_favorite(id).await,
            Intent::ToggleWatchlist(id) => self.toggle_watchlist(id).await,
        }
    }

    /// Mutates state atomically; subscribers are notified when `f` reports a change.
    fn update<R: Default>(&self, f: impl FnOnce(&mut AppState) -> (bool, R)) -> R {
        let mut result = None;
        self.inner.state.send_if_modified(|state| {
            let (changed, value) = f(state);
            result = Some(value);
            changed
        });
        result.unwrap_or_default()
    }

    /// Applies a session event; returns false if it was stale.
    fn apply_session(&self, event: SessionEvent) -> bool {
        self.update(|state| {
            if state.auth.is_stale(&event) {
                return (false, false);
            }
            state.auth = crate::session::reduce(std::mem::take(&mut state.auth), event);
            (true, true)
        })
    }

    /// Applies a session event and returns the epoch it left, or `None` if it
    /// was stale.
    fn apply_session_epoch(&self, event: SessionEvent) -> Option<u64> {
        self.update(|state| {
            if state.auth.is_stale(&event) {
                return (false, None);
            }
            state.auth = crate::session::reduce(std::mem::take(&mut state.auth), event);
            (true, Some(state.auth.epoch))
        })
    }

    /// Applies a catalog event; returns false if it was stale.
    fn apply_catalog(&self, event: CatalogEvent) -> bool {
        self.update(|state| {
            if state.movies.is_stale(&event) {
                return (false, false);
            }
            state.movies = crate::catalog::reduce(std::mem::take(&mut state.movies), event);
            (true, true)
        })
    }

    /// Applies a catalog event only while the session epoch is still `epoch`.
    fn apply_catalog_in_epoch(&self, epoch: u64, event: CatalogEvent) -> bool {
        self.update(|state| {
            if state.auth.epoch != epoch || state.movies.is_stale(&event) {
                return (false, false);
            }
            state.movies = crate::catalog::reduce(std::mem::take(&mut state.movies), event);
            (true, true)
        })
    }

    async fn bounded<T, E>(
        &self,
        call: impl Future<Output = Result<T, E>>,
        on_timeout: impl FnOnce(u64) -> E,
    ) -> Result<T, E> {
        match tokio::time::timeout(self.inner.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(on_timeout(self.inner.timeout.as_secs())),
        }
    }

    async fn auth_call<T>(
        &self,
        call: impl Future<Output = moviebox_auth::Result<T>>,
    ) -> moviebox_auth::Result<T> {
        self.bounded(call, AuthError::Timeout).await
    }

    async fn catalog_call<T>(
        &self,
        call: impl Future<Output = moviebox_catalog::Result<T>>,
    ) -> moviebox_catalog::Result<T> {
        self.bounded(call, moviebox_catalog::Error::Timeout).await
    }

    async fn storage_call<T>(
        &self,
        call: impl Future<Output = crate::Result<T>>,
    ) -> crate::Result<T> {
        self.bounded(call, crate::Error::Timeout).await
    }
}
