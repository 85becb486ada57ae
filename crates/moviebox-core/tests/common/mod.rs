//! Test doubles shared by the store integration tests.

#![allow(dead_code, clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use moviebox_auth::{
    AuthClient, AuthError, AuthSession, MockAuthBackend, PasswordChange, ProfileUpdate,
    Registration, User,
};
use moviebox_catalog::{
    CatalogClient, DiscoverFilters, Error, Genre, GenreId, MovieDetail, MovieId, MovieSummary,
    Page, Result,
};
use moviebox_core::{BlobStore, MemoryBlobStore, Store};
use tokio::sync::Semaphore;

pub fn movie(id: MovieId) -> MovieSummary {
    MovieSummary {
        id,
        title: format!("Movie {id}"),
        ..MovieSummary::default()
    }
}

pub fn page(number: u32, total_pages: u32, ids: &[MovieId]) -> Page<MovieSummary> {
    Page {
        items: ids.iter().copied().map(movie).collect(),
        page: number,
        total_pages,
        total_results: u64::from(total_pages) * 20,
    }
}

pub fn ids(movies: &[MovieSummary]) -> Vec<MovieId> {
    movies.iter().map(|m| m.id).collect()
}

/// Catalog that answers from a script keyed by request, e.g. `popular:1`,
/// `search:batman:1` or `genre:28:2`. Keys without a script fail with a
/// 500; gated keys wait until the test adds a permit.
#[derive(Default)]
pub struct ScriptedCatalog {
    pages: Mutex<HashMap<String, Page<MovieSummary>>>,
    details: Mutex<HashMap<MovieId, MovieDetail>>,
    genres: Mutex<Vec<Genre>>,
    gates: Mutex<HashMap<String, Arc<Semaphore>>>,
    calls: Mutex<Vec<String>>,
    filters: Mutex<Vec<DiscoverFilters>>,
    hang: Mutex<bool>,
}

impl ScriptedCatalog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, key: &str, page: Page<MovieSummary>) {
        self.pages.lock().unwrap().insert(key.to_string(), page);
    }

    pub fn respond_detail(&self, detail: MovieDetail) {
        self.details.lock().unwrap().insert(detail.id(), detail);
    }

    pub fn respond_genres(&self, genres: Vec<Genre>) {
        *self.genres.lock().unwrap() = genres;
    }

    /// Holds calls for `key` until [`Semaphore::add_permits`] is called.
    pub fn gate(&self, key: &str) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        self.gates
            .lock()
            .unwrap()
            .insert(key.to_string(), Arc::clone(&gate));
        gate
    }

    /// Makes every call wait forever.
    pub fn hang(&self) {
        *self.hang.lock().unwrap() = true;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_filters(&self) -> Option<DiscoverFilters> {
        self.filters.lock().unwrap().last().cloned()
    }

    async fn enter(&self, key: &str) {
        self.calls.lock().unwrap().push(key.to_string());
        let hang = *self.hang.lock().unwrap();
        if hang {
            std::future::pending::<()>().await;
        }
        let gate = self.gates.lock().unwrap().get(key).cloned();
        if let Some(gate) = gate {
            gate.acquire().await.unwrap().forget();
        }
    }

    async fn serve(&self, key: String) -> Result<Page<MovieSummary>> {
        self.enter(&key).await;
        self.pages
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .ok_or_else(|| Error::status(500, "HTTP error! status: 500"))
    }
}

#[async_trait]
impl CatalogClient for ScriptedCatalog {
    async fn popular(&self, page: u32) -> Result<Page<MovieSummary>> {
        self.serve(format!("popular:{page}")).await
    }

    async fn now_playing(&self, page: u32) -> Result<Page<MovieSummary>> {
        self.serve(format!("now_playing:{page}")).await
    }

    async fn upcoming(&self, page: u32) -> Result<Page<MovieSummary>> {
        self.serve(format!("upcoming:{page}")).await
    }

    async fn search(&self, query: &str, page: u32) -> Result<Page<MovieSummary>> {
        self.serve(format!("search:{query}:{page}")).await
    }

    async fn discover_by_genre(
        &self,
        genre_id: GenreId,
        page: u32,
        filters: &DiscoverFilters,
    ) -> Result<Page<MovieSummary>> {
        self.filters.lock().unwrap().push(filters.clone());
        self.serve(format!("genre:{genre_id}:{page}")).await
    }

    async fn genres(&self) -> Result<Vec<Genre>> {
        self.enter("genres").await;
        Ok(self.genres.lock().unwrap().clone())
    }

    async fn movie_details(&self, id: MovieId) -> Result<MovieDetail> {
        self.enter(&format!("movie:{id}")).await;
        self.details
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("movie {id}")))
    }
}

/// Memory store whose writes can be held or made to fail.
#[derive(Default)]
pub struct ControlledBlobs {
    inner: MemoryBlobStore,
    gate: Mutex<Option<Arc<Semaphore>>>,
    fail_writes: Mutex<bool>,
}

impl ControlledBlobs {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Holds every `set` until permits are added.
    pub fn gate_writes(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }
}

#[async_trait]
impl BlobStore for ControlledBlobs {
    async fn get(&self, key: &str) -> moviebox_core::Result<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> moviebox_core::Result<()> {
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.acquire().await.unwrap().forget();
        }
        let fail = *self.fail_writes.lock().unwrap();
        if fail {
            return Err(std::io::Error::other("disk full").into());
        }
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> moviebox_core::Result<()> {
        self.inner.remove(key).await
    }
}

/// Mock auth whose revoke call always fails.
pub struct FailingLogout(pub MockAuthBackend);

#[async_trait]
impl AuthClient for FailingLogout {
    async fn login(&self, email: &str, password: &str) -> moviebox_auth::Result<AuthSession> {
        self.0.login(email, password).await
    }

    async fn register(&self, registration: &Registration) -> moviebox_auth::Result<AuthSession> {
        self.0.register(registration).await
    }

    async fn logout(&self, _token: &str) -> moviebox_auth::Result<()> {
        Err(AuthError::Service("Logout failed".into()))
    }

    async fn verify_token(&self, token: &str) -> moviebox_auth::Result<AuthSession> {
        self.0.verify_token(token).await
    }

    async fn update_profile(
        &self,
        token: &str,
        update: &ProfileUpdate,
    ) -> moviebox_auth::Result<User> {
        self.0.update_profile(token, update).await
    }

    async fn change_password(
        &self,
        token: &str,
        change: &PasswordChange,
    ) -> moviebox_auth::Result<()> {
        self.0.change_password(token, change).await
    }
}

/// Mock auth that counts `verify_token` calls.
#[derive(Default)]
pub struct CountingVerify {
    pub backend: MockAuthBackend,
    verifies: AtomicUsize,
}

impl CountingVerify {
    pub fn verifies(&self) -> usize {
        self.verifies.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthClient for CountingVerify {
    async fn login(&self, email: &str, password: &str) -> moviebox_auth::Result<AuthSession> {
        self.backend.login(email, password).await
    }

    async fn register(&self, registration: &Registration) -> moviebox_auth::Result<AuthSession> {
        self.backend.register(registration).await
    }

    async fn logout(&self, token: &str) -> moviebox_auth::Result<()> {
        self.backend.logout(token).await
    }

    async fn verify_token(&self, token: &str) -> moviebox_auth::Result<AuthSession> {
        self.verifies.fetch_add(1, Ordering::SeqCst);
        self.backend.verify_token(token).await
    }

    async fn update_profile(
        &self,
        token: &str,
        update: &ProfileUpdate,
    ) -> moviebox_auth::Result<User> {
        self.backend.update_profile(token, update).await
    }

    async fn change_password(
        &self,
        token: &str,
        change: &PasswordChange,
    ) -> moviebox_auth::Result<()> {
        self.backend.change_password(token, change).await
    }
}

pub struct Harness {
    pub store: Store,
    pub catalog: Arc<ScriptedCatalog>,
    pub auth: Arc<MockAuthBackend>,
    pub blobs: Arc<ControlledBlobs>,
}

pub fn harness() -> Harness {
    harness_with_timeout(Duration::from_secs(10))
}

pub fn harness_with_timeout(timeout: Duration) -> Harness {
    let catalog = ScriptedCatalog::new();
    let auth = Arc::new(MockAuthBackend::new());
    let blobs = ControlledBlobs::new();
    let store = Store::with_timeout(
        Arc::clone(&catalog) as Arc<dyn CatalogClient>,
        Arc::clone(&auth) as Arc<dyn AuthClient>,
        Arc::clone(&blobs) as Arc<dyn BlobStore>,
        timeout,
    );
    Harness {
        store,
        catalog,
        auth,
        blobs,
    }
}
