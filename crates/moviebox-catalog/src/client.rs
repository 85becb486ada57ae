//! Catalog client trait and the HTTP implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};
use crate::model::{DiscoverFilters, Genre, GenreId, MovieDetail, MovieId, MovieSummary, Page};
use crate::raw::{Mapper, RawError, RawGenres, RawMovieDetail, RawPage};

/// Default API root for TMDb.
pub const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Default image CDN prefix for TMDb.
pub const TMDB_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Read access to a movie catalog.
///
/// Implemented by [`TmdbClient`] for the real service; tests provide their
/// own implementations.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetches one page of the popularity-ranked listing.
    async fn popular(&self, page: u32) -> Result<Page<MovieSummary>>;

    /// Fetches one page of movies currently in theatres.
    async fn now_playing(&self, page: u32) -> Result<Page<MovieSummary>>;

    /// Fetches one page of upcoming releases.
    async fn upcoming(&self, page: u32) -> Result<Page<MovieSummary>>;

    /// Searches movies by title.
    async fn search(&self, query: &str, page: u32) -> Result<Page<MovieSummary>>;

    /// Discovers movies in a genre.
    async fn discover_by_genre(
        &self,
        genre_id: GenreId,
        page: u32,
        filters: &DiscoverFilters,
    ) -> Result<Page<MovieSummary>>;

    /// Fetches the genre reference list.
    async fn genres(&self) -> Result<Vec<Genre>>;

    /// Fetches full detail for a movie.
    ///
    /// Returns [`Error::NotFound`] when the id has no matching movie.
    async fn movie_details(&self, id: MovieId) -> Result<MovieDetail>;
}

/// Connection settings for a TMDb-compatible catalog.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// API root; always ends with `/`.
    pub base_url: Url,
    /// Prefix for poster, backdrop and profile paths.
    pub image_base_url: String,
    /// API key sent as the `api_key` query parameter.
    pub api_key: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl CatalogConfig {
    /// Creates a configuration for a custom endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot be parsed or the API key is empty.
    pub fn new(
        base_url: &str,
        image_base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::InvalidConfig("catalog API key is empty".into()));
        }

        let base_url = if base_url.ends_with('/') {
            Url::parse(base_url)?
        } else {
            Url::parse(&format!("{base_url}/"))?
        };

        Ok(Self {
            base_url,
            image_base_url: image_base_url.into(),
            api_key,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Creates a configuration for the public TMDb service.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty.
    pub fn tmdb(api_key: impl Into<String>) -> Result<Self> {
        Self::new(TMDB_BASE_URL, TMDB_IMAGE_BASE_URL, api_key)
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// HTTP catalog client for TMDb-compatible services.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    config: CatalogConfig,
    http_client: Client,
}

impl TmdbClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: CatalogConfig) -> Result<Self> {
        let http_client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            config,
            http_client,
        })
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &CatalogConfig {
        &self.config
    }

    fn mapper(&self) -> Mapper<'_> {
        Mapper::new(&self.config.image_base_url)
    }

    /// Builds an endpoint URL with the API key and extra query parameters.
    fn endpoint(&self, path: &str, params: &[(&str, String)]) -> Result<Url> {
        let mut url = self.config.base_url.join(path)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("api_key", &self.config.api_key);
            for (key, value) in params {
                query.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, resource: &str) -> Result<T> {
        debug!("GET {}", url.path());
        let response = self.http_client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(resource.to_string()));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<RawError>(&body)
                .ok()
                .and_then(RawError::into_message)
                .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
            return Err(Error::status(status.as_u16(), message));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(Into::into)
    }

    async fn list(&self, path: &str, params: &[(&str, String)]) -> Result<Page<MovieSummary>> {
        let url = self.endpoint(path, params)?;
        let raw: RawPage = self.get_json(url, path).await?;
        Ok(self.mapper().page(raw))
    }
}

/// Query parameters for a discover request.
fn discover_params(genre_id: GenreId, page: u32, filters: &DiscoverFilters) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("with_genres", genre_id.to_string()),
        ("page", page.to_string()),
        ("sort_by", filters.sort_by.as_query().to_string()),
    ];
    if let Some(year) = filters.year {
        params.push(("primary_release_year", year.to_string()));
    }
    if let Some(rating) = filters.min_rating {
        params.push(("vote_average.gte", rating.to_string()));
    }
    params
}

#[async_trait]
impl CatalogClient for TmdbClient {
    async fn popular(&self, page: u32) -> Result<Page<MovieSummary>> {
        self.list("movie/popular", &[("page", page.to_string())])
            .await
    }

    async fn now_playing(&self, page: u32) -> Result<Page<MovieSummary>> {
        self.list("movie/now_playing", &[("page", page.to_string())])
            .await
    }

    async fn upcoming(&self, page: u32) -> Result<Page<MovieSummary>> {
        self.list("movie/upcoming", &[("page", page.to_string())])
            .await
    }

    async fn search(&self, query: &str, page: u32) -> Result<Page<MovieSummary>> {
        self.list(
            "search/movie",
            &[("query", query.to_string()), ("page", page.to_string())],
        )
        .await
    }

    async fn discover_by_genre(
        &self,
        genre_id: GenreId,
        page: u32,
        filters: &DiscoverFilters,
    ) -> Result<Page<MovieSummary>> {
        self.list("discover/movie", &discover_params(genre_id, page, filters))
            .await
    }

    async fn genres(&self) -> Result<Vec<Genre>> {
        let url = self.endpoint("genre/movie/list", &[])?;
        let raw: RawGenres = self.get_json(url, "genre list").await?;
        Ok(raw.genres)
    }

    async fn movie_details(&self, id: MovieId) -> Result<MovieDetail> {
        let url = self.endpoint(
            &format!("movie/{id}"),
            &[("append_to_response", "credits,reviews,videos".to_string())],
        )?;
        let raw: RawMovieDetail = self.get_json(url, &format!("movie {id}")).await?;
        Ok(self.mapper().detail(raw))
    }
}
