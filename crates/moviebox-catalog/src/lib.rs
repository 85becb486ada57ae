//! # moviebox-catalog
//!
//! Client library for a TMDb-compatible movie catalog service.
//!
//! ## Features
//!
//! - **Typed models**: [`MovieSummary`] for list views, [`MovieDetail`] for
//!   the detail view, [`Genre`] reference data and paginated [`Page`] results
//! - **Field mapping**: image paths are prefixed with the image CDN base,
//!   release dates are reduced to a year, rating aliases are unified
//! - **Pluggable transport**: everything goes through the [`CatalogClient`]
//!   trait so callers can substitute a test double
//!
//! ## Quick Start
//!
//! ```ignore
//! use moviebox_catalog::{CatalogClient, CatalogConfig, TmdbClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TmdbClient::new(CatalogConfig::tmdb("your_api_key")?)?;
//!
//!     let page = client.popular(1).await?;
//!     for movie in &page.items {
//!         println!("{} ({:?})", movie.title, movie.release_year);
//!     }
//!
//!     let detail = client.movie_details(page.items[0].id).await?;
//!     println!("Directed by {:?}", detail.director.map(|d| d.name));
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod model;
mod raw;

pub use client::{CatalogClient, CatalogConfig, TMDB_BASE_URL, TMDB_IMAGE_BASE_URL, TmdbClient};
pub use error::{Error, Result};
pub use model::{
    CastMember, CrewMember, DiscoverFilters, Genre, GenreId, MovieDetail, MovieId, MovieSummary,
    Page, ProductionCompany, ProductionCountry, Review, SortBy, Video,
};
