//! Catalog domain models.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Catalog-stable movie identifier.
pub type MovieId = u64;

/// Genre identifier.
pub type GenreId = u32;

/// Lightweight catalog entry used by list views.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MovieSummary {
    /// Unique identifier.
    pub id: MovieId,
    /// Display title.
    pub title: String,
    /// Year extracted from the release date.
    pub release_year: Option<i32>,
    /// Raw release date (`YYYY-MM-DD`).
    pub release_date: Option<String>,
    /// Absolute poster URL.
    pub poster_url: Option<String>,
    /// Absolute backdrop URL.
    pub backdrop_url: Option<String>,
    /// Plot overview.
    pub overview: String,
    /// Average rating (0-10).
    pub rating_average: Option<f64>,
    /// Number of votes behind the average.
    pub vote_count: Option<u64>,
    /// Popularity score.
    pub popularity: Option<f64>,
    /// Genres the movie belongs to.
    pub genre_ids: BTreeSet<GenreId>,
    /// Title in the original language.
    pub original_title: Option<String>,
    /// ISO 639-1 code of the original language.
    pub original_language: Option<String>,
    /// Adult content flag.
    pub adult: bool,
}

/// Genre reference data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genre {
    /// Genre identifier.
    pub id: GenreId,
    /// Display name.
    pub name: String,
}

/// Production company credited on a movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionCompany {
    /// Company identifier.
    pub id: u64,
    /// Company name.
    pub name: String,
    /// Absolute logo URL.
    pub logo_url: Option<String>,
    /// Country of origin.
    pub origin_country: Option<String>,
}

/// Production country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionCountry {
    /// ISO 3166-1 code.
    pub iso_3166_1: String,
    /// Country name.
    pub name: String,
}

/// Cast credit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastMember {
    /// Person identifier.
    pub id: u64,
    /// Actor name.
    pub name: String,
    /// Character played.
    pub character: String,
    /// Absolute profile image URL.
    pub profile_url: Option<String>,
    /// Billing order.
    pub order: u32,
}

/// Crew credit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewMember {
    /// Person identifier.
    pub id: u64,
    /// Person name.
    pub name: String,
    /// Job title (e.g. `Director`).
    pub job: String,
    /// Department.
    pub department: String,
    /// Absolute profile image URL.
    pub profile_url: Option<String>,
}

/// User review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Review identifier.
    pub id: String,
    /// Author name.
    pub author: String,
    /// Review body.
    pub content: String,
    /// Author's rating, if given.
    pub rating: Option<f64>,
    /// Link to the review.
    pub url: Option<String>,
    /// Creation timestamp as reported by the service.
    pub created_at: Option<String>,
}

/// Video attached to a movie (trailers, teasers, clips).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    /// Video identifier.
    pub id: String,
    /// Hosting site key (e.g. `dQw4w9WgXcQ`).
    pub key: String,
    /// Title.
    pub name: String,
    /// Hosting site (e.g. `YouTube`).
    pub site: String,
    /// Video type (e.g. `Trailer`).
    pub kind: String,
}

impl Video {
    /// Returns true for a YouTube trailer.
    #[must_use]
    pub fn is_youtube_trailer(&self) -> bool {
        self.kind == "Trailer" && self.site == "YouTube"
    }
}

/// Full movie detail, fetched on demand.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MovieDetail {
    /// Summary fields shared with list views.
    pub summary: MovieSummary,
    /// Tagline.
    pub tagline: Option<String>,
    /// Release status (e.g. `Released`).
    pub status: Option<String>,
    /// Runtime in minutes.
    pub runtime_minutes: Option<u32>,
    /// Budget in USD.
    pub budget: Option<u64>,
    /// Revenue in USD.
    pub revenue: Option<u64>,
    /// Official homepage.
    pub homepage: Option<String>,
    /// IMDb identifier.
    pub imdb_id: Option<String>,
    /// Genres with names.
    pub genres: Vec<Genre>,
    /// Production companies.
    pub production_companies: Vec<ProductionCompany>,
    /// Production countries.
    pub production_countries: Vec<ProductionCountry>,
    /// Top-billed cast.
    pub cast: Vec<CastMember>,
    /// Full crew.
    pub crew: Vec<CrewMember>,
    /// Director, if credited.
    pub director: Option<CrewMember>,
    /// Most recent reviews.
    pub reviews: Vec<Review>,
    /// All attached videos.
    pub videos: Vec<Video>,
    /// Preferred trailer.
    pub trailer: Option<Video>,
}

impl MovieDetail {
    /// Returns the movie identifier.
    #[must_use]
    pub const fn id(&self) -> MovieId {
        self.summary.id
    }
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page, in service order.
    pub items: Vec<T>,
    /// 1-based page number.
    pub page: u32,
    /// Total number of pages.
    pub total_pages: u32,
    /// Total number of results across all pages.
    pub total_results: u64,
}

impl<T> Page<T> {
    /// Returns true if more pages follow this one.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Sort order for discover queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Most popular first.
    #[default]
    Popularity,
    /// Highest rated first.
    Rating,
    /// Newest first.
    ReleaseDate,
    /// Alphabetical by original title.
    Title,
}

impl SortBy {
    /// Query-string value understood by the discover endpoint.
    #[must_use]
    pub const fn as_query(&self) -> &'static str {
        match self {
            Self::Popularity => "popularity.desc",
            Self::Rating => "vote_average.desc",
            Self::ReleaseDate => "primary_release_date.desc",
            Self::Title => "original_title.asc",
        }
    }

    /// Parses a user-supplied sort name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "popularity" | "popularity.desc" => Some(Self::Popularity),
            "rating" | "vote_average.desc" => Some(Self::Rating),
            "release" | "release_date" | "primary_release_date.desc" => Some(Self::ReleaseDate),
            "title" | "original_title.asc" => Some(Self::Title),
            _ => None,
        }
    }
}

/// Filters applied to discover-by-genre queries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DiscoverFilters {
    /// Primary release year.
    pub year: Option<i32>,
    /// Minimum average rating.
    pub min_rating: Option<f64>,
    /// Sort order.
    pub sort_by: SortBy,
}
