//! Wire types for the catalog service and their mapping into domain models.

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use crate::model::{
    CastMember, CrewMember, Genre, GenreId, MovieDetail, MovieId, MovieSummary, Page,
    ProductionCompany, ProductionCountry, Review, Video,
};

/// Number of cast members kept on a detail.
const MAX_CAST: usize = 10;

/// Number of reviews kept on a detail.
const MAX_REVIEWS: usize = 5;

/// Movie entry as returned by list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMovie {
    pub id: MovieId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default, alias = "rating")]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u64>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub genre_ids: Vec<GenreId>,
    #[serde(default)]
    pub adult: bool,
}

/// Paginated list response.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPage {
    #[serde(default)]
    pub results: Vec<RawMovie>,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u64,
}

const fn first_page() -> u32 {
    1
}

/// Genre list response.
#[derive(Debug, Clone, Deserialize)]
pub struct RawGenres {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

/// Error body returned by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct RawError {
    #[serde(default)]
    pub status_message: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl RawError {
    pub fn into_message(self) -> Option<String> {
        self.status_message.or(self.message)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCompany {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
    #[serde(default)]
    pub origin_country: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCast {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub character: String,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub order: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCrew {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub job: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCredits {
    #[serde(default)]
    pub cast: Vec<RawCast>,
    #[serde(default)]
    pub crew: Vec<RawCrew>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAuthorDetails {
    #[serde(default)]
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawReview {
    pub id: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author_details: Option<RawAuthorDetails>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawVideo {
    pub id: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub site: String,
    #[serde(default, rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawResults<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// Detail response with `credits`, `reviews` and `videos` appended.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMovieDetail {
    #[serde(flatten)]
    pub movie: RawMovie,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub budget: Option<u64>,
    #[serde(default)]
    pub revenue: Option<u64>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub production_companies: Vec<RawCompany>,
    #[serde(default)]
    pub production_countries: Vec<ProductionCountry>,
    #[serde(default)]
    pub credits: Option<RawCredits>,
    #[serde(default)]
    pub reviews: Option<RawResults<RawReview>>,
    #[serde(default)]
    pub videos: Option<RawResults<RawVideo>>,
}

/// Maps wire types to domain models, resolving image paths against a CDN base.
#[derive(Debug, Clone)]
pub struct Mapper<'a> {
    image_base_url: &'a str,
}

impl<'a> Mapper<'a> {
    pub const fn new(image_base_url: &'a str) -> Self {
        Self { image_base_url }
    }

    fn image_url(&self, path: Option<&str>) -> Option<String> {
        let path = path?.trim();
        if path.is_empty() {
            return None;
        }
        Some(format!("{}{path}", self.image_base_url.trim_end_matches('/')))
    }

    pub fn summary(&self, raw: RawMovie) -> MovieSummary {
        let title = raw
            .title
            .filter(|t| !t.is_empty())
            .or_else(|| raw.original_title.clone())
            .unwrap_or_default();

        MovieSummary {
            id: raw.id,
            title,
            release_year: raw.release_date.as_deref().and_then(release_year),
            poster_url: self.image_url(raw.poster_path.as_deref()),
            backdrop_url: self.image_url(raw.backdrop_path.as_deref()),
            release_date: raw.release_date.filter(|d| !d.is_empty()),
            overview: raw.overview.unwrap_or_default(),
            rating_average: raw.vote_average,
            vote_count: raw.vote_count,
            popularity: raw.popularity,
            genre_ids: raw.genre_ids.into_iter().collect(),
            original_title: raw.original_title,
            original_language: raw.original_language,
            adult: raw.adult,
        }
    }

    pub fn page(&self, raw: RawPage) -> Page<MovieSummary> {
        Page {
            items: raw.results.into_iter().map(|m| self.summary(m)).collect(),
            page: raw.page,
            total_pages: raw.total_pages,
            total_results: raw.total_results,
        }
    }

    pub fn detail(&self, raw: RawMovieDetail) -> MovieDetail {
        let mut summary = self.summary(raw.movie);
        if summary.genre_ids.is_empty() {
            summary.genre_ids = raw.genres.iter().map(|g| g.id).collect();
        }

        let credits = raw.credits.unwrap_or_default();
        let cast = credits
            .cast
            .into_iter()
            .take(MAX_CAST)
            .map(|c| CastMember {
                profile_url: self.image_url(c.profile_path.as_deref()),
                id: c.id,
                name: c.name,
                character: c.character,
                order: c.order,
            })
            .collect();
        let crew: Vec<CrewMember> = credits
            .crew
            .into_iter()
            .map(|c| CrewMember {
                profile_url: self.image_url(c.profile_path.as_deref()),
                id: c.id,
                name: c.name,
                job: c.job,
                department: c.department,
            })
            .collect();
        let director = crew.iter().find(|c| c.job == "Director").cloned();

        let reviews = raw
            .reviews
            .map(|r| r.results)
            .unwrap_or_default()
            .into_iter()
            .take(MAX_REVIEWS)
            .map(|r| Review {
                id: r.id,
                author: r.author,
                content: r.content,
                rating: r.author_details.and_then(|d| d.rating),
                url: r.url,
                created_at: r.created_at,
            })
            .collect();

        let videos: Vec<Video> = raw
            .videos
            .map(|v| v.results)
            .unwrap_or_default()
            .into_iter()
            .map(|v| Video {
                id: v.id,
                key: v.key,
                name: v.name,
                site: v.site,
                kind: v.kind,
            })
            .collect();
        let trailer = videos.iter().find(|v| v.is_youtube_trailer()).cloned();

        MovieDetail {
            summary,
            tagline: raw.tagline.filter(|t| !t.is_empty()),
            status: raw.status,
            runtime_minutes: raw.runtime,
            budget: raw.budget,
            revenue: raw.revenue,
            homepage: raw.homepage.filter(|h| !h.is_empty()),
            imdb_id: raw.imdb_id,
            genres: raw.genres,
            production_companies: raw
                .production_companies
                .into_iter()
                .map(|c| ProductionCompany {
                    logo_url: self.image_url(c.logo_path.as_deref()),
                    id: c.id,
                    name: c.name,
                    origin_country: c.origin_country.filter(|o| !o.is_empty()),
                })
                .collect(),
            production_countries: raw.production_countries,
            cast,
            crew,
            director,
            reviews,
            videos,
            trailer,
        }
    }
}

/// Extracts the year from a `YYYY-MM-DD` release date.
fn release_year(date: &str) -> Option<i32> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .ok()
        .map(|d| d.year())
}
