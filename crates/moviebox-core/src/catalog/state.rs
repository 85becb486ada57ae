//! Catalog state.

use moviebox_catalog::{DiscoverFilters, Genre, GenreId, MovieDetail, MovieId, MovieSummary, SortBy};
use serde::Serialize;

/// A named paginated list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListKind {
    /// Popularity-ranked listing.
    Popular,
    /// Movies in theatres.
    NowPlaying,
    /// Upcoming releases.
    Upcoming,
    /// Title search results.
    Search,
    /// Discover results for the selected genre.
    ByGenre,
}

impl ListKind {
    /// All list kinds.
    pub const ALL: [Self; 5] = [
        Self::Popular,
        Self::NowPlaying,
        Self::Upcoming,
        Self::Search,
        Self::ByGenre,
    ];

    /// Parses a list name as typed by a user.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "popular" => Some(Self::Popular),
            "now-playing" | "now_playing" | "nowplaying" => Some(Self::NowPlaying),
            "upcoming" => Some(Self::Upcoming),
            "search" => Some(Self::Search),
            "genre" | "by-genre" | "bygenre" => Some(Self::ByGenre),
            _ => None,
        }
    }
}

/// What a list request asks the catalog for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListRequest {
    /// Popular movies.
    Popular,
    /// Now playing.
    NowPlaying,
    /// Upcoming.
    Upcoming,
    /// Title search.
    Search(String),
    /// Discover by genre.
    Genre(GenreId),
}

impl ListRequest {
    /// The list this request fills.
    #[must_use]
    pub const fn kind(&self) -> ListKind {
        match self {
            Self::Popular => ListKind::Popular,
            Self::NowPlaying => ListKind::NowPlaying,
            Self::Upcoming => ListKind::Upcoming,
            Self::Search(_) => ListKind::Search,
            Self::Genre(_) => ListKind::ByGenre,
        }
    }
}

/// A movie-id collection owned by the signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollectionKind {
    /// Favorites.
    Favorites,
    /// Watchlist.
    Watchlist,
}

/// Scope of a loading flag or error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Slot {
    /// A named list.
    List(ListKind),
    /// Genre reference list.
    Genres,
    /// Current movie detail.
    Details,
    /// A user collection.
    Collection(CollectionKind),
}

/// Accumulated results of one named list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryState {
    /// Results in service order, without duplicate ids.
    pub movies: Vec<MovieSummary>,
    /// Last page applied; 0 before the first response.
    pub current_page: u32,
    /// Total pages reported by the service.
    pub total_pages: u32,
    /// Total results reported by the service.
    pub total_results: u64,
    /// A request is outstanding.
    pub is_loading: bool,
    /// Message of the last failure.
    pub error: Option<String>,
    /// Ticket of the most recent request.
    pub latest_request: u64,
}

impl QueryState {
    /// True if a later page exists and nothing is in flight.
    #[must_use]
    pub const fn can_load_more(&self) -> bool {
        !self.is_loading && self.current_page > 0 && self.current_page < self.total_pages
    }

    pub(crate) fn reset(&mut self) {
        *self = Self {
            latest_request: self.latest_request + 1,
            ..Self::default()
        };
    }
}

/// Genre reference data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenresState {
    /// Genres in service order.
    pub genres: Vec<Genre>,
    /// A request is outstanding.
    pub is_loading: bool,
    /// Message of the last failure.
    pub error: Option<String>,
    /// Ticket of the most recent request.
    pub latest_request: u64,
}

impl GenresState {
    /// Name of a genre, if known.
    #[must_use]
    pub fn name(&self, id: GenreId) -> Option<&str> {
        self.genres
            .iter()
            .find(|g| g.id == id)
            .map(|g| g.name.as_str())
    }
}

/// The movie shown on the detail view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DetailsState {
    /// Loaded detail.
    pub current_movie: Option<MovieDetail>,
    /// Id of the most recent request.
    pub requested: Option<MovieId>,
    /// A request is outstanding.
    pub is_loading: bool,
    /// Message of the last failure.
    pub error: Option<String>,
    /// The last failure was a missing movie.
    pub not_found: bool,
    /// Ticket of the most recent request.
    pub latest_request: u64,
}

/// Insertion-ordered set of movie ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MovieSet(Vec<MovieId>);

impl MovieSet {
    /// Builds a set, dropping repeated ids.
    #[must_use]
    pub fn from_ids(ids: impl IntoIterator<Item = MovieId>) -> Self {
        let mut set = Self::default();
        for id in ids {
            set.insert(id);
        }
        set
    }

    /// Returns true if `id` is a member.
    #[must_use]
    pub fn contains(&self, id: MovieId) -> bool {
        self.0.contains(&id)
    }

    /// Adds `id`; returns false if it was already present.
    pub fn insert(&mut self, id: MovieId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.0.push(id);
        true
    }

    /// Removes `id`; returns false if it was absent.
    pub fn remove(&mut self, id: MovieId) -> bool {
        let before = self.0.len();
        self.0.retain(|&m| m != id);
        self.0.len() != before
    }

    /// Flips membership of `id` and returns the new membership.
    pub fn toggle(&mut self, id: MovieId) -> bool {
        if self.remove(id) { false } else { self.insert(id) }
    }

    /// Member ids in insertion order.
    #[must_use]
    pub fn ids(&self) -> &[MovieId] {
        &self.0
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Favorites or watchlist with its persistence bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectionState {
    /// Members.
    pub items: MovieSet,
    /// Members as last written to storage.
    pub saved: MovieSet,
    /// A toggle is waiting for its write to finish.
    pub is_saving: bool,
    /// Message of the last failed write.
    pub error: Option<String>,
    /// Incremented on every toggle.
    pub revision: u64,
}

/// Partial update of [`DiscoverFilters`].
///
/// `None` leaves a field unchanged; `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FiltersPatch {
    /// Release year.
    pub year: Option<Option<i32>>,
    /// Minimum rating.
    pub min_rating: Option<Option<f64>>,
    /// Sort order.
    pub sort_by: Option<SortBy>,
}

impl FiltersPatch {
    /// Returns `filters` with this patch applied.
    #[must_use]
    pub fn apply(&self, filters: &DiscoverFilters) -> DiscoverFilters {
        DiscoverFilters {
            year: self.year.unwrap_or(filters.year),
            min_rating: self.min_rating.unwrap_or(filters.min_rating),
            sort_by: self.sort_by.unwrap_or(filters.sort_by),
        }
    }
}

/// Everything the catalog views read.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogState {
    /// Popular movies.
    pub popular: QueryState,
    /// Now playing.
    pub now_playing: QueryState,
    /// Upcoming.
    pub upcoming: QueryState,
    /// Search results.
    pub search: QueryState,
    /// Discover-by-genre results.
    pub by_genre: QueryState,
    /// Query of the latest search.
    pub search_query: String,
    /// Genre of the latest discover request.
    pub selected_genre: Option<GenreId>,
    /// Filters sent with discover requests.
    pub filters: DiscoverFilters,
    /// Genre reference list.
    pub genres: GenresState,
    /// Detail view.
    pub details: DetailsState,
    /// Favorite movie ids.
    pub favorites: CollectionState,
    /// Watchlist movie ids.
    pub watchlist: CollectionState,
}

impl CatalogState {
    /// The named list for `kind`.
    #[must_use]
    pub const fn list(&self, kind: ListKind) -> &QueryState {
        match kind {
            ListKind::Popular => &self.popular,
            ListKind::NowPlaying => &self.now_playing,
            ListKind::Upcoming => &self.upcoming,
            ListKind::Search => &self.search,
            ListKind::ByGenre => &self.by_genre,
        }
    }

    pub(crate) const fn list_mut(&mut self, kind: ListKind) -> &mut QueryState {
        match kind {
            ListKind::Popular => &mut self.popular,
            ListKind::NowPlaying => &mut self.now_playing,
            ListKind::Upcoming => &mut self.upcoming,
            ListKind::Search => &mut self.search,
            ListKind::ByGenre => &mut self.by_genre,
        }
    }

    /// The collection for `kind`.
    #[must_use]
    pub const fn collection(&self, kind: CollectionKind) -> &CollectionState {
        match kind {
            CollectionKind::Favorites => &self.favorites,
            CollectionKind::Watchlist => &self.watchlist,
        }
    }

    pub(crate) const fn collection_mut(&mut self, kind: CollectionKind) -> &mut CollectionState {
        match kind {
            CollectionKind::Favorites => &mut self.favorites,
            CollectionKind::Watchlist => &mut self.watchlist,
        }
    }

    /// Returns true if `id` is a favorite.
    #[must_use]
    pub fn is_favorite(&self, id: MovieId) -> bool {
        self.favorites.items.contains(id)
    }

    /// Returns true if `id` is on the watchlist.
    #[must_use]
    pub fn is_in_watchlist(&self, id: MovieId) -> bool {
        self.watchlist.items.contains(id)
    }

    /// Looks a movie up across all loaded lists.
    #[must_use]
    pub fn find_movie(&self, id: MovieId) -> Option<&MovieSummary> {
        ListKind::ALL
            .iter()
            .flat_map(|&kind| self.list(kind).movies.iter())
            .find(|m| m.id == id)
    }

    /// Error recorded for `slot`.
    #[must_use]
    pub fn error(&self, slot: Slot) -> Option<&str> {
        match slot {
            Slot::List(kind) => self.list(kind).error.as_deref(),
            Slot::Genres => self.genres.error.as_deref(),
            Slot::Details => self.details.error.as_deref(),
            Slot::Collection(kind) => self.collection(kind).error.as_deref(),
        }
    }

    /// Loading flag for `slot`.
    #[must_use]
    pub const fn is_loading(&self, slot: Slot) -> bool {
        match slot {
            Slot::List(kind) => self.list(kind).is_loading,
            Slot::Genres => self.genres.is_loading,
            Slot::Details => self.details.is_loading,
            Slot::Collection(kind) => self.collection(kind).is_saving,
        }
    }

    pub(crate) fn clear_error(&mut self, slot: Slot) {
        match slot {
            Slot::List(kind) => self.list_mut(kind).error = None,
            Slot::Genres => self.genres.error = None,
            Slot::Details => {
                self.details.error = None;
                self.details.not_found = false;
            }
            Slot::Collection(kind) => self.collection_mut(kind).error = None,
        }
    }
}
