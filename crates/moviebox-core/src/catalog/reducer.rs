//! Catalog transitions.

use std::collections::HashSet;

use moviebox_catalog::{DiscoverFilters, Genre, MovieDetail, MovieId, MovieSummary, Page};

use super::state::{CatalogState, CollectionKind, ListKind, ListRequest, MovieSet, Slot};

/// A discrete catalog transition.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEvent {
    /// A list request was dispatched.
    ListRequested(ListRequest),
    /// A list page arrived.
    ListLoaded {
        /// What was requested.
        request: ListRequest,
        /// Ticket issued by `ListRequested`.
        ticket: u64,
        /// The page.
        page: Page<MovieSummary>,
    },
    /// A list request failed.
    ListFailed {
        /// What was requested.
        request: ListRequest,
        /// Ticket issued by `ListRequested`.
        ticket: u64,
        /// Human-readable message.
        message: String,
    },
    /// A search was rejected before any call was made.
    SearchRejected(String),
    /// Search results and query reset.
    SearchCleared,
    /// Genre list requested.
    GenresRequested,
    /// Genre list arrived.
    GenresLoaded {
        /// Ticket issued by `GenresRequested`.
        ticket: u64,
        /// Genres.
        genres: Vec<Genre>,
    },
    /// Genre list request failed.
    GenresFailed {
        /// Ticket issued by `GenresRequested`.
        ticket: u64,
        /// Human-readable message.
        message: String,
    },
    /// Movie detail requested.
    DetailsRequested(MovieId),
    /// Movie detail arrived.
    DetailsLoaded {
        /// Ticket issued by `DetailsRequested`.
        ticket: u64,
        /// Detail.
        movie: Box<MovieDetail>,
    },
    /// Movie detail request failed.
    DetailsFailed {
        /// Ticket issued by `DetailsRequested`.
        ticket: u64,
        /// Human-readable message.
        message: String,
        /// The movie does not exist.
        not_found: bool,
    },
    /// Detail view cleared.
    DetailsCleared,
    /// Membership flipped ahead of persistence.
    Toggled {
        /// Collection.
        kind: CollectionKind,
        /// Movie.
        id: MovieId,
    },
    /// The write for `revision` stored `saved`.
    ToggleSettled {
        /// Collection.
        kind: CollectionKind,
        /// Revision produced by the toggle.
        revision: u64,
        /// Members written.
        saved: MovieSet,
    },
    /// The write for `revision` failed. If no later toggle is pending the
    /// members return to the last saved set.
    ToggleFailed {
        /// Collection.
        kind: CollectionKind,
        /// Revision produced by the toggle.
        revision: u64,
        /// Human-readable message.
        message: String,
    },
    /// Collections loaded for a newly authenticated user.
    CollectionsRestored {
        /// Favorite ids.
        favorites: Vec<MovieId>,
        /// Watchlist ids.
        watchlist: Vec<MovieId>,
    },
    /// Collections emptied on sign-out.
    CollectionsCleared,
    /// Discover filters replaced.
    FiltersSet(DiscoverFilters),
    /// One error cleared, or all of them.
    ErrorCleared(Option<Slot>),
}

impl CatalogState {
    /// Returns true if `event` settles a request that has been superseded.
    #[must_use]
    pub fn is_stale(&self, event: &CatalogEvent) -> bool {
        match event {
            CatalogEvent::ListLoaded {
                request, ticket, ..
            }
            | CatalogEvent::ListFailed {
                request, ticket, ..
            } => {
                let superseded = *ticket != self.list(request.kind()).latest_request;
                let mismatched = match request {
                    ListRequest::Search(query) => *query != self.search_query,
                    ListRequest::Genre(genre) => Some(*genre) != self.selected_genre,
                    _ => false,
                };
                superseded || mismatched
            }
            CatalogEvent::GenresLoaded { ticket, .. } | CatalogEvent::GenresFailed { ticket, .. } => {
                *ticket != self.genres.latest_request
            }
            CatalogEvent::DetailsLoaded { ticket, .. }
            | CatalogEvent::DetailsFailed { ticket, .. } => *ticket != self.details.latest_request,
            _ => false,
        }
    }
}

fn merge_page(state: &mut CatalogState, kind: ListKind, page: Page<MovieSummary>) {
    let list = state.list_mut(kind);
    if page.page <= 1 {
        list.movies = page.items;
    } else {
        let mut seen: HashSet<MovieId> = list.movies.iter().map(|m| m.id).collect();
        list.movies
            .extend(page.items.into_iter().filter(|m| seen.insert(m.id)));
    }
    list.current_page = page.page.max(1);
    list.total_pages = page.total_pages;
    list.total_results = page.total_results;
    list.is_loading = false;
    list.error = None;
}

/// Applies `event` to `state`.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn reduce(mut state: CatalogState, event: CatalogEvent) -> CatalogState {
    if state.is_stale(&event) {
        return state;
    }

    match event {
        CatalogEvent::ListRequested(request) => {
            match &request {
                ListRequest::Search(query) => state.search_query.clone_from(query),
                ListRequest::Genre(genre) => state.selected_genre = Some(*genre),
                _ => {}
            }
            let list = state.list_mut(request.kind());
            list.latest_request += 1;
            list.is_loading = true;
            list.error = None;
        }
        CatalogEvent::ListLoaded { request, page, .. } => {
            merge_page(&mut state, request.kind(), page);
        }
        CatalogEvent::ListFailed {
            request, message, ..
        } => {
            let list = state.list_mut(request.kind());
            list.is_loading = false;
            list.error = Some(message);
            if request.kind() == ListKind::Search {
                list.movies.clear();
            }
        }
        CatalogEvent::SearchRejected(message) => {
            state.search.error = Some(message);
        }
        CatalogEvent::SearchCleared => {
            state.search.reset();
            state.search_query.clear();
        }
        CatalogEvent::GenresRequested => {
            state.genres.latest_request += 1;
            state.genres.is_loading = true;
            state.genres.error = None;
        }
        CatalogEvent::GenresLoaded { genres, .. } => {
            state.genres.genres = genres;
            state.genres.is_loading = false;
        }
        CatalogEvent::GenresFailed { message, .. } => {
            state.genres.is_loading = false;
            state.genres.error = Some(message);
        }
        CatalogEvent::DetailsRequested(id) => {
            let details = &mut state.details;
            details.latest_request += 1;
            details.requested = Some(id);
            details.is_loading = true;
            details.error = None;
            details.not_found = false;
        }
        CatalogEvent::DetailsLoaded { movie, .. } => {
            state.details.current_movie = Some(*movie);
            state.details.is_loading = false;
        }
        CatalogEvent::DetailsFailed {
            message, not_found, ..
        } => {
            state.details.is_loading = false;
            state.details.error = Some(message);
            state.details.not_found = not_found;
        }
        CatalogEvent::DetailsCleared => {
            let details = &mut state.details;
            details.latest_request += 1;
            details.current_movie = None;
            details.requested = None;
            details.is_loading = false;
            details.error = None;
            details.not_found = false;
        }
        CatalogEvent::Toggled { kind, id } => {
            let collection = state.collection_mut(kind);
            collection.items.toggle(id);
            collection.revision += 1;
            collection.is_saving = true;
            collection.error = None;
        }
        CatalogEvent::ToggleSettled {
            kind,
            revision,
            saved,
        } => {
            let collection = state.collection_mut(kind);
            collection.saved = saved;
            if revision == collection.revision {
                collection.is_saving = false;
            }
        }
        CatalogEvent::ToggleFailed {
            kind,
            revision,
            message,
        } => {
            let collection = state.collection_mut(kind);
            collection.error = Some(message);
            if revision == collection.revision {
                collection.items = collection.saved.clone();
                collection.is_saving = false;
            }
        }
        CatalogEvent::CollectionsRestored {
            favorites,
            watchlist,
        } => {
            state.favorites.items = MovieSet::from_ids(favorites);
            state.favorites.saved = state.favorites.items.clone();
            state.watchlist.items = MovieSet::from_ids(watchlist);
            state.watchlist.saved = state.watchlist.items.clone();
        }
        CatalogEvent::CollectionsCleared => {
            for kind in [CollectionKind::Favorites, CollectionKind::Watchlist] {
                let collection = state.collection_mut(kind);
                collection.items = MovieSet::default();
                collection.saved = MovieSet::default();
                collection.is_saving = false;
                collection.error = None;
                collection.revision += 1;
            }
        }
        CatalogEvent::FiltersSet(filters) => {
            state.filters = filters;
        }
        CatalogEvent::ErrorCleared(Some(slot)) => state.clear_error(slot),
        CatalogEvent::ErrorCleared(None) => {
            for kind in ListKind::ALL {
                state.clear_error(Slot::List(kind));
            }
            state.clear_error(Slot::Genres);
            state.clear_error(Slot::Details);
            state.clear_error(Slot::Collection(CollectionKind::Favorites));
            state.clear_error(Slot::Collection(CollectionKind::Watchlist));
        }
    }
    state
}
