//! Catalog operations.

use moviebox_catalog::{GenreId, MovieId};
use tracing::debug;

use super::{Outcome, Store};
use crate::catalog::{
    CatalogEvent, EMPTY_QUERY_MESSAGE, FiltersPatch, ListKind, ListRequest, QUERY_MISMATCH_MESSAGE,
    Slot,
};

impl Store {
    /// Fetches a page of popular movies. Page 1 replaces the list, later
    /// pages append to it.
    pub async fn fetch_popular(&self, page: u32) -> Outcome {
        self.fetch_list(ListRequest::Popular, page).await
    }

    /// Fetches a page of movies now in theatres.
    pub async fn fetch_now_playing(&self, page: u32) -> Outcome {
        self.fetch_list(ListRequest::NowPlaying, page).await
    }

    /// Fetches a page of upcoming releases.
    pub async fn fetch_upcoming(&self, page: u32) -> Outcome {
        self.fetch_list(ListRequest::Upcoming, page).await
    }

    /// Fetches a page of movies in `genre_id`, using the current filters.
    pub async fn fetch_by_genre(&self, genre_id: GenreId, page: u32) -> Outcome {
        self.fetch_list(ListRequest::Genre(genre_id), page).await
    }

    /// Searches by title.
    ///
    /// A blank query is rejected without a call. Pages after the first must
    /// use the query already held in state.
    pub async fn search(&self, query: &str, page: u32) -> Outcome {
        let query = query.trim();
        if query.is_empty() {
            self.apply_catalog(CatalogEvent::SearchRejected(EMPTY_QUERY_MESSAGE.into()));
            return Outcome::Failed(EMPTY_QUERY_MESSAGE.into());
        }
        let current = self.inner.state.borrow().movies.search_query.clone();
        if page > 1 && current != query {
            self.apply_catalog(CatalogEvent::SearchRejected(QUERY_MISMATCH_MESSAGE.into()));
            return Outcome::Failed(QUERY_MISMATCH_MESSAGE.into());
        }
        self.fetch_list(ListRequest::Search(query.to_string()), page)
            .await
    }

    /// Fetches the page after the last one loaded for `kind`.
    ///
    /// Skipped while a request is outstanding, before the first page, or once
    /// the last page has been loaded.
    pub async fn load_next_page(&self, kind: ListKind) -> Outcome {
        let (list, query, genre) = {
            let state = self.inner.state.borrow();
            (
                state.movies.list(kind).clone(),
                state.movies.search_query.clone(),
                state.movies.selected_genre,
            )
        };
        if !list.can_load_more() {
            return Outcome::Skipped;
        }

        let next = list.current_page + 1;
        match kind {
            ListKind::Popular => self.fetch_popular(next).await,
            ListKind::NowPlaying => self.fetch_now_playing(next).await,
            ListKind::Upcoming => self.fetch_upcoming(next).await,
            ListKind::Search => self.search(&query, next).await,
            ListKind::ByGenre => match genre {
                Some(genre) => self.fetch_by_genre(genre, next).await,
                None => Outcome::Skipped,
            },
        }
    }

    /// Resets search results and query.
    pub fn clear_search(&self) -> Outcome {
        self.apply_catalog(CatalogEvent::SearchCleared);
        Outcome::Applied
    }

    /// Fetches the genre list, replacing any previous one.
    pub async fn fetch_genres(&self) -> Outcome {
        let ticket = self.request(CatalogEvent::GenresRequested, |s| {
            s.movies.genres.latest_request
        });
        let event = match self.catalog_call(self.inner.catalog.genres()).await {
            Ok(genres) => CatalogEvent::GenresLoaded { ticket, genres },
            Err(e) => CatalogEvent::GenresFailed {
                ticket,
                message: e.to_string(),
            },
        };
        self.settle(event)
    }

    /// Fetches full detail for a movie into the detail view.
    pub async fn fetch_movie_details(&self, id: MovieId) -> Outcome {
        let ticket = self.request(CatalogEvent::DetailsRequested(id), |s| {
            s.movies.details.latest_request
        });
        match self.catalog_call(self.inner.catalog.movie_details(id)).await {
            Ok(movie) => self.settle(CatalogEvent::DetailsLoaded {
                ticket,
                movie: Box::new(movie),
            }),
            Err(e) => {
                let not_found = e.is_not_found();
                let message = e.to_string();
                let applied = self.apply_catalog(CatalogEvent::DetailsFailed {
                    ticket,
                    message: message.clone(),
                    not_found,
                });
                match (applied, not_found) {
                    (false, _) => Outcome::Discarded,
                    (true, true) => Outcome::NotFound(message),
                    (true, false) => Outcome::Failed(message),
                }
            }
        }
    }

    /// Clears the detail view; an in-flight detail result is dropped.
    pub fn clear_current_movie(&self) -> Outcome {
        self.apply_catalog(CatalogEvent::DetailsCleared);
        Outcome::Applied
    }

    /// Merges `patch` into the discover filters.
    pub fn set_filters(&self, patch: &FiltersPatch) -> Outcome {
        let filters = patch.apply(&self.inner.state.borrow().movies.filters);
        self.apply_catalog(CatalogEvent::FiltersSet(filters));
        Outcome::Applied
    }

    /// Clears one error, or every catalog error when `slot` is `None`.
    pub fn clear_error(&self, slot: Option<Slot>) -> Outcome {
        self.apply_catalog(CatalogEvent::ErrorCleared(slot));
        Outcome::Applied
    }

    async fn fetch_list(&self, request: ListRequest, page: u32) -> Outcome {
        let page = page.max(1);
        let kind = request.kind();
        let (ticket, filters) = self.request(CatalogEvent::ListRequested(request.clone()), |s| {
            (s.movies.list(kind).latest_request, s.movies.filters.clone())
        });
        debug!("Fetching {kind:?} page {page} (ticket {ticket})");

        let catalog = &self.inner.catalog;
        let result = match &request {
            ListRequest::Popular => self.catalog_call(catalog.popular(page)).await,
            ListRequest::NowPlaying => self.catalog_call(catalog.now_playing(page)).await,
            ListRequest::Upcoming => self.catalog_call(catalog.upcoming(page)).await,
            ListRequest::Search(query) => self.catalog_call(catalog.search(query, page)).await,
            ListRequest::Genre(genre) => {
                self.catalog_call(catalog.discover_by_genre(*genre, page, &filters))
                    .await
            }
        };

        let event = match result {
            Ok(page) => CatalogEvent::ListLoaded {
                request,
                ticket,
                page,
            },
            Err(e) => CatalogEvent::ListFailed {
                request,
                ticket,
                message: e.to_string(),
            },
        };
        self.settle(event)
    }

    /// Applies a `*Requested` event and reads the issued ticket.
    fn request<R: Default>(
        &self,
        event: CatalogEvent,
        read: impl FnOnce(&crate::store::AppState) -> R,
    ) -> R {
        self.update(|state| {
            state.movies = crate::catalog::reduce(std::mem::take(&mut state.movies), event);
            (true, read(state))
        })
    }

    /// Applies a settle event and reports the outcome.
    fn settle(&self, event: CatalogEvent) -> Outcome {
        let failure = match &event {
            CatalogEvent::ListFailed { message, .. }
            | CatalogEvent::GenresFailed { message, .. }
            | CatalogEvent::DetailsFailed { message, .. } => Some(message.clone()),
            _ => None,
        };
        if !self.apply_catalog(event) {
            debug!("Dropped superseded catalog result");
            return Outcome::Discarded;
        }
        failure.map_or(Outcome::Applied, Outcome::Failed)
    }
}
