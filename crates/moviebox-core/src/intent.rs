//! Intents views dispatch to the store.

use moviebox_auth::ProfileUpdate;
use moviebox_catalog::{GenreId, MovieId};

use crate::catalog::{FiltersPatch, ListKind, Slot};

/// One user-initiated operation; see [`crate::Store::dispatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Rehydrate and verify the persisted session.
    Initialize,
    /// Sign in.
    SignIn {
        /// Email address.
        email: String,
        /// Password.
        password: String,
    },
    /// Create an account.
    SignUp {
        /// Display name.
        name: String,
        /// Email address.
        email: String,
        /// Password.
        password: String,
    },
    /// Sign out.
    SignOut,
    /// Verify a token with the auth service.
    VerifySession {
        /// Bearer token.
        token: String,
    },
    /// Update profile fields.
    UpdateProfile(ProfileUpdate),
    /// Change the password.
    ChangePassword {
        /// Current password.
        current: String,
        /// New password.
        new: String,
        /// New password, repeated.
        confirm: String,
    },
    /// Clear the session error.
    ClearAuthError,
    /// Fetch popular movies.
    FetchPopular {
        /// 1-based page.
        page: u32,
    },
    /// Fetch movies now playing.
    FetchNowPlaying {
        /// 1-based page.
        page: u32,
    },
    /// Fetch upcoming movies.
    FetchUpcoming {
        /// 1-based page.
        page: u32,
    },
    /// Search by title.
    Search {
        /// Query text.
        query: String,
        /// 1-based page.
        page: u32,
    },
    /// Discover movies by genre.
    FetchByGenre {
        /// Genre.
        genre_id: GenreId,
        /// 1-based page.
        page: u32,
    },
    /// Fetch the genre list.
    FetchGenres,
    /// Fetch the next page of a list.
    LoadNextPage(ListKind),
    /// Reset search results.
    ClearSearch,
    /// Load the detail view.
    FetchMovieDetails(MovieId),
    /// Clear the detail view.
    ClearCurrentMovie,
    /// Merge discover filters.
    SetFilters(FiltersPatch),
    /// Clear one catalog error, or all of them.
    ClearError(Option<Slot>),
    /// Flip favorite membership.
    ToggleFavorite(MovieId),
    /// Flip watchlist membership.
    ToggleWatchlist(MovieId),
}
