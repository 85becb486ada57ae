//! Plain-text rendering of outcomes and state snapshots.

use std::fmt::Write;

use moviebox_catalog::{MovieDetail, MovieSummary};
use moviebox_core::catalog::QueryState;
use moviebox_core::{AppState, CatalogState, ListKind, Outcome};

/// How many movies of a list are shown.
const LIST_PREVIEW: usize = 10;

/// One line describing an outcome, or `None` when there is nothing to say.
pub fn outcome(outcome: &Outcome) -> Option<String> {
    match outcome {
        Outcome::Applied | Outcome::Skipped => None,
        Outcome::Failed(message) => Some(format!("error: {message}")),
        Outcome::NotFound(message) => Some(format!("not found: {message}")),
        Outcome::Discarded => Some("superseded by a newer request".into()),
        Outcome::Membership(true) => Some("added".into()),
        Outcome::Membership(false) => Some("removed".into()),
        Outcome::SignInRequired => Some("sign in first".into()),
    }
}

const fn list_name(kind: ListKind) -> &'static str {
    match kind {
        ListKind::Popular => "popular",
        ListKind::NowPlaying => "now playing",
        ListKind::Upcoming => "upcoming",
        ListKind::Search => "search",
        ListKind::ByGenre => "by genre",
    }
}

fn movie_line(out: &mut String, movie: &MovieSummary) {
    let _ = write!(out, "  {:>8}  {}", movie.id, movie.title);
    if let Some(year) = movie.release_year {
        let _ = write!(out, " ({year})");
    }
    if let Some(rating) = movie.rating_average {
        let _ = write!(out, "  {rating:.1}");
    }
    out.push('\n');
}

fn list(out: &mut String, title: &str, list: &QueryState) {
    let _ = write!(out, "{title}: ");
    if list.is_loading {
        out.push_str("loading... ");
    }
    let _ = writeln!(
        out,
        "{} movies, page {}/{}",
        list.movies.len(),
        list.current_page,
        list.total_pages
    );
    if let Some(error) = &list.error {
        let _ = writeln!(out, "  error: {error}");
    }
    for movie in list.movies.iter().take(LIST_PREVIEW) {
        movie_line(out, movie);
    }
    if list.movies.len() > LIST_PREVIEW {
        let _ = writeln!(out, "  ... {} more", list.movies.len() - LIST_PREVIEW);
    }
}

fn detail(out: &mut String, movie: &MovieDetail, catalog: &CatalogState) {
    let summary = &movie.summary;
    let _ = writeln!(out, "{} [{}]", summary.title, summary.id);
    if let Some(tagline) = &movie.tagline {
        let _ = writeln!(out, "  {tagline}");
    }
    if let Some(minutes) = movie.runtime_minutes {
        let _ = writeln!(out, "  runtime: {minutes} min");
    }
    if !movie.genres.is_empty() {
        let names: Vec<&str> = movie.genres.iter().map(|g| g.name.as_str()).collect();
        let _ = writeln!(out, "  genres: {}", names.join(", "));
    }
    if let Some(director) = &movie.director {
        let _ = writeln!(out, "  director: {}", director.name);
    }
    if !movie.cast.is_empty() {
        let names: Vec<&str> = movie.cast.iter().map(|c| c.name.as_str()).collect();
        let _ = writeln!(out, "  cast: {}", names.join(", "));
    }
    if let Some(trailer) = &movie.trailer {
        let _ = writeln!(out, "  trailer: https://www.youtube.com/watch?v={}", trailer.key);
    }
    let _ = writeln!(
        out,
        "  favorite: {}  watchlist: {}",
        catalog.is_favorite(summary.id),
        catalog.is_in_watchlist(summary.id)
    );
    if !summary.overview.is_empty() {
        let _ = writeln!(out, "  {}", summary.overview);
    }
}

/// Multi-line summary of a snapshot.
pub fn state(state: &AppState) -> String {
    let mut out = String::new();
    let auth = &state.auth;
    match &auth.user {
        Some(user) => {
            let _ = writeln!(out, "signed in as {} <{}>", user.name, user.email);
        }
        None if !auth.is_initialized => out.push_str("session: starting\n"),
        None => out.push_str("signed out\n"),
    }
    if let Some(activity) = auth.activity {
        let _ = writeln!(out, "  busy: {activity:?}");
    }
    if let Some(error) = &auth.error {
        let _ = writeln!(out, "  auth error: {error}");
    }

    let movies = &state.movies;
    for kind in ListKind::ALL {
        let query = movies.list(kind);
        if query.current_page == 0 && !query.is_loading && query.error.is_none() {
            continue;
        }
        let title = match kind {
            ListKind::Search => format!("search \"{}\"", movies.search_query),
            ListKind::ByGenre => match movies.selected_genre {
                Some(id) => format!(
                    "genre {}",
                    movies.genres.name(id).map_or_else(|| id.to_string(), str::to_string)
                ),
                None => list_name(kind).to_string(),
            },
            _ => list_name(kind).to_string(),
        };
        list(&mut out, &title, query);
    }

    if !movies.genres.genres.is_empty() {
        let names: Vec<String> = movies
            .genres
            .genres
            .iter()
            .map(|g| format!("{}={}", g.id, g.name))
            .collect();
        let _ = writeln!(out, "genres: {}", names.join(" "));
    }

    let details = &movies.details;
    if details.is_loading {
        out.push_str("movie: loading...\n");
    } else if let Some(error) = &details.error {
        let _ = writeln!(out, "movie: {error}");
    } else if let Some(movie) = &details.current_movie {
        detail(&mut out, movie, movies);
    }

    if auth.is_authenticated() {
        let _ = writeln!(out, "favorites: {:?}", movies.favorites.items.ids());
        let _ = writeln!(out, "watchlist: {:?}", movies.watchlist.items.ids());
    }
    out
}
