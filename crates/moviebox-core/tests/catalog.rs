//! Catalog operations against a scripted catalog service.

#![allow(clippy::unwrap_used)]

mod common;

use std::time::Duration;

use common::{harness, harness_with_timeout, ids, movie, page};
use moviebox_catalog::{Genre, MovieDetail, SortBy};
use moviebox_core::catalog::{EMPTY_QUERY_MESSAGE, QUERY_MISMATCH_MESSAGE};
use moviebox_core::{FiltersPatch, Intent, ListKind, Outcome, Slot};
use tokio_test::task;
use tokio_test::{assert_pending, assert_ready_eq};

#[tokio::test]
async fn test_pages_accumulate_without_duplicates() {
    let h = harness();
    h.catalog.respond("popular:1", page(1, 3, &[1, 2, 3]));
    h.catalog.respond("popular:2", page(2, 3, &[3, 4, 5]));

    assert_eq!(h.store.fetch_popular(1).await, Outcome::Applied);
    assert_eq!(h.store.fetch_popular(2).await, Outcome::Applied);

    let popular = h.store.snapshot().movies.popular;
    assert_eq!(ids(&popular.movies), vec![1, 2, 3, 4, 5]);
    assert_eq!(popular.current_page, 2);
    assert_eq!(popular.total_pages, 3);
    assert!(!popular.is_loading);
    assert!(popular.error.is_none());
}

#[tokio::test]
async fn test_first_page_replaces_results() {
    let h = harness();
    h.catalog.respond("popular:1", page(1, 2, &[1, 2]));
    h.catalog.respond("popular:2", page(2, 2, &[3]));

    h.store.fetch_popular(1).await;
    h.store.fetch_popular(2).await;
    h.store.fetch_popular(1).await;

    let popular = h.store.snapshot().movies.popular;
    assert_eq!(ids(&popular.movies), vec![1, 2]);
    assert_eq!(popular.current_page, 1);
}

#[tokio::test]
async fn test_load_next_page_until_exhausted() {
    let h = harness();
    h.catalog.respond("upcoming:1", page(1, 2, &[10]));
    h.catalog.respond("upcoming:2", page(2, 2, &[11]));

    assert_eq!(h.store.load_next_page(ListKind::Upcoming).await, Outcome::Skipped);
    h.store.fetch_upcoming(1).await;
    assert_eq!(
        h.store.dispatch(Intent::LoadNextPage(ListKind::Upcoming)).await,
        Outcome::Applied
    );
    assert_eq!(h.store.load_next_page(ListKind::Upcoming).await, Outcome::Skipped);

    assert_eq!(ids(&h.store.snapshot().movies.upcoming.movies), vec![10, 11]);
    assert_eq!(h.catalog.calls(), vec!["upcoming:1", "upcoming:2"]);
}

#[tokio::test]
async fn test_lists_keep_independent_errors() {
    let h = harness();
    h.catalog.respond("popular:1", page(1, 1, &[1]));

    assert!(h.store.fetch_now_playing(1).await.is_failure());
    assert_eq!(h.store.fetch_popular(1).await, Outcome::Applied);

    let movies = h.store.snapshot().movies;
    assert!(movies.error(Slot::List(ListKind::NowPlaying)).is_some());
    assert!(movies.error(Slot::List(ListKind::Popular)).is_none());
    assert_eq!(ids(&movies.popular.movies), vec![1]);

    h.store.clear_error(None);
    assert!(h.store.snapshot().movies.now_playing.error.is_none());
}

#[tokio::test]
async fn test_empty_query_makes_no_call() {
    let h = harness();

    let outcome = h.store.search("   ", 1).await;

    assert_eq!(outcome, Outcome::Failed(EMPTY_QUERY_MESSAGE.into()));
    assert!(h.catalog.calls().is_empty());
    let search = h.store.snapshot().movies.search;
    assert_eq!(search.error.as_deref(), Some(EMPTY_QUERY_MESSAGE));
    assert!(!search.is_loading);
}

#[tokio::test]
async fn test_search_trims_query_and_pages() {
    let h = harness();
    h.catalog.respond("search:batman:1", page(1, 2, &[1, 2]));
    h.catalog.respond("search:batman:2", page(2, 2, &[3]));

    h.store.search("  batman ", 1).await;
    assert_eq!(h.store.load_next_page(ListKind::Search).await, Outcome::Applied);

    let movies = h.store.snapshot().movies;
    assert_eq!(movies.search_query, "batman");
    assert_eq!(ids(&movies.search.movies), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_later_page_for_other_query_is_rejected() {
    let h = harness();
    h.catalog.respond("search:batman:1", page(1, 3, &[1]));
    h.store.search("batman", 1).await;

    let outcome = h.store.search("superman", 2).await;

    assert_eq!(outcome, Outcome::Failed(QUERY_MISMATCH_MESSAGE.into()));
    assert_eq!(h.catalog.calls(), vec!["search:batman:1"]);
    let movies = h.store.snapshot().movies;
    assert_eq!(movies.search_query, "batman");
    assert_eq!(ids(&movies.search.movies), vec![1]);
}

#[tokio::test]
async fn test_stale_search_dropped_when_it_settles_last() {
    let h = harness();
    let bat = h.catalog.gate("search:bat:1");
    let batman = h.catalog.gate("search:batman:1");
    h.catalog.respond("search:bat:1", page(1, 1, &[1]));
    h.catalog.respond("search:batman:1", page(1, 1, &[2]));

    let mut first = task::spawn(h.store.search("bat", 1));
    assert_pending!(first.poll());
    let mut second = task::spawn(h.store.search("batman", 1));
    assert_pending!(second.poll());

    batman.add_permits(1);
    assert_ready_eq!(second.poll(), Outcome::Applied);
    bat.add_permits(1);
    assert_ready_eq!(first.poll(), Outcome::Discarded);

    let movies = h.store.snapshot().movies;
    assert_eq!(movies.search_query, "batman");
    assert_eq!(ids(&movies.search.movies), vec![2]);
    assert!(!movies.search.is_loading);
}

#[tokio::test]
async fn test_stale_search_dropped_when_it_settles_first() {
    let h = harness();
    let bat = h.catalog.gate("search:bat:1");
    let batman = h.catalog.gate("search:batman:1");
    h.catalog.respond("search:bat:1", page(1, 1, &[1]));
    h.catalog.respond("search:batman:1", page(1, 1, &[2]));

    let mut first = task::spawn(h.store.search("bat", 1));
    assert_pending!(first.poll());
    let mut second = task::spawn(h.store.search("batman", 1));
    assert_pending!(second.poll());

    bat.add_permits(1);
    assert_ready_eq!(first.poll(), Outcome::Discarded);
    assert!(h.store.snapshot().movies.search.movies.is_empty());
    assert!(h.store.snapshot().movies.search.is_loading);

    batman.add_permits(1);
    assert_ready_eq!(second.poll(), Outcome::Applied);
    assert_eq!(ids(&h.store.snapshot().movies.search.movies), vec![2]);
}

#[tokio::test]
async fn test_clear_search_drops_in_flight_result() {
    let h = harness();
    let gate = h.catalog.gate("search:bat:1");
    h.catalog.respond("search:bat:1", page(1, 1, &[1]));

    let mut search = task::spawn(h.store.search("bat", 1));
    assert_pending!(search.poll());
    h.store.clear_search();
    gate.add_permits(1);
    assert_ready_eq!(search.poll(), Outcome::Discarded);

    let movies = h.store.snapshot().movies;
    assert!(movies.search.movies.is_empty());
    assert!(movies.search_query.is_empty());
}

#[tokio::test]
async fn test_by_genre_sends_current_filters() {
    let h = harness();
    h.catalog.respond("genre:28:1", page(1, 1, &[7]));
    h.store.set_filters(&FiltersPatch {
        year: Some(Some(1999)),
        sort_by: Some(SortBy::Rating),
        ..FiltersPatch::default()
    });

    assert_eq!(h.store.fetch_by_genre(28, 1).await, Outcome::Applied);

    let filters = h.catalog.last_filters().unwrap();
    assert_eq!(filters.year, Some(1999));
    assert_eq!(filters.sort_by, SortBy::Rating);
    assert_eq!(filters.min_rating, None);
    let movies = h.store.snapshot().movies;
    assert_eq!(movies.selected_genre, Some(28));
    assert_eq!(ids(&movies.by_genre.movies), vec![7]);
}

#[tokio::test]
async fn test_genres_replace_previous_list() {
    let h = harness();
    h.catalog.respond_genres(vec![Genre {
        id: 28,
        name: "Action".into(),
    }]);

    assert_eq!(h.store.dispatch(Intent::FetchGenres).await, Outcome::Applied);

    let genres = h.store.snapshot().movies.genres;
    assert_eq!(genres.name(28), Some("Action"));
    assert!(!genres.is_loading);
}

#[tokio::test]
async fn test_movie_details_loaded_and_cleared() {
    let h = harness();
    h.catalog.respond_detail(MovieDetail {
        summary: movie(550),
        tagline: Some("Mischief. Mayhem. Soap.".into()),
        ..MovieDetail::default()
    });

    assert_eq!(h.store.fetch_movie_details(550).await, Outcome::Applied);
    let details = h.store.snapshot().movies.details;
    assert_eq!(details.current_movie.as_ref().map(MovieDetail::id), Some(550));

    h.store.clear_current_movie();
    assert!(h.store.snapshot().movies.details.current_movie.is_none());
}

#[tokio::test]
async fn test_missing_movie_is_not_found() {
    let h = harness();

    let outcome = h.store.fetch_movie_details(404).await;

    assert!(matches!(outcome, Outcome::NotFound(_)));
    let details = h.store.snapshot().movies.details;
    assert!(details.not_found);
    assert!(details.error.is_some());
    assert!(details.current_movie.is_none());
}

#[tokio::test]
async fn test_cleared_detail_drops_in_flight_result() {
    let h = harness();
    let gate = h.catalog.gate("movie:550");
    h.catalog.respond_detail(MovieDetail {
        summary: movie(550),
        ..MovieDetail::default()
    });

    let mut fetch = task::spawn(h.store.fetch_movie_details(550));
    assert_pending!(fetch.poll());
    h.store.clear_current_movie();
    gate.add_permits(1);
    assert_ready_eq!(fetch.poll(), Outcome::Discarded);

    assert!(h.store.snapshot().movies.details.current_movie.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_unresponsive_catalog_times_out() {
    let h = harness_with_timeout(Duration::from_secs(2));
    h.catalog.hang();

    let outcome = h.store.fetch_popular(1).await;

    assert_eq!(
        outcome,
        Outcome::Failed("Request timed out after 2 seconds".into())
    );
    let popular = h.store.snapshot().movies.popular;
    assert!(!popular.is_loading);
    assert!(popular.error.is_some());
}

#[tokio::test]
async fn test_subscribers_see_loading_then_result() {
    let h = harness();
    let gate = h.catalog.gate("popular:1");
    h.catalog.respond("popular:1", page(1, 1, &[1]));
    let mut rx = h.store.subscribe();

    let mut fetch = task::spawn(h.store.fetch_popular(1));
    assert_pending!(fetch.poll());
    assert!(rx.has_changed().unwrap());
    assert!(rx.borrow_and_update().movies.popular.is_loading);

    gate.add_permits(1);
    assert_ready_eq!(fetch.poll(), Outcome::Applied);
    assert!(rx.has_changed().unwrap());
    assert_eq!(ids(&rx.borrow_and_update().movies.popular.movies), vec![1]);
}
