//! Favorites and watchlist toggles.

#![allow(clippy::unwrap_used)]

mod common;

use common::harness;
use moviebox_auth::{DEMO_EMAIL, DEMO_PASSWORD};
use moviebox_core::storage::{favorites_key, watchlist_key};
use moviebox_core::{BlobStore, CollectionKind, Intent, Outcome, Slot};
use tokio_test::task;
use tokio_test::{assert_pending, assert_ready, assert_ready_eq};

#[tokio::test]
async fn test_toggle_requires_sign_in() {
    let h = harness();
    let before = h.store.snapshot();

    assert_eq!(h.store.toggle_favorite(550).await, Outcome::SignInRequired);
    assert_eq!(
        h.store.dispatch(Intent::ToggleWatchlist(550)).await,
        Outcome::SignInRequired
    );

    assert_eq!(h.store.snapshot(), before);
    assert_eq!(h.blobs.get(&favorites_key(1)).await.unwrap(), None);
}

#[tokio::test]
async fn test_toggle_twice_restores_membership() {
    let h = harness();
    h.store.sign_in(DEMO_EMAIL, DEMO_PASSWORD).await;

    assert_eq!(h.store.toggle_favorite(550).await, Outcome::Membership(true));
    assert!(h.store.snapshot().movies.is_favorite(550));
    assert_eq!(
        h.blobs.get(&favorites_key(1)).await.unwrap().as_deref(),
        Some("[550]")
    );

    assert_eq!(h.store.toggle_favorite(550).await, Outcome::Membership(false));
    let movies = h.store.snapshot().movies;
    assert!(!movies.is_favorite(550));
    assert!(!movies.favorites.is_saving);
    assert_eq!(
        h.blobs.get(&favorites_key(1)).await.unwrap().as_deref(),
        Some("[]")
    );
}

#[tokio::test]
async fn test_collections_are_independent() {
    let h = harness();
    h.store.sign_in(DEMO_EMAIL, DEMO_PASSWORD).await;

    h.store.toggle_watchlist(13).await;

    let movies = h.store.snapshot().movies;
    assert!(movies.is_in_watchlist(13));
    assert!(!movies.is_favorite(13));
    assert_eq!(
        h.blobs.get(&watchlist_key(1)).await.unwrap().as_deref(),
        Some("[13]")
    );
    assert_eq!(h.blobs.get(&favorites_key(1)).await.unwrap(), None);
}

#[tokio::test]
async fn test_flip_is_visible_before_write_completes() {
    let h = harness();
    h.store.sign_in(DEMO_EMAIL, DEMO_PASSWORD).await;
    let gate = h.blobs.gate_writes();

    let mut toggle = task::spawn(h.store.toggle_favorite(550));
    assert_pending!(toggle.poll());
    let movies = h.store.snapshot().movies;
    assert!(movies.is_favorite(550));
    assert!(movies.is_loading(Slot::Collection(CollectionKind::Favorites)));

    gate.add_permits(1);
    assert_ready_eq!(toggle.poll(), Outcome::Membership(true));
    assert!(!h.store.snapshot().movies.favorites.is_saving);
}

#[tokio::test]
async fn test_concurrent_double_toggle_persists_final_set() {
    let h = harness();
    h.store.sign_in(DEMO_EMAIL, DEMO_PASSWORD).await;
    let gate = h.blobs.gate_writes();

    let mut first = task::spawn(h.store.toggle_favorite(550));
    assert_pending!(first.poll());
    let mut second = task::spawn(h.store.toggle_favorite(550));
    assert_pending!(second.poll());
    assert!(!h.store.snapshot().movies.is_favorite(550));

    gate.add_permits(2);
    assert_ready_eq!(first.poll(), Outcome::Membership(true));
    assert_ready_eq!(second.poll(), Outcome::Membership(false));

    let movies = h.store.snapshot().movies;
    assert!(!movies.is_favorite(550));
    assert!(!movies.favorites.is_saving);
    assert_eq!(
        h.blobs.get(&favorites_key(1)).await.unwrap().as_deref(),
        Some("[]")
    );
}

#[tokio::test]
async fn test_failed_write_rolls_back() {
    let h = harness();
    h.store.sign_in(DEMO_EMAIL, DEMO_PASSWORD).await;
    h.store.toggle_favorite(7).await;
    h.blobs.fail_writes(true);

    let outcome = h.store.toggle_favorite(550).await;

    assert!(outcome.is_failure());
    let movies = h.store.snapshot().movies;
    assert!(!movies.is_favorite(550));
    assert!(movies.is_favorite(7));
    assert!(!movies.favorites.is_saving);
    assert!(movies.error(Slot::Collection(CollectionKind::Favorites)).is_some());
    assert_eq!(
        h.blobs.get(&favorites_key(1)).await.unwrap().as_deref(),
        Some("[7]")
    );
}

#[tokio::test]
async fn test_failed_first_write_does_not_undo_later_toggle() {
    let h = harness();
    h.store.sign_in(DEMO_EMAIL, DEMO_PASSWORD).await;
    let gate = h.blobs.gate_writes();

    let mut first = task::spawn(h.store.toggle_favorite(550));
    assert_pending!(first.poll());
    let mut second = task::spawn(h.store.toggle_favorite(550));
    assert_pending!(second.poll());

    h.blobs.fail_writes(true);
    gate.add_permits(1);
    assert!(assert_ready!(first.poll()).is_failure());
    assert!(!h.store.snapshot().movies.is_favorite(550));

    h.blobs.fail_writes(false);
    gate.add_permits(1);
    assert_ready_eq!(second.poll(), Outcome::Membership(false));

    let movies = h.store.snapshot().movies;
    assert!(!movies.is_favorite(550));
    assert!(!movies.favorites.is_saving);
    assert_eq!(
        h.blobs.get(&favorites_key(1)).await.unwrap().as_deref(),
        Some("[]")
    );
}

#[tokio::test]
async fn test_failed_latest_write_restores_stored_set() {
    let h = harness();
    h.store.sign_in(DEMO_EMAIL, DEMO_PASSWORD).await;
    h.store.toggle_watchlist(7).await;
    let gate = h.blobs.gate_writes();
    h.blobs.fail_writes(true);

    let mut first = task::spawn(h.store.toggle_watchlist(550));
    assert_pending!(first.poll());
    let mut second = task::spawn(h.store.toggle_watchlist(13));
    assert_pending!(second.poll());

    gate.add_permits(2);
    assert!(assert_ready!(first.poll()).is_failure());
    assert!(assert_ready!(second.poll()).is_failure());

    let movies = h.store.snapshot().movies;
    assert_eq!(movies.watchlist.items.ids(), &[7]);
    assert!(!movies.watchlist.is_saving);
    assert_eq!(
        h.blobs.get(&watchlist_key(1)).await.unwrap().as_deref(),
        Some("[7]")
    );
}

#[tokio::test]
async fn test_toggle_pending_across_sign_out_is_discarded() {
    let h = harness();
    h.store.sign_in(DEMO_EMAIL, DEMO_PASSWORD).await;
    let gate = h.blobs.gate_writes();

    let mut toggle = task::spawn(h.store.toggle_favorite(550));
    assert_pending!(toggle.poll());
    let mut sign_out = task::spawn(h.store.sign_out());
    assert_pending!(sign_out.poll());

    gate.add_permits(1);
    assert_ready_eq!(toggle.poll(), Outcome::Discarded);
    assert_ready_eq!(sign_out.poll(), Outcome::Applied);
    assert!(h.store.snapshot().movies.favorites.items.is_empty());
}

#[tokio::test]
async fn test_collections_follow_the_signed_in_user() {
    let h = harness();
    h.store.sign_in(DEMO_EMAIL, DEMO_PASSWORD).await;
    h.store.toggle_favorite(550).await;
    h.store.toggle_watchlist(13).await;

    h.store.sign_out().await;
    let movies = h.store.snapshot().movies;
    assert!(movies.favorites.items.is_empty());
    assert!(movies.watchlist.items.is_empty());

    h.store.sign_up("Ada", "ada@example.com", "secret1").await;
    assert!(h.store.snapshot().movies.favorites.items.is_empty());
    h.store.sign_out().await;

    h.store.sign_in(DEMO_EMAIL, DEMO_PASSWORD).await;
    let movies = h.store.snapshot().movies;
    assert_eq!(movies.favorites.items.ids(), &[550]);
    assert_eq!(movies.watchlist.items.ids(), &[13]);
}
