//! Favorites and watchlist toggling.
//!
//! A toggle flips membership in memory first, then writes the whole set to
//! the blob store under the user's key. Writes are serialized; if the latest
//! write fails the members fall back to the last set written.

use moviebox_auth::UserId;
use moviebox_catalog::MovieId;
use tracing::{debug, warn};

use super::{Outcome, Store};
use crate::catalog::{CatalogEvent, CollectionKind};
use crate::storage::{favorites_key, watchlist_key};

fn storage_key(kind: CollectionKind, user_id: UserId) -> String {
    match kind {
        CollectionKind::Favorites => favorites_key(user_id),
        CollectionKind::Watchlist => watchlist_key(user_id),
    }
}

/// Captured when the optimistic flip is applied.
#[derive(Debug, Clone, Copy)]
struct Pending {
    user_id: UserId,
    epoch: u64,
    revision: u64,
}

impl Store {
    /// Flips `id` in the favorites.
    ///
    /// Returns [`Outcome::Membership`] with the membership that was written,
    /// or [`Outcome::SignInRequired`] without touching state when signed out.
    /// A toggle whose user signs out before the write lands is discarded.
    pub async fn toggle_favorite(&self, id: MovieId) -> Outcome {
        self.toggle(CollectionKind::Favorites, id).await
    }

    /// Flips `id` in the watchlist.
    pub async fn toggle_watchlist(&self, id: MovieId) -> Outcome {
        self.toggle(CollectionKind::Watchlist, id).await
    }

    async fn toggle(&self, kind: CollectionKind, id: MovieId) -> Outcome {
        let pending = self.update(|state| {
            let Some(user_id) = state.auth.user_id() else {
                return (false, None);
            };
            state.movies = crate::catalog::reduce(
                std::mem::take(&mut state.movies),
                CatalogEvent::Toggled { kind, id },
            );
            (
                true,
                Some(Pending {
                    user_id,
                    epoch: state.auth.epoch,
                    revision: state.movies.collection(kind).revision,
                }),
            )
        });
        let Some(pending) = pending else {
            debug!("Toggle of {id} needs a signed-in user");
            return Outcome::SignInRequired;
        };

        self.save_collection(kind, id, pending).await
    }

    /// Writes the current set and settles the toggle, holding the persist
    /// lock throughout.
    async fn save_collection(
        &self,
        kind: CollectionKind,
        id: MovieId,
        pending: Pending,
    ) -> Outcome {
        let _guard = self.inner.persist.lock().await;

        let items = {
            let state = self.inner.state.borrow();
            if state.auth.epoch != pending.epoch {
                debug!("Skipped {kind:?} write for an ended session");
                return Outcome::Discarded;
            }
            state.movies.collection(kind).items.clone()
        };
        let key = storage_key(kind, pending.user_id);
        let result = match serde_json::to_string(&items) {
            Ok(value) => self.storage_call(self.inner.blobs.set(&key, &value)).await,
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(()) => {
                let member = items.contains(id);
                let settled = self.apply_catalog_in_epoch(
                    pending.epoch,
                    CatalogEvent::ToggleSettled {
                        kind,
                        revision: pending.revision,
                        saved: items,
                    },
                );
                if settled {
                    Outcome::Membership(member)
                } else {
                    Outcome::Discarded
                }
            }
            Err(e) => {
                let message = e.to_string();
                warn!("Failed to save {kind:?}: {message}");
                let applied = self.apply_catalog_in_epoch(
                    pending.epoch,
                    CatalogEvent::ToggleFailed {
                        kind,
                        revision: pending.revision,
                        message: message.clone(),
                    },
                );
                if applied {
                    Outcome::Failed(message)
                } else {
                    Outcome::Discarded
                }
            }
        }
    }
}
