//! Session operations.

use moviebox_auth::validation::{
    ValidationError, validate_credentials, validate_password_change, validate_registration,
};
use moviebox_auth::{AuthError, AuthSession, PasswordChange, ProfileUpdate, Registration, User};
use tracing::{debug, info, warn};

use super::{Outcome, Store};
use crate::catalog::CatalogEvent;
use crate::session::{AuthActivity, SessionEvent};
use crate::storage::{TOKEN_KEY, USER_KEY, favorites_key, watchlist_key};

fn first_message(errors: &[ValidationError]) -> String {
    errors
        .first()
        .map_or("Invalid input", ValidationError::message)
        .to_string()
}

impl Store {
    /// Rehydrates the persisted session and verifies it.
    ///
    /// Without a stored token this only marks the session initialized.
    pub async fn initialize(&self) -> Outcome {
        let token = match self.storage_call(self.inner.blobs.get(TOKEN_KEY)).await {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!("Failed to read stored token: {e}");
                None
            }
        };

        let Some(token) = token else {
            debug!("No stored session");
            self.apply_session(SessionEvent::Initialized);
            return Outcome::Skipped;
        };

        if let Some(user) = self.stored_user().await {
            self.apply_session(SessionEvent::Restored(AuthSession {
                user,
                token: token.clone(),
            }));
        }
        self.verify_session(&token).await
    }

    /// Confirms `token` with the auth service.
    ///
    /// An expired token is rejected locally. On any failure the persisted
    /// session is removed. The session is marked initialized either way.
    pub async fn verify_session(&self, token: &str) -> Outcome {
        let ticket = self.start(AuthActivity::Verifying);

        let expired = self
            .inner
            .auth
            .token_expiry(token)
            .is_some_and(moviebox_auth::token::is_past);
        let result = if expired {
            Err(AuthError::InvalidToken("Token expired".into()))
        } else {
            self.auth_call(self.inner.auth.verify_token(token)).await
        };

        let outcome = match result {
            Ok(session) => self.establish(ticket, session).await,
            Err(e) => {
                info!("Stored session rejected: {e}");
                let outcome = self.fail(ticket, &e).await;
                if outcome != Outcome::Discarded {
                    self.clear_persisted_session().await;
                }
                outcome
            }
        };
        self.apply_session(SessionEvent::Initialized);
        outcome
    }

    /// Signs in with email and password.
    pub async fn sign_in(&self, email: &str, password: &str) -> Outcome {
        if let Err(errors) = validate_credentials(email, password) {
            return self.reject(first_message(&errors));
        }

        let ticket = self.start(AuthActivity::SigningIn);
        match self.auth_call(self.inner.auth.login(email.trim(), password)).await {
            Ok(session) => self.establish(ticket, session).await,
            Err(e) => self.fail(ticket, &e).await,
        }
    }

    /// Creates an account and signs it in.
    pub async fn sign_up(&self, name: &str, email: &str, password: &str) -> Outcome {
        let registration = Registration::new(name.trim(), email.trim(), password);
        if let Err(errors) = validate_registration(&registration) {
            return self.reject(first_message(&errors));
        }

        let ticket = self.start(AuthActivity::SigningUp);
        match self.auth_call(self.inner.auth.register(&registration)).await {
            Ok(session) => self.establish(ticket, session).await,
            Err(e) => self.fail(ticket, &e).await,
        }
    }

    /// Ends the session. Never fails.
    ///
    /// The revoke call is best-effort; local and persisted state are cleared
    /// regardless of its result. The identity ends before the stored keys are
    /// removed, so writes still pending for it are skipped.
    pub async fn sign_out(&self) -> Outcome {
        let token = self.snapshot().auth.token;
        self.start(AuthActivity::SigningOut);

        if let Some(token) = token.filter(|t| !t.is_empty()) {
            if let Err(e) = self.auth_call(self.inner.auth.logout(&token)).await {
                warn!("Logout request failed: {e}");
            }
        }

        self.apply_session(SessionEvent::SignedOut);
        self.apply_catalog(CatalogEvent::CollectionsCleared);
        self.clear_persisted_session().await;
        info!("Signed out");
        Outcome::Applied
    }

    /// Updates profile fields of the signed-in user.
    pub async fn update_profile(&self, update: ProfileUpdate) -> Outcome {
        let Some(token) = self.authenticated_token() else {
            return Outcome::SignInRequired;
        };
        if update.is_empty() {
            return Outcome::Skipped;
        }

        let ticket = self.start(AuthActivity::UpdatingProfile);
        match self
            .auth_call(self.inner.auth.update_profile(&token, &update))
            .await
        {
            Ok(user) => {
                let Some(epoch) = self.apply_session_epoch(SessionEvent::ProfileUpdated {
                    ticket,
                    user: user.clone(),
                }) else {
                    return Outcome::Discarded;
                };
                match serde_json::to_string(&user) {
                    Ok(json) => {
                        if !self.persist_in_epoch(epoch, &[(USER_KEY, json)]).await {
                            return Outcome::Discarded;
                        }
                    }
                    Err(e) => warn!("Failed to persist user: {e}"),
                }
                Outcome::Applied
            }
            Err(e) => self.fail(ticket, &e).await,
        }
    }

    /// Changes the password after checking the confirmation locally.
    pub async fn change_password(&self, current: &str, new: &str, confirm: &str) -> Outcome {
        let Some(token) = self.authenticated_token() else {
            return Outcome::SignInRequired;
        };
        let change = PasswordChange {
            current_password: current.to_string(),
            new_password: new.to_string(),
        };
        if let Err(errors) = validate_password_change(&change, confirm) {
            return self.reject(first_message(&errors));
        }

        let ticket = self.start(AuthActivity::ChangingPassword);
        match self
            .auth_call(self.inner.auth.change_password(&token, &change))
            .await
        {
            Ok(()) => {
                if self.apply_session(SessionEvent::PasswordChanged { ticket }) {
                    info!("Password changed");
                    Outcome::Applied
                } else {
                    Outcome::Discarded
                }
            }
            Err(e) => self.fail(ticket, &e).await,
        }
    }

    /// Clears the session error.
    pub fn clear_auth_error(&self) -> Outcome {
        self.apply_session(SessionEvent::ErrorCleared);
        Outcome::Applied
    }

    fn start(&self, activity: AuthActivity) -> u64 {
        self.update(|state| {
            state.auth = crate::session::reduce(
                std::mem::take(&mut state.auth),
                SessionEvent::Started(activity),
            );
            (true, state.auth.latest_request)
        })
    }

    fn reject(&self, message: String) -> Outcome {
        self.apply_session(SessionEvent::Rejected(message.clone()));
        Outcome::Failed(message)
    }

    fn authenticated_token(&self) -> Option<String> {
        let state = self.inner.state.borrow();
        if state.auth.is_authenticated() {
            state.auth.token.clone()
        } else {
            None
        }
    }

    /// Applies a new identity, then persists it and restores its collections.
    async fn establish(&self, ticket: u64, session: AuthSession) -> Outcome {
        let user_id = session.user.id;
        let Some(epoch) = self.apply_session_epoch(SessionEvent::Authenticated {
            ticket,
            session: session.clone(),
        }) else {
            debug!("Dropped superseded authentication result");
            return Outcome::Discarded;
        };

        info!("Authenticated as user {user_id}");
        let mut entries = vec![(TOKEN_KEY, session.token)];
        match serde_json::to_string(&session.user) {
            Ok(json) => entries.push((USER_KEY, json)),
            Err(e) => warn!("Failed to persist user: {e}"),
        }
        if !self.persist_in_epoch(epoch, &entries).await {
            debug!("Identity ended while persisting session");
            return Outcome::Discarded;
        }
        self.restore_collections(user_id, epoch).await;
        if self.inner.state.borrow().auth.epoch != epoch {
            return Outcome::Discarded;
        }
        Outcome::Applied
    }

    /// Records a failed operation; clears persistence if the identity ended.
    async fn fail(&self, ticket: u64, error: &AuthError) -> Outcome {
        let message = error.to_string();
        let event = SessionEvent::Failed {
            ticket,
            message: message.clone(),
            token_rejected: error.is_token_rejection(),
        };
        let Some(ended) = self.update(|state| {
            if state.auth.is_stale(&event) {
                return (false, None);
            }
            let epoch = state.auth.epoch;
            state.auth = crate::session::reduce(std::mem::take(&mut state.auth), event);
            (true, Some(state.auth.epoch != epoch))
        }) else {
            return Outcome::Discarded;
        };

        if ended {
            self.clear_persisted_session().await;
            self.apply_catalog(CatalogEvent::CollectionsCleared);
        }
        debug!("Auth operation failed: {message}");
        Outcome::Failed(message)
    }

    async fn stored_user(&self) -> Option<User> {
        let raw = match self.storage_call(self.inner.blobs.get(USER_KEY)).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Failed to read stored user: {e}");
                return None;
            }
        };
        serde_json::from_str(&raw)
            .inspect_err(|e| warn!("Ignoring malformed stored user: {e}"))
            .ok()
    }

    /// Writes `entries` while `epoch` is current.
    ///
    /// Returns false as soon as the identity has ended; remaining entries are
    /// not written. Write errors are logged and do not stop later entries.
    async fn persist_in_epoch(&self, epoch: u64, entries: &[(&str, String)]) -> bool {
        let _guard = self.inner.persist.lock().await;
        for (key, value) in entries {
            if self.inner.state.borrow().auth.epoch != epoch {
                return false;
            }
            if let Err(e) = self.storage_call(self.inner.blobs.set(key, value)).await {
                warn!("Failed to persist {key}: {e}");
            }
        }
        self.inner.state.borrow().auth.epoch == epoch
    }

    async fn clear_persisted_session(&self) {
        let _guard = self.inner.persist.lock().await;
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage_call(self.inner.blobs.remove(key)).await {
                warn!("Failed to remove stored {key}: {e}");
            }
        }
    }

    async fn restore_collections(&self, user_id: moviebox_auth::UserId, epoch: u64) {
        let favorites = self.stored_ids(&favorites_key(user_id)).await;
        let watchlist = self.stored_ids(&watchlist_key(user_id)).await;
        debug!(
            "Restoring {} favorites and {} watchlist entries",
            favorites.len(),
            watchlist.len()
        );
        self.apply_catalog_in_epoch(
            epoch,
            CatalogEvent::CollectionsRestored {
                favorites,
                watchlist,
            },
        );
    }

    async fn stored_ids(&self, key: &str) -> Vec<moviebox_catalog::MovieId> {
        match self.storage_call(self.inner.blobs.get(key)).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Ignoring malformed {key}: {e}");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to read {key}: {e}");
                Vec::new()
            }
        }
    }
}
