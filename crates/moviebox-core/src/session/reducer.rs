//! Session transitions.

use moviebox_auth::{AuthSession, User};

use super::state::{AuthActivity, SessionState};

/// A discrete session transition.
///
/// Settle events carry the ticket issued by [`SessionEvent::Started`]; they
/// are dropped unless that ticket is still the latest one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Persisted identity loaded at startup, pending verification.
    Restored(AuthSession),
    /// An operation was dispatched.
    Started(AuthActivity),
    /// Sign-in, sign-up or verification succeeded.
    Authenticated {
        /// Ticket of the operation.
        ticket: u64,
        /// Issued identity.
        session: AuthSession,
    },
    /// Profile update succeeded.
    ProfileUpdated {
        /// Ticket of the operation.
        ticket: u64,
        /// Updated user.
        user: User,
    },
    /// Password change succeeded.
    PasswordChanged {
        /// Ticket of the operation.
        ticket: u64,
    },
    /// The service rejected or failed an operation.
    Failed {
        /// Ticket of the operation.
        ticket: u64,
        /// Human-readable message.
        message: String,
        /// The token is no longer valid.
        token_rejected: bool,
    },
    /// Input was rejected before any call was made.
    Rejected(String),
    /// Local session cleared.
    SignedOut,
    /// Startup verification finished.
    Initialized,
    /// `error` cleared.
    ErrorCleared,
}

impl SessionEvent {
    const fn ticket(&self) -> Option<u64> {
        match self {
            Self::Authenticated { ticket, .. }
            | Self::ProfileUpdated { ticket, .. }
            | Self::PasswordChanged { ticket }
            | Self::Failed { ticket, .. } => Some(*ticket),
            _ => None,
        }
    }
}

impl SessionState {
    /// Returns true if `event` settles an operation that has been superseded.
    #[must_use]
    pub fn is_stale(&self, event: &SessionEvent) -> bool {
        event.ticket().is_some_and(|t| t != self.latest_request)
    }
}

fn end_identity(state: &mut SessionState) {
    if state.user.is_some() || state.token.is_some() {
        state.epoch += 1;
    }
    state.user = None;
    state.token = None;
}

/// Applies `event` to `state`.
#[must_use]
pub fn reduce(mut state: SessionState, event: SessionEvent) -> SessionState {
    if state.is_stale(&event) {
        return state;
    }

    match event {
        SessionEvent::Restored(session) => {
            state.epoch += 1;
            state.user = Some(session.user);
            state.token = Some(session.token);
        }
        SessionEvent::Started(activity) => {
            state.latest_request += 1;
            state.activity = Some(activity);
            state.error = None;
        }
        SessionEvent::Authenticated { session, .. } => {
            state.epoch += 1;
            state.user = Some(session.user);
            state.token = Some(session.token);
            state.activity = None;
            state.error = None;
        }
        SessionEvent::ProfileUpdated { user, .. } => {
            state.user = Some(user);
            state.activity = None;
        }
        SessionEvent::PasswordChanged { .. } => {
            state.activity = None;
        }
        SessionEvent::Failed {
            message,
            token_rejected,
            ..
        } => {
            let establishing = state
                .activity
                .is_some_and(AuthActivity::establishes_identity);
            if establishing || token_rejected {
                end_identity(&mut state);
            }
            state.activity = None;
            state.error = Some(message);
        }
        SessionEvent::Rejected(message) => {
            state.error = Some(message);
        }
        SessionEvent::SignedOut => {
            end_identity(&mut state);
            state.activity = None;
            state.error = None;
        }
        SessionEvent::Initialized => {
            state.is_initialized = true;
        }
        SessionEvent::ErrorCleared => {
            state.error = None;
        }
    }
    state
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;

    fn session(token: &str) -> AuthSession {
        AuthSession {
            user: User {
                id: 1,
                name: "Demo User".into(),
                email: "demo@moviebox.com".into(),
                created_at: Utc::now(),
                bio: None,
                avatar_url: None,
            },
            token: token.into(),
        }
    }

    fn signed_in() -> SessionState {
        let state = reduce(
            SessionState::default(),
            SessionEvent::Started(AuthActivity::SigningIn),
        );
        let ticket = state.latest_request;
        reduce(
            state,
            SessionEvent::Authenticated {
                ticket,
                session: session("tok"),
            },
        )
    }

    #[test]
    fn test_sign_in_success() {
        let state = signed_in();
        assert!(state.is_authenticated());
        assert!(!state.is_loading());
        assert_eq!(state.token.as_deref(), Some("tok"));
        assert_eq!(state.epoch, 1);
    }

    #[test]
    fn test_sign_in_failure_leaves_state_clean() {
        let state = reduce(
            SessionState::default(),
            SessionEvent::Started(AuthActivity::SigningIn),
        );
        let state = reduce(
            state,
            SessionEvent::Failed {
                ticket: 1,
                message: "Invalid email or password".into(),
                token_rejected: false,
            },
        );
        assert!(!state.is_authenticated());
        assert!(state.user.is_none());
        assert!(state.token.is_none());
        assert_eq!(state.error.as_deref(), Some("Invalid email or password"));
    }

    #[test]
    fn test_started_clears_previous_error() {
        let state = reduce(
            SessionState::default(),
            SessionEvent::Rejected("Email address is required".into()),
        );
        assert!(state.error.is_some());
        let state = reduce(state, SessionEvent::Started(AuthActivity::SigningUp));
        assert!(state.error.is_none());
        assert_eq!(state.activity, Some(AuthActivity::SigningUp));
    }

    #[test]
    fn test_profile_failure_keeps_session() {
        let state = reduce(signed_in(), SessionEvent::Started(AuthActivity::UpdatingProfile));
        let ticket = state.latest_request;
        let state = reduce(
            state,
            SessionEvent::Failed {
                ticket,
                message: "Profile update failed".into(),
                token_rejected: false,
            },
        );
        assert!(state.is_authenticated());
        assert_eq!(state.error.as_deref(), Some("Profile update failed"));
    }

    #[test]
    fn test_token_rejection_ends_session() {
        let before = signed_in();
        let epoch = before.epoch;
        let state = reduce(before, SessionEvent::Started(AuthActivity::ChangingPassword));
        let ticket = state.latest_request;
        let state = reduce(
            state,
            SessionEvent::Failed {
                ticket,
                message: "Invalid token".into(),
                token_rejected: true,
            },
        );
        assert!(!state.is_authenticated());
        assert_eq!(state.epoch, epoch + 1);
    }

    #[test]
    fn test_superseded_result_is_dropped() {
        let state = reduce(
            SessionState::default(),
            SessionEvent::Started(AuthActivity::SigningIn),
        );
        let first = state.latest_request;
        let state = reduce(state, SessionEvent::Started(AuthActivity::SigningUp));

        let event = SessionEvent::Authenticated {
            ticket: first,
            session: session("old"),
        };
        assert!(state.is_stale(&event));
        let state = reduce(state, event);
        assert!(!state.is_authenticated());
        assert_eq!(state.activity, Some(AuthActivity::SigningUp));
    }

    #[test]
    fn test_profile_update_after_sign_out_is_dropped() {
        let state = reduce(signed_in(), SessionEvent::Started(AuthActivity::UpdatingProfile));
        let ticket = state.latest_request;
        let state = reduce(state, SessionEvent::Started(AuthActivity::SigningOut));
        let state = reduce(state, SessionEvent::SignedOut);

        let mut user = session("x").user;
        user.name = "Renamed".into();
        let state = reduce(state, SessionEvent::ProfileUpdated { ticket, user });
        assert!(state.user.is_none());
        assert!(!state.is_authenticated());
    }

    #[test]
    fn test_verification_failure_clears_restored_identity() {
        let state = reduce(SessionState::default(), SessionEvent::Restored(session("stored")));
        assert!(state.is_authenticated());
        let state = reduce(state, SessionEvent::Started(AuthActivity::Verifying));
        let ticket = state.latest_request;
        let state = reduce(
            state,
            SessionEvent::Failed {
                ticket,
                message: "Token expired".into(),
                token_rejected: true,
            },
        );
        let state = reduce(state, SessionEvent::Initialized);
        assert!(!state.is_authenticated());
        assert!(state.is_initialized);
    }

    #[test]
    fn test_signed_out_clears_everything() {
        let state = reduce(signed_in(), SessionEvent::Rejected("oops".into()));
        let state = reduce(state, SessionEvent::SignedOut);
        assert!(state.user.is_none());
        assert!(state.token.is_none());
        assert!(state.error.is_none());
        assert!(!state.is_loading());
    }

    #[test]
    fn test_error_cleared() {
        let state = reduce(SessionState::default(), SessionEvent::Rejected("x".into()));
        assert!(reduce(state, SessionEvent::ErrorCleared).error.is_none());
    }

    proptest! {
        #[test]
        fn prop_epoch_and_tickets_never_decrease(ops in proptest::collection::vec(0u8..6, 0..40)) {
            let mut state = SessionState::default();
            for op in ops {
                let (epoch, latest) = (state.epoch, state.latest_request);
                let event = match op {
                    0 => SessionEvent::Started(AuthActivity::SigningIn),
                    1 => SessionEvent::Authenticated { ticket: latest, session: session("t") },
                    2 => SessionEvent::Failed { ticket: latest, message: "e".into(), token_rejected: true },
                    3 => SessionEvent::SignedOut,
                    4 => SessionEvent::Authenticated { ticket: latest.wrapping_sub(1), session: session("s") },
                    _ => SessionEvent::Rejected("r".into()),
                };
                state = reduce(state, event);
                prop_assert!(state.epoch >= epoch);
                prop_assert!(state.latest_request >= latest);
                prop_assert_eq!(state.is_authenticated(), state.user.is_some() && state.token.is_some());
            }
        }
    }
}
