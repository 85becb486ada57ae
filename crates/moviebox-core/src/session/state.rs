//! Session state.

use moviebox_auth::{User, UserId};
use serde::Serialize;

/// Auth operation currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthActivity {
    /// `sign_in` awaiting the service.
    SigningIn,
    /// `sign_up` awaiting the service.
    SigningUp,
    /// Stored token being verified.
    Verifying,
    /// Profile update awaiting the service.
    UpdatingProfile,
    /// Password change awaiting the service.
    ChangingPassword,
    /// Token being revoked.
    SigningOut,
}

impl AuthActivity {
    /// Returns true for activities whose failure leaves no identity behind.
    #[must_use]
    pub const fn establishes_identity(self) -> bool {
        matches!(self, Self::SigningIn | Self::SigningUp | Self::Verifying)
    }
}

/// Authentication lifecycle state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionState {
    /// Signed-in user.
    pub user: Option<User>,
    /// Bearer token of the signed-in user.
    pub token: Option<String>,
    /// Operation in flight, if any.
    pub activity: Option<AuthActivity>,
    /// Message of the last failed attempt.
    pub error: Option<String>,
    /// True once startup verification has finished.
    pub is_initialized: bool,
    /// Identity generation; advances whenever an identity begins or ends.
    pub epoch: u64,
    /// Ticket of the most recently started operation.
    pub latest_request: u64,
}

impl SessionState {
    /// True iff a non-empty token and a user are both present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// True while an operation is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.activity.is_some()
    }

    /// Id of the authenticated user.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        if self.is_authenticated() {
            self.user.as_ref().map(|u| u.id)
        } else {
            None
        }
    }
}
