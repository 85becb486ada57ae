//! Authentication service abstraction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::model::{AuthSession, PasswordChange, ProfileUpdate, Registration, User};

/// Operations offered by an authentication service.
///
/// Implementations report failures through [`crate::AuthError`]; the
/// variants carry the service's message so callers can surface it as is.
#[async_trait]
pub trait AuthClient: Send + Sync {
    /// Exchanges credentials for a session.
    async fn login(&self, email: &str, password: &str) -> Result<AuthSession>;

    /// Creates an account and signs it in.
    async fn register(&self, registration: &Registration) -> Result<AuthSession>;

    /// Revokes a token.
    async fn logout(&self, token: &str) -> Result<()>;

    /// Confirms that a token still identifies a live session.
    async fn verify_token(&self, token: &str) -> Result<AuthSession>;

    /// Updates profile fields of the token's user.
    async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> Result<User>;

    /// Changes the token user's password.
    async fn change_password(&self, token: &str, change: &PasswordChange) -> Result<()>;

    /// Expiry encoded in a token, if the token carries one.
    ///
    /// This is a local check only; it never contacts the service.
    fn token_expiry(&self, token: &str) -> Option<DateTime<Utc>> {
        crate::token::expires_at(token)
    }
}
