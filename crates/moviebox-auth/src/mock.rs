//! In-memory credential-issuing backend.
//!
//! Useful offline and in tests. Users and live sessions are kept in memory;
//! tokens are three-part strings whose payload carries the user id and a
//! 24 hour expiry.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use rand::distributions::Alphanumeric;
use tokio::sync::Mutex;
use tracing::debug;

use crate::client::AuthClient;
use crate::error::{AuthError, Result};
use crate::model::{AuthSession, PasswordChange, ProfileUpdate, Registration, User, UserId};
use crate::token::{self, Claims};
use crate::validation::MIN_PASSWORD_LEN;

/// Email of the seeded demo account.
pub const DEMO_EMAIL: &str = "demo@moviebox.com";

/// Password of the seeded demo account.
pub const DEMO_PASSWORD: &str = "demo123";

const TOKEN_LIFETIME_HOURS: i64 = 24;

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password: String,
}

#[derive(Debug, Default)]
struct Inner {
    users: Vec<StoredUser>,
    sessions: HashSet<String>,
}

impl Inner {
    fn find_by_email(&self, email: &str) -> Option<&StoredUser> {
        self.users.iter().find(|u| u.user.email == email)
    }

    fn find_by_id_mut(&mut self, id: UserId) -> Option<&mut StoredUser> {
        self.users.iter_mut().find(|u| u.user.id == id)
    }

    fn issue(&mut self, user_id: UserId) -> Result<String> {
        let signature: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        let claims = Claims::new(user_id, chrono::Duration::hours(TOKEN_LIFETIME_HOURS));
        let token = token::encode(&claims, &signature)?;
        self.sessions.insert(token.clone());
        Ok(token)
    }
}

/// In-memory [`AuthClient`] seeded with a demo account.
#[derive(Debug)]
pub struct MockAuthBackend {
    inner: Mutex<Inner>,
    latency: Duration,
}

impl Default for MockAuthBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAuthBackend {
    /// Creates a backend containing only the demo account.
    #[must_use]
    pub fn new() -> Self {
        let demo = StoredUser {
            user: User {
                id: 1,
                name: "Demo User".into(),
                email: DEMO_EMAIL.into(),
                created_at: Utc::now(),
                bio: None,
                avatar_url: None,
            },
            password: DEMO_PASSWORD.into(),
        };
        Self {
            inner: Mutex::new(Inner {
                users: vec![demo],
                sessions: HashSet::new(),
            }),
            latency: Duration::ZERO,
        }
    }

    /// Delays every call by `latency` to mimic a remote service.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of live sessions.
    pub async fn session_count(&self) -> usize {
        self.inner.lock().await.sessions.len()
    }

    async fn delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn user_id(token: &str) -> Result<UserId> {
        token::decode(token).map(|claims| claims.sub)
    }
}

#[async_trait]
impl AuthClient for MockAuthBackend {
    async fn login(&self, email: &str, password: &str) -> Result<AuthSession> {
        self.delay().await;
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::validation("Email and password are required"));
        }

        let mut inner = self.inner.lock().await;
        let user = match inner.find_by_email(email) {
            Some(stored) if stored.password == password => stored.user.clone(),
            _ => {
                return Err(AuthError::InvalidCredentials(
                    "Invalid email or password".into(),
                ));
            }
        };
        let token = inner.issue(user.id)?;
        debug!("mock login for user {}", user.id);
        Ok(AuthSession { user, token })
    }

    async fn register(&self, registration: &Registration) -> Result<AuthSession> {
        self.delay().await;
        if registration.name.is_empty()
            || registration.email.is_empty()
            || registration.password.is_empty()
        {
            return Err(AuthError::validation("All fields are required"));
        }
        if registration.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::validation(
                "Password must be at least 6 characters",
            ));
        }

        let mut inner = self.inner.lock().await;
        if inner.find_by_email(&registration.email).is_some() {
            return Err(AuthError::DuplicateEmail("Email already registered".into()));
        }

        let user = User {
            id: inner.users.iter().map(|u| u.user.id).max().unwrap_or(0) + 1,
            name: registration.name.clone(),
            email: registration.email.clone(),
            created_at: Utc::now(),
            bio: None,
            avatar_url: None,
        };
        inner.users.push(StoredUser {
            user: user.clone(),
            password: registration.password.clone(),
        });
        let token = inner.issue(user.id)?;
        debug!("mock registration for user {}", user.id);
        Ok(AuthSession { user, token })
    }

    async fn logout(&self, token: &str) -> Result<()> {
        self.delay().await;
        self.inner.lock().await.sessions.remove(token);
        Ok(())
    }

    async fn verify_token(&self, token: &str) -> Result<AuthSession> {
        self.delay().await;
        if token.is_empty() {
            return Err(AuthError::InvalidToken("No token provided".into()));
        }

        let claims = token::decode(token)?;
        if claims.is_expired() {
            return Err(AuthError::InvalidToken("Token expired".into()));
        }

        let mut inner = self.inner.lock().await;
        let user = inner
            .find_by_id_mut(claims.sub)
            .map(|stored| stored.user.clone())
            .ok_or_else(|| AuthError::InvalidToken("User not found".into()))?;
        if !inner.sessions.contains(token) {
            return Err(AuthError::InvalidToken("Session not found".into()));
        }

        Ok(AuthSession {
            user,
            token: token.to_string(),
        })
    }

    async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> Result<User> {
        self.delay().await;
        let user_id = Self::user_id(token)?;

        let mut inner = self.inner.lock().await;
        let stored = inner
            .find_by_id_mut(user_id)
            .ok_or_else(|| AuthError::InvalidToken("User not found".into()))?;
        stored.user = update.apply_to(&stored.user);
        Ok(stored.user.clone())
    }

    async fn change_password(&self, token: &str, change: &PasswordChange) -> Result<()> {
        self.delay().await;
        let user_id = Self::user_id(token)?;

        let mut inner = self.inner.lock().await;
        let stored = inner
            .find_by_id_mut(user_id)
            .ok_or_else(|| AuthError::InvalidToken("User not found".into()))?;
        if stored.password != change.current_password {
            return Err(AuthError::InvalidCredentials(
                "Current password is incorrect".into(),
            ));
        }
        if change.new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::validation(
                "New password must be at least 6 characters",
            ));
        }
        stored.password.clone_from(&change.new_password);
        Ok(())
    }
}
