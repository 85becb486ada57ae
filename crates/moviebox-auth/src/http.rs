//! HTTP implementation of [`AuthClient`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::client::AuthClient;
use crate::error::{AuthError, Result};
use crate::model::{AuthSession, PasswordChange, ProfileUpdate, Registration, User};

/// Error body returned by the auth API.
#[derive(Debug, Clone, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
}

/// Profile response body.
#[derive(Debug, Clone, Deserialize)]
struct UserResponse {
    user: User,
}

/// Which endpoint produced an error; decides how a 401 is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Login,
    Register,
    Logout,
    Verify,
    Profile,
    Password,
}

impl Endpoint {
    const fn path(self) -> &'static str {
        match self {
            Self::Login => "auth/login",
            Self::Register => "auth/register",
            Self::Logout => "auth/logout",
            Self::Verify => "auth/verify",
            Self::Profile => "auth/profile",
            Self::Password => "auth/password",
        }
    }

    const fn fallback_message(self) -> &'static str {
        match self {
            Self::Login => "Login failed",
            Self::Register => "Registration failed",
            Self::Logout => "Logout failed",
            Self::Verify => "Session verification failed",
            Self::Profile => "Profile update failed",
            Self::Password => "Password change failed",
        }
    }
}

/// Maps a failed response to an [`AuthError`].
fn classify(endpoint: Endpoint, status: StatusCode, message: Option<String>) -> AuthError {
    let message = message
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| endpoint.fallback_message().to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => match endpoint {
            Endpoint::Login | Endpoint::Password => AuthError::InvalidCredentials(message),
            _ => AuthError::InvalidToken(message),
        },
        StatusCode::CONFLICT => AuthError::DuplicateEmail(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            AuthError::Validation(message)
        }
        _ => AuthError::Service(message),
    }
}

/// JSON auth API client.
///
/// Endpoints are resolved relative to the base URL: `auth/login`,
/// `auth/register`, `auth/logout`, `auth/verify`, `auth/profile` and
/// `auth/password`. Authenticated calls send the token as a bearer header.
#[derive(Debug, Clone)]
pub struct HttpAuthClient {
    base_url: Url,
    http_client: Client,
}

impl HttpAuthClient {
    /// Creates a client for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = if base_url.ends_with('/') {
            Url::parse(base_url)?
        } else {
            Url::parse(&format!("{base_url}/"))?
        };
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url,
            http_client,
        })
    }

    fn url(&self, endpoint: Endpoint) -> Result<Url> {
        Ok(self.base_url.join(endpoint.path())?)
    }

    async fn send(&self, endpoint: Endpoint, request: RequestBuilder) -> Result<reqwest::Response> {
        debug!("auth request: {}", endpoint.path());
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .ok()
            .and_then(|e| e.message);
        Err(classify(endpoint, status, message))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        request: RequestBuilder,
    ) -> Result<T> {
        let response = self.send(endpoint, request).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(Into::into)
    }
}

#[async_trait]
impl AuthClient for HttpAuthClient {
    async fn login(&self, email: &str, password: &str) -> Result<AuthSession> {
        let request = self
            .http_client
            .post(self.url(Endpoint::Login)?)
            .json(&json!({ "email": email, "password": password }));
        self.send_json(Endpoint::Login, request).await
    }

    async fn register(&self, registration: &Registration) -> Result<AuthSession> {
        let request = self
            .http_client
            .post(self.url(Endpoint::Register)?)
            .json(registration);
        self.send_json(Endpoint::Register, request).await
    }

    async fn logout(&self, token: &str) -> Result<()> {
        let request = self
            .http_client
            .post(self.url(Endpoint::Logout)?)
            .bearer_auth(token);
        self.send(Endpoint::Logout, request).await?;
        Ok(())
    }

    async fn verify_token(&self, token: &str) -> Result<AuthSession> {
        let request = self
            .http_client
            .get(self.url(Endpoint::Verify)?)
            .bearer_auth(token);
        self.send_json(Endpoint::Verify, request).await
    }

    async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> Result<User> {
        let request = self
            .http_client
            .patch(self.url(Endpoint::Profile)?)
            .bearer_auth(token)
            .json(update);
        let response: UserResponse = self.send_json(Endpoint::Profile, request).await?;
        Ok(response.user)
    }

    async fn change_password(&self, token: &str, change: &PasswordChange) -> Result<()> {
        let request = self
            .http_client
            .post(self.url(Endpoint::Password)?)
            .bearer_auth(token)
            .json(change);
        self.send(Endpoint::Password, request).await?;
        Ok(())
    }
}
