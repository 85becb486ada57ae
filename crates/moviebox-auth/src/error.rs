//! Error types for authentication operations.

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Authentication error types.
///
/// The first four variants carry the service's message verbatim so it can be
/// shown to the user unchanged.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Email/password pair was rejected.
    #[error("{0}")]
    InvalidCredentials(String),

    /// Registration with an email that is already taken.
    #[error("{0}")]
    DuplicateEmail(String),

    /// Input failed validation.
    #[error("{0}")]
    Validation(String),

    /// Token is malformed, expired, or no longer has a session.
    #[error("{0}")]
    InvalidToken(String),

    /// HTTP request error.
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Malformed response: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Any other service failure.
    #[error("{0}")]
    Service(String),

    /// The request did not complete in time.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),
}

/// Coarse classification of authentication errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// Wrong email or password.
    InvalidCredentials,
    /// Email already registered.
    DuplicateEmail,
    /// Local or remote validation failure.
    Validation,
    /// Token rejected; the stored session must be discarded.
    InvalidToken,
    /// Transport, parsing, timeout or unknown failure.
    Network,
}

impl AuthError {
    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> AuthErrorKind {
        match self {
            Self::InvalidCredentials(_) => AuthErrorKind::InvalidCredentials,
            Self::DuplicateEmail(_) => AuthErrorKind::DuplicateEmail,
            Self::Validation(_) => AuthErrorKind::Validation,
            Self::InvalidToken(_) => AuthErrorKind::InvalidToken,
            Self::Http(_) | Self::Json(_) | Self::Url(_) | Self::Service(_) | Self::Timeout(_) => {
                AuthErrorKind::Network
            }
        }
    }

    /// Returns true if the token behind the request is no longer usable.
    #[must_use]
    pub const fn is_token_rejection(&self) -> bool {
        matches!(self.kind(), AuthErrorKind::InvalidToken)
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<crate::validation::ValidationError> for AuthError {
    fn from(err: crate::validation::ValidationError) -> Self {
        Self::Validation(err.message().to_string())
    }
}
