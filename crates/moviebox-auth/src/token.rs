//! Bearer token claims and expiry.
//!
//! Tokens have the familiar three-part `header.payload.signature` shape with
//! URL-safe base64 segments. Only the payload claims matter to this crate;
//! the signature is opaque.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, Result};
use crate::model::UserId;

/// Clock skew tolerated when checking expiry.
const EXPIRY_BUFFER_SECS: i64 = 60;

/// Fixed token header.
const HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

/// Claims carried in a token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id).
    pub sub: UserId,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

impl Claims {
    /// Creates claims for `sub` valid for `lifetime` from now.
    #[must_use]
    pub fn new(sub: UserId, lifetime: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub,
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
        }
    }

    /// Expiration time.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Checks if the claims are expired (with 60 second buffer).
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at().is_none_or(is_past)
    }
}

/// Checks if `expiry` has passed or falls within the skew buffer.
#[must_use]
pub fn is_past(expiry: DateTime<Utc>) -> bool {
    Utc::now() + Duration::seconds(EXPIRY_BUFFER_SECS) >= expiry
}

/// Encodes claims into a token with the given signature.
///
/// # Errors
///
/// Returns an error if the claims cannot be serialized.
pub fn encode(claims: &Claims, signature: &str) -> Result<String> {
    let payload = serde_json::to_vec(claims)?;
    Ok(format!(
        "{}.{}.{}",
        URL_SAFE_NO_PAD.encode(HEADER),
        URL_SAFE_NO_PAD.encode(payload),
        URL_SAFE_NO_PAD.encode(signature)
    ))
}

/// Decodes the claims of a token without checking the signature.
///
/// # Errors
///
/// Returns [`AuthError::InvalidToken`] if the token is malformed.
pub fn decode(token: &str) -> Result<Claims> {
    let invalid = || AuthError::InvalidToken("Invalid token".into());

    let mut parts = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };

    let bytes = URL_SAFE_NO_PAD.decode(payload).map_err(|_| invalid())?;
    serde_json::from_slice(&bytes).map_err(|_| invalid())
}

/// Expiration time of a token, if it can be decoded.
#[must_use]
pub fn expires_at(token: &str) -> Option<DateTime<Utc>> {
    decode(token).ok().and_then(|c| c.expires_at())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_decode() {
        let claims = Claims::new(42, Duration::hours(24));
        let token = encode(&claims, "sig").unwrap();
        assert_eq!(token.split('.').count(), 3);
        assert_eq!(decode(&token).unwrap(), claims);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_expiry() {
        let expired = Claims::new(1, Duration::seconds(-120));
        assert!(expired.is_expired());

        // Inside the skew buffer counts as expired.
        let nearly = Claims::new(1, Duration::seconds(30));
        assert!(nearly.is_expired());

        let token = encode(&Claims::new(1, Duration::hours(1)), "s").unwrap();
        let expiry = expires_at(&token).unwrap();
        assert!(expiry > Utc::now());
    }

    #[test]
    fn test_is_past_applies_skew_buffer() {
        let now = Utc::now();
        assert!(is_past(now - Duration::seconds(1)));
        assert!(is_past(now + Duration::seconds(30)));
        assert!(!is_past(now + Duration::minutes(5)));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        for token in ["", "abc", "a.b", "a.b.c.d", "a.!!!.c", "e30.e30.e30"] {
            assert!(
                matches!(decode(token), Err(AuthError::InvalidToken(_))),
                "{token} should be rejected"
            );
        }
        assert!(expires_at("not-a-token").is_none());
    }

    proptest! {
        #[test]
        fn prop_decode_never_panics(token in ".*") {
            let _ = decode(&token);
        }
    }
}
