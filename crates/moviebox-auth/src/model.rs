//! Account and session types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a user.
pub type UserId = u64;

/// A registered user, as returned by the auth service (never includes the password).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Account creation time.
    pub created_at: DateTime<Utc>,
    /// Short biography.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Avatar image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Result of a successful login, registration or token verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    /// Authenticated user.
    pub user: User,
    /// Opaque bearer token.
    pub token: String,
}

/// Sign-up form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
}

impl Registration {
    /// Creates a registration request.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Partial profile update.
///
/// Identity fields (`id`, `email`) are not part of an update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    /// New display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New biography.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// New avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl ProfileUpdate {
    /// Returns true if the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.bio.is_none() && self.avatar_url.is_none()
    }

    /// Returns a copy of `user` with this update applied.
    #[must_use]
    pub fn apply_to(&self, user: &User) -> User {
        let mut updated = user.clone();
        if let Some(name) = &self.name {
            updated.name.clone_from(name);
        }
        if let Some(bio) = &self.bio {
            updated.bio = Some(bio.clone());
        }
        if let Some(avatar_url) = &self.avatar_url {
            updated.avatar_url = Some(avatar_url.clone());
        }
        updated
    }
}

/// Password change form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    /// Current password.
    pub current_password: String,
    /// Replacement password.
    pub new_password: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 7,
            name: "Ada".into(),
            email: "ada@example.com".into(),
            created_at: Utc::now(),
            bio: None,
            avatar_url: None,
        }
    }

    #[test]
    fn test_profile_update_keeps_identity() {
        let update = ProfileUpdate {
            name: Some("Ada Lovelace".into()),
            bio: Some("Analyst".into()),
            avatar_url: None,
        };
        let updated = update.apply_to(&user());
        assert_eq!(updated.id, 7);
        assert_eq!(updated.email, "ada@example.com");
        assert_eq!(updated.name, "Ada Lovelace");
        assert_eq!(updated.bio.as_deref(), Some("Analyst"));
    }

    #[test]
    fn test_user_json_shape() {
        let json = serde_json::to_value(user()).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("bio").is_none());
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_empty_update() {
        assert!(ProfileUpdate::default().is_empty());
    }
}
