//! Input validation for sign-in, sign-up and password changes.

use crate::model::{PasswordChange, Registration};

/// Minimum password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Validation error for authentication forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Display name is empty.
    EmptyName,
    /// Email address is empty.
    EmptyEmail,
    /// Email address format is invalid.
    InvalidEmail,
    /// Password is empty.
    EmptyPassword,
    /// Password is shorter than [`MIN_PASSWORD_LEN`].
    PasswordTooShort,
    /// Current password is empty.
    EmptyCurrentPassword,
    /// New password is shorter than [`MIN_PASSWORD_LEN`].
    NewPasswordTooShort,
    /// Password confirmation does not match.
    PasswordMismatch,
}

impl ValidationError {
    /// Get human-readable error message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::EmptyName => "Name is required",
            Self::EmptyEmail => "Email address is required",
            Self::InvalidEmail => "Invalid email address format",
            Self::EmptyPassword => "Password is required",
            Self::PasswordTooShort => "Password must be at least 6 characters",
            Self::EmptyCurrentPassword => "Current password is required",
            Self::NewPasswordTooShort => "New password must be at least 6 characters",
            Self::PasswordMismatch => "Passwords do not match",
        }
    }

    /// Get the field name this error relates to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyName => "name",
            Self::EmptyEmail | Self::InvalidEmail => "email",
            Self::EmptyPassword | Self::PasswordTooShort => "password",
            Self::EmptyCurrentPassword => "current_password",
            Self::NewPasswordTooShort => "new_password",
            Self::PasswordMismatch => "confirm_password",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ValidationError {}

/// Result of validating a form.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

fn finish(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate sign-in input.
///
/// # Errors
///
/// Returns a vector of `ValidationError` if any fields are invalid.
pub fn validate_credentials(email: &str, password: &str) -> ValidationResult {
    let mut errors = Vec::new();
    if email.trim().is_empty() {
        errors.push(ValidationError::EmptyEmail);
    }
    if password.is_empty() {
        errors.push(ValidationError::EmptyPassword);
    }
    finish(errors)
}

/// Validate a sign-up form.
///
/// Returns `Ok(())` if valid, or `Err(Vec<ValidationError>)` with all errors.
///
/// # Errors
///
/// Returns a vector of `ValidationError` if any fields are invalid.
pub fn validate_registration(registration: &Registration) -> ValidationResult {
    let mut errors = Vec::new();

    if registration.name.trim().is_empty() {
        errors.push(ValidationError::EmptyName);
    }

    if registration.email.trim().is_empty() {
        errors.push(ValidationError::EmptyEmail);
    } else if !is_valid_email(&registration.email) {
        errors.push(ValidationError::InvalidEmail);
    }

    if registration.password.is_empty() {
        errors.push(ValidationError::EmptyPassword);
    } else if registration.password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(ValidationError::PasswordTooShort);
    }

    finish(errors)
}

/// Validate a password change, including the confirmation field.
///
/// # Errors
///
/// Returns a vector of `ValidationError` if any fields are invalid.
pub fn validate_password_change(change: &PasswordChange, confirmation: &str) -> ValidationResult {
    let mut errors = Vec::new();

    if change.current_password.is_empty() {
        errors.push(ValidationError::EmptyCurrentPassword);
    }
    if change.new_password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(ValidationError::NewPasswordTooShort);
    }
    if change.new_password != confirmation {
        errors.push(ValidationError::PasswordMismatch);
    }

    finish(errors)
}

/// Basic email validation.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();

    // Must contain exactly one @
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return false;
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || local.chars().any(char::is_whitespace) {
        return false;
    }

    // Domain must contain at least one dot and not be empty
    if domain.is_empty() || !domain.contains('.') {
        return false;
    }

    // Domain parts must not be empty
    !domain
        .split('.')
        .any(|p| p.is_empty() || p.chars().any(char::is_whitespace))
}
