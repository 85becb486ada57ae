//! # moviebox-auth
//!
//! Authentication for the `MovieBox` client.
//!
//! ## Features
//!
//! - **Service abstraction**: [`AuthClient`] covers login, registration,
//!   logout, token verification, profile updates and password changes
//! - **HTTP client**: [`HttpAuthClient`] talks to a JSON auth API
//! - **In-memory backend**: [`MockAuthBackend`] issues and verifies tokens
//!   without a server, seeded with a demo account
//! - **Token expiry**: issued tokens carry an expiry claim exposed through
//!   [`AuthClient::token_expiry`] so callers can reject stale tokens locally
//! - **Validation**: sign-up and password rules checked before any request
//!
//! ## Quick Start
//!
//! ```ignore
//! use moviebox_auth::{AuthClient, MockAuthBackend};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = MockAuthBackend::new();
//!     let session = backend.login("demo@moviebox.com", "demo123").await?;
//!     println!("Signed in as {}", session.user.name);
//!
//!     if let Some(expiry) = backend.token_expiry(&session.token) {
//!         println!("Token valid until {expiry}");
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod http;
mod mock;
mod model;
pub mod token;
pub mod validation;

pub use client::AuthClient;
pub use error::{AuthError, AuthErrorKind, Result};
pub use http::HttpAuthClient;
pub use mock::{DEMO_EMAIL, DEMO_PASSWORD, MockAuthBackend};
pub use model::{AuthSession, PasswordChange, ProfileUpdate, Registration, User, UserId};
pub use validation::{ValidationError, ValidationResult};
