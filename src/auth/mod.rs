//! Bearer-token authentication.
//!
//! A [`TokenVerifier`] turns the token presented by a request into the
//! verified [`UserId`] it was issued to. Token issuance happens elsewhere.

mod error;
mod jwt;

pub use error::{AuthError, bearer_token};
pub use jwt::{Claims, JwtTokenVerifier};

use crate::conversation::domain::UserId;

/// Port for verifying bearer tokens.
pub trait TokenVerifier: Send + Sync {
    /// Verifies `token` and returns the subject it identifies.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] when the token is malformed,
    /// expired or signed with another key.
    fn verify(&self, token: &str) -> Result<UserId, AuthError>;
}
