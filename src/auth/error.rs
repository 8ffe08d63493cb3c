//! Authentication errors and header parsing.

use thiserror::Error;

/// Reasons a request failed authentication.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No `Authorization` header was supplied.
    #[error("missing bearer token")]
    MissingCredentials,

    /// The header is not of the form `Bearer <token>`.
    #[error("authorization header must use the Bearer scheme")]
    MalformedHeader,

    /// The token failed verification.
    #[error("invalid or expired token")]
    InvalidCredentials,
}

/// Extracts the token from an `Authorization` header value.
///
/// The scheme is matched case-insensitively.
///
/// # Errors
///
/// Returns [`AuthError::MalformedHeader`] when the value does not carry a
/// non-empty bearer token.
///
/// # Examples
///
/// ```
/// use taskchat::auth::bearer_token;
///
/// assert_eq!(bearer_token("Bearer abc.def.ghi"), Ok("abc.def.ghi"));
/// assert!(bearer_token("Basic dXNlcg==").is_err());
/// ```
pub fn bearer_token(header: &str) -> Result<&str, AuthError> {
    let (scheme, rest) = header
        .trim()
        .split_once(' ')
        .ok_or(AuthError::MalformedHeader)?;
    let token = rest.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AuthError::MalformedHeader);
    }
    Ok(token)
}
