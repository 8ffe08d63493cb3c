//! Request extractors.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::{ApiError, ApiState};
use crate::{
    auth::{AuthError, bearer_token},
    conversation::domain::UserId,
};

/// The verified subject of the request's bearer token.
///
/// Rejects with `401 unauthenticated` when the token is missing or invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

impl FromRequestParts<ApiState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ApiState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingCredentials)?;
        let value = header.to_str().map_err(|_| AuthError::MalformedHeader)?;
        let token = bearer_token(value)?;
        let user = state.verifier().verify(token)?;
        Ok(Self(user))
    }
}
