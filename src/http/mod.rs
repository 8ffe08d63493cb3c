//! JSON-over-HTTP surface of taskchat, built on `axum`.
//!
//! Every route except `/health` requires a bearer token whose subject
//! matches the `{user_id}` path segment.

mod dto;
mod error;
mod extract;
mod routes;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use extract::AuthenticatedUser;

use crate::{auth::TokenVerifier, conversation::services::SharedOrchestrator};

/// State shared by all handlers.
#[derive(Clone)]
pub struct ApiState {
    orchestrator: SharedOrchestrator,
    verifier: Arc<dyn TokenVerifier>,
}

impl ApiState {
    /// Bundles the orchestrator and token verifier.
    #[must_use]
    pub const fn new(orchestrator: SharedOrchestrator, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self {
            orchestrator,
            verifier,
        }
    }

    /// Returns the chat orchestrator.
    #[must_use]
    pub const fn orchestrator(&self) -> &SharedOrchestrator {
        &self.orchestrator
    }

    /// Returns the token verifier.
    #[must_use]
    pub fn verifier(&self) -> &dyn TokenVerifier {
        self.verifier.as_ref()
    }
}

/// Builds the application router.
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/{user_id}/chat", post(routes::chat))
        .route("/{user_id}/conversations", get(routes::list_conversations))
        .route(
            "/{user_id}/conversations/{conversation_id}/messages",
            get(routes::list_messages),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
