//! Error types for chat-turn validation, persistence and orchestration.
//!
//! Uses `thiserror` for ergonomic error handling with typed variants
//! that can be inspected by callers.

use super::domain::{ConversationId, UserId};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while validating inbound user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The message is empty.
    #[error("message is required")]
    EmptyMessage,

    /// The message exceeds the character limit.
    #[error("message must be {max} characters or less (got {actual})")]
    MessageTooLong {
        /// Number of characters received.
        actual: usize,
        /// Maximum number of characters allowed.
        max: usize,
    },
}

/// Errors that can occur during conversation or message persistence.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// A database error occurred.
    #[error("database error: {0}")]
    Database(Arc<dyn std::error::Error + Send + Sync>),

    /// A stored record could not be mapped to a domain value.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A connection error occurred.
    #[error("connection error: {0}")]
    Connection(String),
}

impl StoreError {
    /// Creates a database error from any error type.
    #[must_use]
    pub fn database(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Database(Arc::new(err))
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }
}

impl From<diesel::result::Error> for StoreError {
    fn from(err: diesel::result::Error) -> Self {
        Self::database(err)
    }
}

/// Service-level errors for chat operations.
///
/// Every variant is raised before the write it would have guarded, except
/// [`ChatError::Configuration`] and [`ChatError::Agent`], which leave the
/// user message of the failed turn in place.
#[derive(Debug, Clone, Error)]
pub enum ChatError {
    /// Input failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The caller tried to act on behalf of another user.
    #[error("user {caller} is not authorized to access resources of user {target}")]
    Authorization {
        /// The authenticated caller.
        caller: UserId,
        /// The user whose resources were requested.
        target: UserId,
    },

    /// The conversation does not exist or belongs to someone else.
    #[error("conversation {0} not found or does not belong to user")]
    NotFound(ConversationId),

    /// The agent could not be initialised.
    #[error("agent initialization error: {0}")]
    Configuration(String),

    /// The agent failed while processing the message.
    #[error("agent invocation failed: {0}")]
    Agent(String),

    /// Persistence failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for chat service operations.
pub type ChatResult<T> = Result<T, ChatError>;

/// Fails with [`ChatError::Authorization`] unless `caller` and `target` are
/// the same user.
///
/// # Errors
///
/// Returns [`ChatError::Authorization`] when the identities differ.
pub fn ensure_same_user(caller: &UserId, target: &UserId) -> ChatResult<()> {
    if caller == target {
        return Ok(());
    }
    Err(ChatError::Authorization {
        caller: caller.clone(),
        target: target.clone(),
    })
}
