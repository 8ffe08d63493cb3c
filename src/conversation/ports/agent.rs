//! Port for the external language-model agent.
//!
//! The agent interprets a user message against the conversation history,
//! may invoke task tools on the user's behalf and returns a reply. Its
//! reasoning is opaque to taskchat.

use crate::conversation::domain::{AgentReply, HistoryEntry, UserId};
use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by agent implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentError {
    /// The agent cannot be initialised, e.g. because a credential is missing.
    #[error("agent is not configured: {0}")]
    Configuration(String),

    /// The agent was reachable but failed to process the message.
    #[error("agent request failed: {0}")]
    Invocation(String),
}

impl AgentError {
    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates an invocation error.
    #[must_use]
    pub fn invocation(message: impl Into<String>) -> Self {
        Self::Invocation(message.into())
    }
}

/// Result type for agent operations.
pub type AgentResult<T> = Result<T, AgentError>;

/// Port for processing a user message with a language-model agent.
///
/// Any implementation is substitutable; tests inject deterministic fakes.
#[async_trait]
pub trait AgentClient: Send + Sync {
    /// Processes `text` for `user_id` given the ordered conversation
    /// `history`, whose last entry is `text` itself.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Configuration`] when the agent cannot start and
    /// [`AgentError::Invocation`] when processing fails.
    async fn process_message(
        &self,
        text: &str,
        history: &[HistoryEntry],
        user_id: &UserId,
    ) -> AgentResult<AgentReply>;
}
