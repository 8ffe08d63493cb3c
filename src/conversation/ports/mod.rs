//! Port trait definitions for the conversation subsystem.
//!
//! Ports define the abstract interfaces that the orchestrator requires from
//! infrastructure. Adapters implement these ports to connect the domain
//! to databases and to the external language-model agent.

pub mod agent;
pub mod conversation_store;
pub mod message_store;

pub use agent::{AgentClient, AgentError, AgentResult};
pub use conversation_store::ConversationStore;
pub use message_store::MessageStore;

use crate::conversation::error::StoreError;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
