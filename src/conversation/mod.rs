//! Conversations, messages and the chat-turn orchestration for taskchat.
//!
//! A chat turn takes one user utterance, resolves (or lazily creates) the
//! conversation it belongs to, persists the utterance, hands the ordered
//! history to an external language-model agent and persists the agent's
//! reply.
//!
//! # Architecture
//!
//! The module follows hexagonal architecture principles:
//!
//! - **Domain**: Pure domain types ([`domain::Conversation`], [`domain::Message`], [`domain::TurnResult`], etc.)
//! - **Ports**: Abstract trait interfaces ([`ports::ConversationStore`], [`ports::MessageStore`], [`ports::AgentClient`])
//! - **Adapters**: Concrete implementations (in-memory, `PostgreSQL` and Gemini)
//! - **Services**: The [`services::ChatOrchestrator`] sequencing a turn
//!
//! # Example
//!
//! ```
//! use taskchat::conversation::domain::{ConversationTitle, MessageText};
//!
//! let text = MessageText::parse("Add buy groceries").expect("valid message");
//! let title = ConversationTitle::from_first_message(&text);
//! assert_eq!(title.as_str(), "Add buy groceries");
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;
