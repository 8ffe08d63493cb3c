//! In-memory store adapters.
//!
//! Provide simple, thread-safe stores for tests and local development
//! without database dependencies. State is lost when the process exits.

mod conversation;
mod message;

pub use conversation::InMemoryConversationStore;
pub use message::InMemoryMessageStore;
