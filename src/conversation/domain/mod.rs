//! Domain types for the conversation subsystem.
//!
//! This module contains pure domain types with no infrastructure dependencies.
//! Stored records are immutable once a store has assigned their identifier.

mod conversation;
mod ids;
mod message;
mod role;
mod turn;

pub use conversation::{
    Conversation, ConversationSummary, ConversationTitle, NewConversation,
    PersistedConversationData, TITLE_MAX_CHARS, TITLE_TRUNCATION_MARKER, sort_most_recent_first,
};
pub use ids::{ConversationId, MessageId, UserId};
pub use message::{
    HistoryEntry, MAX_MESSAGE_CHARS, Message, MessageSummary, MessageText, NewMessage,
    PersistedMessageData, sort_chronologically,
};
pub use role::{ParseRoleError, Role};
pub use turn::{AgentReply, TurnRequest, TurnResult};
