//! Messages exchanged within a conversation.
//!
//! Messages are append-only: once a store has assigned an identifier the
//! record never changes.

use super::{ConversationId, MessageId, Role};
use crate::conversation::error::ValidationError;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Maximum number of characters accepted for a single user utterance.
pub const MAX_MESSAGE_CHARS: usize = 1000;

/// A validated user utterance.
///
/// # Invariants
///
/// - never empty
/// - at most [`MAX_MESSAGE_CHARS`] characters (Unicode scalar values)
///
/// # Examples
///
/// ```
/// use taskchat::conversation::domain::MessageText;
///
/// assert!(MessageText::parse("Add buy groceries").is_ok());
/// assert!(MessageText::parse("").is_err());
/// assert!(MessageText::parse("x".repeat(1001)).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageText(String);

impl MessageText {
    /// Validates raw input as a user utterance.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyMessage`] for empty input and
    /// [`ValidationError::MessageTooLong`] when the input exceeds
    /// [`MAX_MESSAGE_CHARS`] characters.
    pub fn parse(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let text = raw.into();
        if text.is_empty() {
            return Err(ValidationError::EmptyMessage);
        }

        let length = text.chars().count();
        if length > MAX_MESSAGE_CHARS {
            return Err(ValidationError::MessageTooLong {
                actual: length,
                max: MAX_MESSAGE_CHARS,
            });
        }

        Ok(Self(text))
    }

    /// Returns the utterance as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the number of characters in the utterance.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    /// Consumes the wrapper and returns the owned text.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageText {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<MessageText> for String {
    fn from(value: MessageText) -> Self {
        value.0
    }
}

/// A message that has not yet been assigned an identifier by a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    conversation_id: ConversationId,
    role: Role,
    content: String,
    created_at: DateTime<Utc>,
}

impl NewMessage {
    /// Creates a message stamped with the clock's current time.
    #[must_use]
    pub fn new(
        conversation_id: ConversationId,
        role: Role,
        content: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            conversation_id,
            role,
            content: content.into(),
            created_at: clock.utc(),
        }
    }

    /// Returns the owning conversation.
    #[must_use]
    pub const fn conversation_id(&self) -> ConversationId {
        self.conversation_id
    }

    /// Returns the author role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the message body.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Persisted message state used to rebuild a [`Message`] from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedMessageData {
    /// Store-assigned identifier.
    pub id: MessageId,
    /// Owning conversation.
    pub conversation_id: ConversationId,
    /// Author role.
    pub role: Role,
    /// Message body.
    pub content: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A stored message within a conversation.
///
/// # Invariants
///
/// - `id` was assigned by the store that persisted the message
/// - messages are never modified after storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    conversation_id: ConversationId,
    role: Role,
    content: String,
    created_at: DateTime<Utc>,
}

impl Message {
    /// Binds a store-assigned identifier to a new message.
    #[must_use]
    pub fn from_new(id: MessageId, message: NewMessage) -> Self {
        let NewMessage {
            conversation_id,
            role,
            content,
            created_at,
        } = message;
        Self {
            id,
            conversation_id,
            role,
            content,
            created_at,
        }
    }

    /// Reconstructs a message from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedMessageData) -> Self {
        Self {
            id: data.id,
            conversation_id: data.conversation_id,
            role: data.role,
            content: data.content,
            created_at: data.created_at,
        }
    }

    /// Returns the message identifier.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Returns the owning conversation.
    #[must_use]
    pub const fn conversation_id(&self) -> ConversationId {
        self.conversation_id
    }

    /// Returns the author role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the message body.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Strips storage-only fields, leaving what the agent sees as context.
    #[must_use]
    pub fn to_history_entry(&self) -> HistoryEntry {
        HistoryEntry {
            role: self.role,
            content: self.content.clone(),
        }
    }

    /// Reduces the message to its listing representation.
    #[must_use]
    pub fn summary(&self) -> MessageSummary {
        MessageSummary {
            id: self.id,
            role: self.role,
            content: self.content.clone(),
            created_at: self.created_at,
        }
    }
}

/// Orders messages chronologically, breaking timestamp ties by identifier.
pub fn sort_chronologically(messages: &mut [Message]) {
    messages.sort_by_key(|message| (message.created_at(), message.id()));
}

/// One prior exchange handed to the agent as context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Author role.
    pub role: Role,
    /// Message body.
    pub content: String,
}

impl HistoryEntry {
    /// Creates a history entry.
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Listing view of a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSummary {
    /// Message identifier.
    pub id: MessageId,
    /// Author role.
    pub role: Role,
    /// Message body.
    pub content: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
