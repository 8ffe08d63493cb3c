//! The conversation aggregate and its derived title.

use super::{ConversationId, MessageText, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of leading characters of the first message kept in a title.
pub const TITLE_MAX_CHARS: usize = 50;

/// Marker appended to titles cut short at [`TITLE_MAX_CHARS`].
pub const TITLE_TRUNCATION_MARKER: &str = "...";

/// Snapshot of the first message used to label a conversation.
///
/// # Examples
///
/// ```
/// use taskchat::conversation::domain::{ConversationTitle, MessageText};
///
/// let long = MessageText::parse("a".repeat(60)).expect("valid message");
/// let title = ConversationTitle::from_first_message(&long);
/// assert_eq!(title.as_str(), format!("{}...", "a".repeat(50)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationTitle(String);

impl ConversationTitle {
    /// Derives a title from the message that opens a conversation.
    ///
    /// Messages of at most [`TITLE_MAX_CHARS`] characters are used verbatim;
    /// longer ones keep their first [`TITLE_MAX_CHARS`] characters followed
    /// by [`TITLE_TRUNCATION_MARKER`].
    #[must_use]
    pub fn from_first_message(text: &MessageText) -> Self {
        if text.char_count() <= TITLE_MAX_CHARS {
            return Self(text.as_str().to_owned());
        }

        let mut title: String = text.as_str().chars().take(TITLE_MAX_CHARS).collect();
        title.push_str(TITLE_TRUNCATION_MARKER);
        Self(title)
    }

    /// Rebuilds a title read back from storage.
    #[must_use]
    pub fn from_persisted(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the title as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A conversation that has not yet been assigned an identifier by a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewConversation {
    owner_id: UserId,
    title: ConversationTitle,
    created_at: DateTime<Utc>,
}

impl NewConversation {
    /// Creates a conversation owned by `owner_id`, stamped with the clock's
    /// current time.
    #[must_use]
    pub fn new(owner_id: UserId, title: ConversationTitle, clock: &impl Clock) -> Self {
        Self {
            owner_id,
            title,
            created_at: clock.utc(),
        }
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &ConversationTitle {
        &self.title
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Persisted conversation state used to rebuild a [`Conversation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedConversationData {
    /// Store-assigned identifier.
    pub id: ConversationId,
    /// Owning user.
    pub owner_id: UserId,
    /// Title snapshot.
    pub title: ConversationTitle,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A conversation thread owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    id: ConversationId,
    owner_id: UserId,
    title: ConversationTitle,
    created_at: DateTime<Utc>,
}

impl Conversation {
    /// Binds a store-assigned identifier to a new conversation.
    #[must_use]
    pub fn from_new(id: ConversationId, conversation: NewConversation) -> Self {
        let NewConversation {
            owner_id,
            title,
            created_at,
        } = conversation;
        Self {
            id,
            owner_id,
            title,
            created_at,
        }
    }

    /// Reconstructs a conversation from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedConversationData) -> Self {
        Self {
            id: data.id,
            owner_id: data.owner_id,
            title: data.title,
            created_at: data.created_at,
        }
    }

    /// Returns the conversation identifier.
    #[must_use]
    pub const fn id(&self) -> ConversationId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &ConversationTitle {
        &self.title
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns `true` when `user_id` owns this conversation.
    #[must_use]
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        self.owner_id == *user_id
    }

    /// Reduces the conversation to its listing representation.
    #[must_use]
    pub fn summary(&self) -> ConversationSummary {
        ConversationSummary {
            id: self.id,
            created_at: self.created_at,
            title: self.title.as_str().to_owned(),
        }
    }
}

/// Orders conversations most recent first, breaking timestamp ties by
/// descending identifier.
pub fn sort_most_recent_first(conversations: &mut [Conversation]) {
    conversations.sort_by(|left, right| {
        (right.created_at(), right.id()).cmp(&(left.created_at(), left.id()))
    });
}

/// Listing view of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSummary {
    /// Conversation identifier.
    pub id: ConversationId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Title snapshot.
    pub title: String,
}
