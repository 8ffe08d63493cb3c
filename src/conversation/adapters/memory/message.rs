//! In-memory implementation of the `MessageStore` port.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::conversation::{
    domain::{ConversationId, Message, MessageId, NewMessage, sort_chronologically},
    error::StoreError,
    ports::{MessageStore, StoreResult},
};

/// In-memory implementation of [`MessageStore`].
///
/// Thread-safe via internal [`RwLock`]; identifiers are assigned in write
/// order starting at 1. Clones share the same underlying state.
#[derive(Debug, Default, Clone)]
pub struct InMemoryMessageStore {
    state: Arc<RwLock<MessageState>>,
}

#[derive(Debug, Default)]
struct MessageState {
    last_id: i64,
    messages: BTreeMap<MessageId, Message>,
}

impl InMemoryMessageStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored messages across all conversations.
    ///
    /// Returns `0` if the internal lock is poisoned, matching the fallback
    /// behaviour of an empty store. For error-propagating access, use the
    /// store trait methods instead.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state
            .read()
            .map(|guard| guard.messages.len())
            .unwrap_or(0)
    }

    /// Returns `true` if no messages are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn append(&self, message: NewMessage) -> StoreResult<Message> {
        let mut guard = self
            .state
            .write()
            .map_err(|e| StoreError::connection(format!("lock poisoned: {e}")))?;

        guard.last_id = guard.last_id.saturating_add(1);
        let id = MessageId::new(guard.last_id);
        let stored = Message::from_new(id, message);
        guard.messages.insert(id, stored.clone());
        Ok(stored)
    }

    async fn list_by_conversation(
        &self,
        conversation_id: ConversationId,
    ) -> StoreResult<Vec<Message>> {
        let guard = self
            .state
            .read()
            .map_err(|e| StoreError::connection(format!("lock poisoned: {e}")))?;

        let mut messages: Vec<Message> = guard
            .messages
            .values()
            .filter(|m| m.conversation_id() == conversation_id)
            .cloned()
            .collect();
        sort_chronologically(&mut messages);

        Ok(messages)
    }
}
