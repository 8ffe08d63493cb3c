//! In-memory implementation of the `ConversationStore` port.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::conversation::{
    domain::{
        Conversation, ConversationId, NewConversation, UserId, sort_most_recent_first,
    },
    error::StoreError,
    ports::{ConversationStore, StoreResult},
};

/// In-memory implementation of [`ConversationStore`].
///
/// Thread-safe via internal [`RwLock`]; identifiers are assigned from a
/// counter starting at 1. Clones share the same underlying state.
///
/// # Example
///
/// ```
/// use taskchat::conversation::adapters::memory::InMemoryConversationStore;
///
/// let store = InMemoryConversationStore::new();
/// assert!(store.is_empty());
/// ```
#[derive(Debug, Default, Clone)]
pub struct InMemoryConversationStore {
    state: Arc<RwLock<ConversationState>>,
}

#[derive(Debug, Default)]
struct ConversationState {
    last_id: i64,
    conversations: BTreeMap<ConversationId, Conversation>,
}

impl InMemoryConversationStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored conversations.
    ///
    /// Returns `0` if the internal lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state
            .read()
            .map(|guard| guard.conversations.len())
            .unwrap_or(0)
    }

    /// Returns `true` if no conversations are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn create(&self, conversation: NewConversation) -> StoreResult<Conversation> {
        let mut guard = self
            .state
            .write()
            .map_err(|e| StoreError::connection(format!("lock poisoned: {e}")))?;

        guard.last_id = guard.last_id.saturating_add(1);
        let id = ConversationId::new(guard.last_id);
        let stored = Conversation::from_new(id, conversation);
        guard.conversations.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: ConversationId) -> StoreResult<Option<Conversation>> {
        let guard = self
            .state
            .read()
            .map_err(|e| StoreError::connection(format!("lock poisoned: {e}")))?;

        Ok(guard.conversations.get(&id).cloned())
    }

    async fn list_by_owner(&self, owner_id: &UserId) -> StoreResult<Vec<Conversation>> {
        let guard = self
            .state
            .read()
            .map_err(|e| StoreError::connection(format!("lock poisoned: {e}")))?;

        let mut owned: Vec<Conversation> = guard
            .conversations
            .values()
            .filter(|c| c.is_owned_by(owner_id))
            .cloned()
            .collect();
        sort_most_recent_first(&mut owned);

        Ok(owned)
    }
}
