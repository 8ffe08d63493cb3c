//! Store port for conversation persistence.

use super::StoreResult;
use crate::conversation::domain::{Conversation, ConversationId, NewConversation, UserId};
use async_trait::async_trait;

/// Port for creating and reading conversations.
///
/// # Implementation Notes
///
/// Implementations must ensure:
/// - Identifiers are assigned by the store and never reused
/// - Conversations are never modified after creation
/// - Concurrent access is handled safely
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Persists a new conversation and returns it with its assigned
    /// identifier.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    async fn create(&self, conversation: NewConversation) -> StoreResult<Conversation>;

    /// Retrieves a conversation by its identifier.
    ///
    /// Returns `None` if the conversation does not exist. Ownership is not
    /// checked here.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails.
    async fn find_by_id(&self, id: ConversationId) -> StoreResult<Option<Conversation>>;

    /// Retrieves every conversation owned by `owner_id`, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails.
    async fn list_by_owner(&self, owner_id: &UserId) -> StoreResult<Vec<Conversation>>;
}
