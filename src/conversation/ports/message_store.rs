//! Store port for message persistence.

use super::StoreResult;
use crate::conversation::domain::{ConversationId, Message, NewMessage};
use async_trait::async_trait;

/// Port for appending and reading messages.
///
/// # Implementation Notes
///
/// Implementations must ensure:
/// - Identifiers are assigned by the store in write order
/// - Messages are immutable after storage (no update operations)
/// - Concurrent access is handled safely
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Appends a message and returns it with its assigned identifier.
    ///
    /// The caller is responsible for checking that the conversation exists
    /// and is owned by the acting user.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    async fn append(&self, message: NewMessage) -> StoreResult<Message>;

    /// Retrieves all messages of a conversation in chronological order.
    ///
    /// Returns an empty vector if the conversation has no messages.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails.
    async fn list_by_conversation(
        &self,
        conversation_id: ConversationId,
    ) -> StoreResult<Vec<Message>>;
}
