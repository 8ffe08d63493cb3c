//! `PostgreSQL` implementation of the `MessageStore` port.

use async_trait::async_trait;
use diesel::prelude::*;

use super::{
    blocking::{ChatPgPool, run_blocking},
    models::{MessageRow, NewMessageRow},
    schema::messages,
};
use crate::conversation::{
    domain::{ConversationId, Message, MessageId, NewMessage, PersistedMessageData, Role},
    error::StoreError,
    ports::{MessageStore, StoreResult},
};

/// `PostgreSQL`-backed message store.
#[derive(Debug, Clone)]
pub struct PostgresMessageStore {
    pool: ChatPgPool,
}

impl PostgresMessageStore {
    /// Creates a new store with the given connection pool.
    #[must_use]
    pub const fn new(pool: ChatPgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageStore for PostgresMessageStore {
    async fn append(&self, message: NewMessage) -> StoreResult<Message> {
        let new_row = NewMessageRow {
            conversation_id: message.conversation_id().value(),
            role: message.role().as_str().to_owned(),
            content: message.content().to_owned(),
            created_at: message.created_at(),
        };

        run_blocking(&self.pool, move |connection| {
            let row = diesel::insert_into(messages::table)
                .values(&new_row)
                .returning(MessageRow::as_returning())
                .get_result(connection)?;
            row_to_message(row)
        })
        .await
    }

    async fn list_by_conversation(
        &self,
        conversation_id: ConversationId,
    ) -> StoreResult<Vec<Message>> {
        run_blocking(&self.pool, move |connection| {
            let rows = messages::table
                .filter(messages::conversation_id.eq(conversation_id.value()))
                .order((messages::created_at.asc(), messages::id.asc()))
                .select(MessageRow::as_select())
                .load::<MessageRow>(connection)?;
            rows.into_iter().map(row_to_message).collect()
        })
        .await
    }
}

fn row_to_message(row: MessageRow) -> StoreResult<Message> {
    let MessageRow {
        id,
        conversation_id,
        role: persisted_role,
        content,
        created_at,
    } = row;

    let role = Role::try_from(persisted_role.as_str())
        .map_err(|e| StoreError::serialization(e.to_string()))?;

    Ok(Message::from_persisted(PersistedMessageData {
        id: MessageId::new(id),
        conversation_id: ConversationId::new(conversation_id),
        role,
        content,
        created_at,
    }))
}
