//! `PostgreSQL` implementation of the `ConversationStore` port.

use async_trait::async_trait;
use diesel::prelude::*;

use super::{
    blocking::{ChatPgPool, run_blocking},
    models::{ConversationRow, NewConversationRow},
    schema::conversations,
};
use crate::conversation::{
    domain::{
        Conversation, ConversationId, ConversationTitle, NewConversation,
        PersistedConversationData, UserId,
    },
    ports::{ConversationStore, StoreResult},
};

/// `PostgreSQL`-backed conversation store.
///
/// Uses Diesel ORM with connection pooling via r2d2. Thread-safe for
/// concurrent access.
///
/// # Example
///
/// ```ignore
/// use taskchat::conversation::adapters::postgres::{PostgresConversationStore, build_pool};
///
/// let pool = build_pool("postgres://...", 8)?;
/// let store = PostgresConversationStore::new(pool);
/// ```
#[derive(Debug, Clone)]
pub struct PostgresConversationStore {
    pool: ChatPgPool,
}

impl PostgresConversationStore {
    /// Creates a new store with the given connection pool.
    #[must_use]
    pub const fn new(pool: ChatPgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationStore for PostgresConversationStore {
    async fn create(&self, conversation: NewConversation) -> StoreResult<Conversation> {
        let new_row = NewConversationRow {
            owner_id: conversation.owner_id().as_str().to_owned(),
            title: conversation.title().as_str().to_owned(),
            created_at: conversation.created_at(),
        };

        run_blocking(&self.pool, move |connection| {
            let row = diesel::insert_into(conversations::table)
                .values(&new_row)
                .returning(ConversationRow::as_returning())
                .get_result(connection)?;
            Ok(row_to_conversation(row))
        })
        .await
    }

    async fn find_by_id(&self, id: ConversationId) -> StoreResult<Option<Conversation>> {
        run_blocking(&self.pool, move |connection| {
            let row = conversations::table
                .filter(conversations::id.eq(id.value()))
                .select(ConversationRow::as_select())
                .first::<ConversationRow>(connection)
                .optional()?;
            Ok(row.map(row_to_conversation))
        })
        .await
    }

    async fn list_by_owner(&self, owner_id: &UserId) -> StoreResult<Vec<Conversation>> {
        let owner = owner_id.as_str().to_owned();
        run_blocking(&self.pool, move |connection| {
            let rows = conversations::table
                .filter(conversations::owner_id.eq(owner))
                .order((conversations::created_at.desc(), conversations::id.desc()))
                .select(ConversationRow::as_select())
                .load::<ConversationRow>(connection)?;
            Ok(rows.into_iter().map(row_to_conversation).collect())
        })
        .await
    }
}

fn row_to_conversation(row: ConversationRow) -> Conversation {
    let ConversationRow {
        id,
        owner_id,
        title,
        created_at,
    } = row;

    Conversation::from_persisted(PersistedConversationData {
        id: ConversationId::new(id),
        owner_id: UserId::new(owner_id),
        title: ConversationTitle::from_persisted(title),
        created_at,
    })
}
