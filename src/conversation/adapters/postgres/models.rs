//! Diesel row models for conversation persistence.

use super::schema::{conversations, messages};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for conversation records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = conversations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ConversationRow {
    /// Store-assigned identifier.
    pub id: i64,
    /// Owning user.
    pub owner_id: String,
    /// Title snapshot.
    pub title: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for conversation records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = conversations)]
pub struct NewConversationRow {
    /// Owning user.
    pub owner_id: String,
    /// Title snapshot.
    pub title: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Query result row for message records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MessageRow {
    /// Store-assigned identifier.
    pub id: i64,
    /// Owning conversation.
    pub conversation_id: i64,
    /// Author role.
    pub role: String,
    /// Message body.
    pub content: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for message records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = messages)]
pub struct NewMessageRow {
    /// Owning conversation.
    pub conversation_id: i64,
    /// Author role.
    pub role: String,
    /// Message body.
    pub content: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
