//! `PostgreSQL` store adapters using Diesel ORM.
//!
//! The tables are created by the SQL migrations under `migrations/`.

mod blocking;
mod conversation;
mod message;
mod models;
mod schema;

pub use blocking::{ChatPgPool, build_pool};
pub use conversation::PostgresConversationStore;
pub use message::PostgresMessageStore;
