//! Diesel schema for conversation persistence.

diesel::table! {
    /// Conversation threads.
    conversations (id) {
        /// Store-assigned identifier.
        id -> Int8,
        /// Subject identity of the owning user.
        owner_id -> Text,
        /// Title snapshot of the first message.
        #[max_length = 255]
        title -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Messages appended to conversations.
    messages (id) {
        /// Store-assigned identifier.
        id -> Int8,
        /// Owning conversation.
        conversation_id -> Int8,
        /// Author role.
        #[max_length = 50]
        role -> Varchar,
        /// Message body.
        content -> Text,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(messages -> conversations (conversation_id));
diesel::allow_tables_to_appear_in_same_query!(conversations, messages);
