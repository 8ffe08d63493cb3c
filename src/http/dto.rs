//! JSON request and response bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::conversation::domain::{ConversationSummary, MessageSummary, Role, TurnResult};

/// Body of `POST /{user_id}/chat`.
///
/// A missing `message` is treated as empty so that it fails the same
/// validation as an empty string.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ChatRequest {
    #[serde(default, alias = "conversation_id")]
    pub(super) conversation_id: Option<i64>,
    #[serde(default)]
    pub(super) message: Option<String>,
}

/// Success envelope of the chat endpoint.
#[derive(Debug, Serialize)]
pub(super) struct Envelope<T> {
    success: bool,
    data: T,
}

impl<T> Envelope<T> {
    pub(super) const fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ChatResponse {
    conversation_id: i64,
    user_message_id: i64,
    ai_message_id: i64,
    response: String,
    tool_calls: Vec<Value>,
    tool_results: Vec<Value>,
}

impl From<TurnResult> for ChatResponse {
    fn from(result: TurnResult) -> Self {
        Self {
            conversation_id: result.conversation_id.value(),
            user_message_id: result.user_message_id.value(),
            ai_message_id: result.assistant_message_id.value(),
            response: result.response_text,
            tool_calls: result.tool_calls,
            tool_results: result.tool_results,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ConversationView {
    id: i64,
    created_at: DateTime<Utc>,
    title: String,
}

impl From<ConversationSummary> for ConversationView {
    fn from(summary: ConversationSummary) -> Self {
        Self {
            id: summary.id.value(),
            created_at: summary.created_at,
            title: summary.title,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct MessageView {
    id: i64,
    role: Role,
    content: String,
    created_at: DateTime<Utc>,
}

impl From<MessageSummary> for MessageView {
    fn from(summary: MessageSummary) -> Self {
        Self {
            id: summary.id.value(),
            role: summary.role,
            content: summary.content,
            created_at: summary.created_at,
        }
    }
}
