//! Endpoint handlers.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use serde_json::{Value, json};

use super::{
    ApiError, ApiState, AuthenticatedUser,
    dto::{ChatRequest, ChatResponse, ConversationView, Envelope, MessageView},
};
use crate::conversation::{
    domain::{ConversationId, TurnRequest, UserId},
    error::ensure_same_user,
};

pub(super) async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `POST /{user_id}/chat`
///
/// Identity is checked before the body is looked at, so a mismatched user
/// gets `403` even for a malformed request.
pub(super) async fn chat(
    AuthenticatedUser(caller): AuthenticatedUser,
    State(state): State<ApiState>,
    Path(user_id): Path<String>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<Envelope<ChatResponse>>, ApiError> {
    ensure_same_user(&caller, &UserId::new(user_id))?;
    let Json(request) = body?;

    let turn = TurnRequest::new(caller, request.message.unwrap_or_default())
        .with_optional_conversation(request.conversation_id.map(ConversationId::new));
    let result = state.orchestrator().handle_turn(turn).await?;

    Ok(Json(Envelope::ok(ChatResponse::from(result))))
}

/// `GET /{user_id}/conversations`
pub(super) async fn list_conversations(
    AuthenticatedUser(caller): AuthenticatedUser,
    State(state): State<ApiState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<ConversationView>>, ApiError> {
    let summaries = state
        .orchestrator()
        .list_conversations(&caller, &UserId::new(user_id))
        .await?;

    Ok(Json(summaries.into_iter().map(ConversationView::from).collect()))
}

/// `GET /{user_id}/conversations/{conversation_id}/messages`
pub(super) async fn list_messages(
    AuthenticatedUser(caller): AuthenticatedUser,
    State(state): State<ApiState>,
    Path((user_id, raw_conversation_id)): Path<(String, String)>,
) -> Result<Json<Vec<MessageView>>, ApiError> {
    ensure_same_user(&caller, &UserId::new(user_id))?;
    let conversation_id = raw_conversation_id
        .parse::<i64>()
        .map(ConversationId::new)
        .map_err(|_| ApiError::bad_request("conversation id must be an integer"))?;

    let summaries = state
        .orchestrator()
        .list_messages(&caller, conversation_id)
        .await?;

    Ok(Json(summaries.into_iter().map(MessageView::from).collect()))
}
