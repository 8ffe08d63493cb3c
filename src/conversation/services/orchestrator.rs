//! Chat-turn orchestration and conversation listings.

use crate::conversation::{
    domain::{
        Conversation, ConversationId, ConversationSummary, ConversationTitle, HistoryEntry, Message,
        MessageSummary, MessageText, NewConversation, NewMessage, Role, TurnRequest, TurnResult,
        UserId, sort_chronologically, sort_most_recent_first,
    },
    error::{ChatError, ChatResult, ensure_same_user},
    ports::{AgentClient, AgentError, ConversationStore, MessageStore},
};
use mockable::{Clock, DefaultClock};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Orchestrator over trait objects, as wired by the HTTP server.
pub type SharedOrchestrator =
    ChatOrchestrator<dyn ConversationStore, dyn MessageStore, dyn AgentClient, DefaultClock>;

/// Sequences a chat turn across the stores and the agent.
///
/// A successful turn writes exactly two messages (user, then assistant).
/// Validation, authorization and not-found failures write nothing. An agent
/// failure leaves the user message in place and writes no assistant message.
pub struct ChatOrchestrator<C, M, A, K>
where
    C: ConversationStore + ?Sized,
    M: MessageStore + ?Sized,
    A: AgentClient + ?Sized,
    K: Clock + Send + Sync,
{
    conversations: Arc<C>,
    messages: Arc<M>,
    agent: Arc<A>,
    clock: Arc<K>,
}

impl<C, M, A, K> Clone for ChatOrchestrator<C, M, A, K>
where
    C: ConversationStore + ?Sized,
    M: MessageStore + ?Sized,
    A: AgentClient + ?Sized,
    K: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            conversations: Arc::clone(&self.conversations),
            messages: Arc::clone(&self.messages),
            agent: Arc::clone(&self.agent),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C, M, A, K> ChatOrchestrator<C, M, A, K>
where
    C: ConversationStore + ?Sized,
    M: MessageStore + ?Sized,
    A: AgentClient + ?Sized,
    K: Clock + Send + Sync,
{
    /// Creates a new orchestrator.
    #[must_use]
    pub const fn new(
        conversations: Arc<C>,
        messages: Arc<M>,
        agent: Arc<A>,
        clock: Arc<K>,
    ) -> Self {
        Self {
            conversations,
            messages,
            agent,
            clock,
        }
    }

    /// Processes one user message end to end.
    ///
    /// Opens a new conversation when the request names none, titled after
    /// the message. The agent receives the full ordered history, ending with
    /// the message just stored.
    ///
    /// # Errors
    ///
    /// - [`ChatError::Validation`] when the text is empty or too long.
    /// - [`ChatError::NotFound`] when the named conversation does not exist
    ///   or is owned by another user.
    /// - [`ChatError::Configuration`] or [`ChatError::Agent`] when the agent
    ///   fails; the user message stays persisted.
    /// - [`ChatError::Store`] when persistence fails.
    pub async fn handle_turn(&self, request: TurnRequest) -> ChatResult<TurnResult> {
        let text = MessageText::parse(request.text())?;
        let caller = request.caller();

        let conversation = match request.conversation_id() {
            Some(id) => self.owned_conversation(caller, id).await?,
            None => self.open_conversation(caller, &text).await?,
        };
        let conversation_id = conversation.id();

        let user_message = self
            .messages
            .append(NewMessage::new(
                conversation_id,
                Role::User,
                text.as_str(),
                &*self.clock,
            ))
            .await?;

        let history = self.history(conversation_id).await?;
        debug!(
            conversation_id = %conversation_id,
            entries = history.len(),
            "invoking agent"
        );

        let reply = self
            .agent
            .process_message(text.as_str(), &history, caller)
            .await
            .map_err(|err| {
                warn!(
                    conversation_id = %conversation_id,
                    user_message_id = %user_message.id(),
                    error = %err,
                    "agent failed; user message kept without reply"
                );
                match err {
                    AgentError::Configuration(message) => ChatError::Configuration(message),
                    AgentError::Invocation(message) => ChatError::Agent(message),
                }
            })?;

        let (response_text, tool_calls, tool_results) = reply.into_parts();
        let assistant_message = self
            .messages
            .append(NewMessage::new(
                conversation_id,
                Role::Assistant,
                response_text.as_str(),
                &*self.clock,
            ))
            .await?;

        info!(
            conversation_id = %conversation_id,
            tool_calls = tool_calls.len(),
            "chat turn completed"
        );
        Ok(TurnResult {
            conversation_id,
            user_message_id: user_message.id(),
            assistant_message_id: assistant_message.id(),
            response_text,
            tool_calls,
            tool_results,
        })
    }

    /// Lists `owner`'s conversations, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Authorization`] when `caller` is not `owner`, or
    /// [`ChatError::Store`] when the lookup fails.
    pub async fn list_conversations(
        &self,
        caller: &UserId,
        owner: &UserId,
    ) -> ChatResult<Vec<ConversationSummary>> {
        ensure_same_user(caller, owner)?;

        let mut conversations = self.conversations.list_by_owner(owner).await?;
        sort_most_recent_first(&mut conversations);
        Ok(conversations.iter().map(Conversation::summary).collect())
    }

    /// Lists the messages of one of `caller`'s conversations, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::NotFound`] when the conversation does not exist
    /// or belongs to another user, or [`ChatError::Store`] when the lookup
    /// fails.
    pub async fn list_messages(
        &self,
        caller: &UserId,
        conversation_id: ConversationId,
    ) -> ChatResult<Vec<MessageSummary>> {
        let conversation = self.owned_conversation(caller, conversation_id).await?;

        let mut messages = self
            .messages
            .list_by_conversation(conversation.id())
            .await?;
        sort_chronologically(&mut messages);
        Ok(messages.iter().map(Message::summary).collect())
    }

    async fn owned_conversation(
        &self,
        caller: &UserId,
        id: ConversationId,
    ) -> ChatResult<Conversation> {
        match self.conversations.find_by_id(id).await? {
            Some(conversation) if conversation.is_owned_by(caller) => Ok(conversation),
            _ => Err(ChatError::NotFound(id)),
        }
    }

    async fn open_conversation(
        &self,
        caller: &UserId,
        text: &MessageText,
    ) -> ChatResult<Conversation> {
        let title = ConversationTitle::from_first_message(text);
        let conversation = self
            .conversations
            .create(NewConversation::new(caller.clone(), title, &*self.clock))
            .await?;
        info!(
            conversation_id = %conversation.id(),
            user_id = %caller,
            "opened conversation"
        );
        Ok(conversation)
    }

    async fn history(&self, conversation_id: ConversationId) -> ChatResult<Vec<HistoryEntry>> {
        let mut messages = self.messages.list_by_conversation(conversation_id).await?;
        sort_chronologically(&mut messages);
        Ok(messages.iter().map(Message::to_history_entry).collect())
    }
}
