//! Inputs and outputs of a single chat turn.

use super::{ConversationId, MessageId, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One inbound user message, as handed to the orchestrator.
///
/// The caller identity has already been authenticated; the text is
/// validated by the orchestrator itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnRequest {
    caller: UserId,
    conversation_id: Option<ConversationId>,
    text: String,
}

impl TurnRequest {
    /// Creates a request that opens a new conversation.
    #[must_use]
    pub fn new(caller: UserId, text: impl Into<String>) -> Self {
        Self {
            caller,
            conversation_id: None,
            text: text.into(),
        }
    }

    /// Targets an existing conversation instead of opening a new one.
    #[must_use]
    pub const fn with_conversation(mut self, conversation_id: ConversationId) -> Self {
        self.conversation_id = Some(conversation_id);
        self
    }

    /// Sets or clears the targeted conversation.
    #[must_use]
    pub const fn with_optional_conversation(
        mut self,
        conversation_id: Option<ConversationId>,
    ) -> Self {
        self.conversation_id = conversation_id;
        self
    }

    /// Returns the authenticated caller.
    #[must_use]
    pub const fn caller(&self) -> &UserId {
        &self.caller
    }

    /// Returns the targeted conversation, if any.
    #[must_use]
    pub const fn conversation_id(&self) -> Option<ConversationId> {
        self.conversation_id
    }

    /// Returns the raw utterance.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// What the agent returned for one message.
///
/// Tool calls and results are opaque JSON values owned by the agent; the
/// orchestrator passes them through without inspection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentReply {
    response: Option<String>,
    #[serde(default)]
    tool_calls: Vec<Value>,
    #[serde(default)]
    tool_results: Vec<Value>,
}

impl AgentReply {
    /// Creates a reply carrying response text.
    #[must_use]
    pub fn text(response: impl Into<String>) -> Self {
        Self {
            response: Some(response.into()),
            ..Self::default()
        }
    }

    /// Creates a reply without response text.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Appends a tool-call record.
    #[must_use]
    pub fn with_tool_call(mut self, call: Value) -> Self {
        self.tool_calls.push(call);
        self
    }

    /// Appends a tool-result record.
    #[must_use]
    pub fn with_tool_result(mut self, result: Value) -> Self {
        self.tool_results.push(result);
        self
    }

    /// Returns the response text, or an empty string when the agent supplied
    /// none.
    #[must_use]
    pub fn response_text(&self) -> &str {
        self.response.as_deref().unwrap_or_default()
    }

    /// Returns the tool-call records.
    #[must_use]
    pub fn tool_calls(&self) -> &[Value] {
        &self.tool_calls
    }

    /// Returns the tool-result records.
    #[must_use]
    pub fn tool_results(&self) -> &[Value] {
        &self.tool_results
    }

    /// Splits the reply into its response text and tool records.
    #[must_use]
    pub fn into_parts(self) -> (String, Vec<Value>, Vec<Value>) {
        (
            self.response.unwrap_or_default(),
            self.tool_calls,
            self.tool_results,
        )
    }
}

/// Outcome of a successful chat turn. Not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnResult {
    /// Conversation the turn was recorded in.
    pub conversation_id: ConversationId,
    /// Identifier of the persisted user message.
    pub user_message_id: MessageId,
    /// Identifier of the persisted assistant message.
    pub assistant_message_id: MessageId,
    /// Text of the assistant reply.
    pub response_text: String,
    /// Tool calls reported by the agent, verbatim.
    pub tool_calls: Vec<Value>,
    /// Tool results reported by the agent, verbatim.
    pub tool_results: Vec<Value>,
}
