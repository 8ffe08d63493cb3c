//! Wire types for the Gemini `generateContent` REST API.
//!
//! Only the subset taskchat sends and reads is modelled: text parts on the
//! way in, text and function-call parts on the way out.

use crate::conversation::domain::{HistoryEntry, Role};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Request body of `models/{model}:generateContent`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GenerateContentRequest {
    pub(super) contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) system_instruction: Option<Content>,
}

/// A turn of the dialogue, or the system instruction when `role` is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(super) struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) role: Option<String>,
    #[serde(default)]
    pub(super) parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&str>, text: &str) -> Self {
        Self {
            role: role.map(str::to_owned),
            parts: vec![Part::Text {
                text: text.to_owned(),
            }],
        }
    }
}

/// Part of a content entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub(super) enum Part {
    /// Plain text.
    Text { text: String },
    /// A function the model asks the caller to run.
    FunctionCall {
        #[serde(rename = "functionCall")]
        function_call: FunctionCall,
    },
    /// Anything else the API may emit (inline data, thoughts, ...).
    Other(Value),
}

/// Function call emitted by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(super) struct FunctionCall {
    pub(super) name: String,
    #[serde(default)]
    pub(super) args: Value,
}

/// Response body of `generateContent`.
#[derive(Debug, Deserialize)]
pub(super) struct GenerateContentResponse {
    #[serde(default)]
    pub(super) candidates: Vec<Candidate>,
    pub(super) error: Option<ApiError>,
}

/// One generated candidate.
#[derive(Debug, Deserialize)]
pub(super) struct Candidate {
    pub(super) content: Option<Content>,
}

/// Error object returned by the API.
#[derive(Debug, Deserialize)]
pub(super) struct ApiError {
    pub(super) message: String,
}

/// Maps a taskchat role onto Gemini's dialogue roles.
const fn wire_role(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "model",
    }
}

/// Builds the request for `text` given the ordered `history`.
///
/// The history normally ends with `text` itself; when it does not, `text`
/// is appended as the final user turn.
pub(super) fn build_request(
    system_prompt: &str,
    text: &str,
    history: &[HistoryEntry],
) -> GenerateContentRequest {
    let mut contents: Vec<Content> = history
        .iter()
        .map(|entry| Content::text(Some(wire_role(entry.role)), &entry.content))
        .collect();

    let ends_with_text = history
        .last()
        .is_some_and(|entry| entry.role == Role::User && entry.content == text);
    if !ends_with_text {
        contents.push(Content::text(Some(wire_role(Role::User)), text));
    }

    GenerateContentRequest {
        contents,
        system_instruction: Some(Content::text(None, system_prompt)),
    }
}

/// Text and tool calls extracted from the first candidate.
#[derive(Debug, Default, PartialEq)]
pub(super) struct ExtractedReply {
    pub(super) text: Option<String>,
    pub(super) tool_calls: Vec<Value>,
}

/// Extracts the reply from a response.
///
/// Returns `None` when the response carries no candidate content.
pub(super) fn extract_reply(response: &GenerateContentResponse) -> Option<ExtractedReply> {
    let content = response.candidates.first()?.content.as_ref()?;

    let mut text = String::new();
    let mut tool_calls = Vec::new();
    for part in &content.parts {
        match part {
            Part::Text { text: fragment } => text.push_str(fragment),
            Part::FunctionCall { function_call } => tool_calls.push(json!({
                "tool": function_call.name,
                "parameters": function_call.args,
            })),
            Part::Other(_) => {}
        }
    }

    Some(ExtractedReply {
        text: (!text.is_empty()).then_some(text),
        tool_calls,
    })
}
