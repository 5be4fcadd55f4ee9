//! Extraction of answer text, citation links and conversation id
//!
//! The response is loosely structured JSON. `conversation.content` is a list of
//! turns: index 0 is the user's message, index 1 the assistant's reply. The
//! reply arrives either as a single message object or as a list of messages,
//! and is normalized into [`AssistantTurn`] before anything reads it.
//!
//! All extractors are total: unrecognized shapes degrade to `None` or an empty
//! list and are only logged.

use crate::types::StructuredLink;
use serde_json::Value;
use std::collections::HashSet;

/// The two shapes an assistant turn arrives in
#[derive(Debug, Clone, Copy)]
pub enum AssistantShape<'a> {
    /// A bare message object
    Message(&'a Value),
    /// A list of messages; only the first one is read
    Messages(&'a [Value]),
}

/// Assistant turn after normalization
#[derive(Debug, Clone, Copy, Default)]
pub struct AssistantTurn<'a> {
    pub content: Option<&'a str>,
    pub actions: &'a [Value],
}

impl<'a> AssistantShape<'a> {
    /// Locate the assistant turn (`conversation.content[1]`)
    pub fn locate(response: &'a Value) -> Option<Self> {
        let turns = response.get("conversation")?.get("content")?.as_array()?;
        match turns.get(1)? {
            Value::Array(messages) => Some(Self::Messages(messages)),
            message => Some(Self::Message(message)),
        }
    }

    pub fn normalize(self) -> AssistantTurn<'a> {
        match self {
            // Actions are only carried by the list shape
            Self::Message(message) => AssistantTurn {
                content: non_empty_str(message.get("content")),
                actions: &[],
            },
            Self::Messages(messages) => match messages.first() {
                Some(first) => AssistantTurn {
                    content: non_empty_str(first.get("content")),
                    actions: first
                        .get("actions")
                        .and_then(Value::as_array)
                        .map(Vec::as_slice)
                        .unwrap_or_default(),
                },
                None => AssistantTurn::default(),
            },
        }
    }
}

fn assistant_turn(response: &Value) -> Option<AssistantTurn<'_>> {
    AssistantShape::locate(response).map(AssistantShape::normalize)
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Answer text of the assistant turn, or `None` if the shape is not recognized
pub fn extract_answer(response: &Value) -> Option<String> {
    let answer = assistant_turn(response).and_then(|turn| turn.content);
    if answer.is_none() {
        tracing::debug!("no assistant answer found in response");
    }
    answer.map(str::to_string)
}

/// Resource links cited by the assistant's actions, deduplicated by URI
///
/// The first occurrence of a URI wins across the whole action list; action
/// order and order within each output are preserved.
pub fn extract_structured_links(response: &Value) -> Vec<StructuredLink> {
    let Some(turn) = assistant_turn(response) else {
        tracing::debug!("no assistant turn, no structured links");
        return Vec::new();
    };

    let mut seen_uris: HashSet<&str> = HashSet::new();
    let mut links = Vec::new();

    for action in turn.actions {
        let Some(output) = action.get("output").and_then(Value::as_array) else {
            continue;
        };

        for item in output {
            if item.get("type").and_then(Value::as_str) != Some("resource") {
                continue;
            }
            let Some(resource) = item.get("resource").filter(|r| !r.is_null()) else {
                continue;
            };
            let (Some(uri), Some(text)) = (
                non_empty_str(resource.get("uri")),
                non_empty_str(resource.get("text")),
            ) else {
                continue;
            };
            if seen_uris.insert(uri) {
                links.push(StructuredLink::new(uri, text));
            }
        }
    }

    tracing::debug!(count = links.len(), "extracted structured links");
    links
}

/// External conversation identifier (`conversation.sId`)
pub fn extract_conversation_id(response: &Value) -> Option<String> {
    let id = non_empty_str(response.get("conversation").and_then(|c| c.get("sId")));
    id.map(str::to_string)
}
