//! Assistant conversation types and the `/api/chat` wire format.

use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Identifier of a chat message.
///
/// Allocated from a per-session counter, so ids are unique and sort in
/// insertion order even when two messages are created in the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Typed by the person using the dashboard.
    User,
    /// Produced by the assistant, or synthesized on failure.
    Assistant,
}

/// One entry in the chat log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique, orderable id.
    pub id: MessageId,
    /// Author.
    pub role: Role,
    /// Message body, stored exactly as sent or received.
    pub text: String,
    /// Local time the message was appended.
    pub created_at: DateTime<Local>,
}

impl ChatMessage {
    /// Whether the message was written by the user.
    #[must_use]
    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

/// The dashboard selection attached to an outgoing query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatContext {
    /// Selected region.
    pub region: String,
    /// Selected variable.
    pub variable: String,
    /// Selected item.
    pub item: String,
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequestBody<'a> {
    /// Raw query text as typed.
    pub query: &'a str,
    /// Selection snapshot taken at send time.
    pub context: &'a ChatContext,
}

/// Reply payload of `POST /api/chat`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChatReply {
    /// Assistant answer; absent, null or empty means "no answer".
    #[serde(default)]
    pub response: Option<String>,
}

impl ChatReply {
    /// The answer text, if the server gave a non-empty one.
    #[must_use]
    pub fn answer(&self) -> Option<&str> {
        self.response.as_deref().filter(|text| !text.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let context = ChatContext {
            region: "World".to_string(),
            variable: "GDP".to_string(),
            item: "Total".to_string(),
        };
        let body = ChatRequestBody {
            query: "trend?",
            context: &context,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "query": "trend?",
                "context": {"region": "World", "variable": "GDP", "item": "Total"}
            })
        );
    }

    #[test]
    fn test_reply_answer() {
        let empty: ChatReply = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.answer(), None);

        let null: ChatReply = serde_json::from_str(r#"{"response":null}"#).unwrap();
        assert_eq!(null.answer(), None);

        let blank: ChatReply = serde_json::from_str(r#"{"response":""}"#).unwrap();
        assert_eq!(blank.answer(), None);

        let full: ChatReply = serde_json::from_str(r#"{"response":"Rising."}"#).unwrap();
        assert_eq!(full.answer(), Some("Rising."));
    }

    #[test]
    fn test_message_id_order() {
        assert!(MessageId(2) > MessageId(1));
        assert_eq!(MessageId(7).to_string(), "#7");
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), r#""assistant""#);
    }
}
