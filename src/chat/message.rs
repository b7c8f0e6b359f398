//! Chat message and error types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for chat operations
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Chat endpoint not configured: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Chat endpoint returned status {0}")]
    Status(u16),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Invalid chat response: {0}")]
    Decode(String),

    #[error("A chat request is already in flight")]
    Busy,
}

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One entry of the conversation history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// Request body sent to the endpoint
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    /// Conversation, oldest first
    pub messages: &'a [ChatMessage],
}

/// Response body returned by the endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_format() {
        let messages = vec![
            ChatMessage::user("Was bedeutet CPAP?"),
            ChatMessage::assistant("Continuous Positive Airway Pressure."),
        ];
        let body = serde_json::to_value(ChatRequest { messages: &messages }).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "messages": [
                    { "role": "user", "content": "Was bedeutet CPAP?" },
                    { "role": "assistant", "content": "Continuous Positive Airway Pressure." }
                ]
            })
        );
    }

    #[test]
    fn test_reply_ignores_extra_fields() {
        let reply: ChatReply = serde_json::from_str(r#"{"content":"Hallo","model":"x"}"#).unwrap();
        assert_eq!(reply.content, "Hallo");
    }
}
