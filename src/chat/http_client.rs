//! HTTP chat client - POSTs the conversation to a JSON endpoint

use crate::chat::{ChatBackend, ChatClientConfig, ChatError, ChatMessage, ChatReply, ChatRequest};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

/// Client for a chat endpoint speaking `{messages} -> {content}`
#[derive(Debug, Clone)]
pub struct HttpChatClient {
    client: reqwest::Client,

    endpoint: String,

    /// Timeout for the whole request in seconds
    timeout_secs: u64,
}

impl HttpChatClient {
    /// Create a client from config
    ///
    /// # Errors
    /// Returns `ChatError::Config` when no endpoint is set or the HTTP client
    /// cannot be built.
    pub fn new(config: ChatClientConfig) -> Result<Self, ChatError> {
        let endpoint = config
            .endpoint
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ChatError::Config("no endpoint URL given".to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("pipeboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ChatError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn map_error(&self, err: reqwest::Error) -> ChatError {
        if err.is_timeout() {
            ChatError::Timeout(self.timeout_secs)
        } else if err.is_decode() {
            ChatError::Decode(err.to_string())
        } else {
            ChatError::Http(err.to_string())
        }
    }
}

#[async_trait]
impl ChatBackend for HttpChatClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<ChatReply, ChatError> {
        debug!("Posting {} chat messages to {}", messages.len(), self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&ChatRequest { messages })
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                "Chat endpoint returned {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown error")
            );
            return Err(ChatError::Status(status.as_u16()));
        }

        let reply: ChatReply = response.json().await.map_err(|e| self.map_error(e))?;

        debug!("Chat endpoint replied with {} bytes", reply.content.len());

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_endpoint_rejected() {
        let result = HttpChatClient::new(ChatClientConfig::default());
        assert!(matches!(result, Err(ChatError::Config(_))));

        let result = HttpChatClient::new(ChatClientConfig::new().with_endpoint("  ".to_string()));
        assert!(matches!(result, Err(ChatError::Config(_))));
    }

    #[test]
    fn test_endpoint_kept() {
        let client = HttpChatClient::new(
            ChatClientConfig::new().with_endpoint("http://127.0.0.1:9/chat".to_string()),
        )
        .unwrap();
        assert_eq!(client.endpoint(), "http://127.0.0.1:9/chat");
    }
}
