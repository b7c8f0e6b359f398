//! Chat client for the external assistant endpoint

pub mod client;
pub mod http_client;
pub mod message;
pub mod session;

use async_trait::async_trait;
pub use client::{ChatClientConfig, CHAT_URL_ENV};
pub use http_client::HttpChatClient;
pub use message::{ChatError, ChatMessage, ChatReply, ChatRequest, Role};
pub use session::{ChatSession, ChatSessionConfig, Notification};
use std::sync::Arc;

/// Trait for chat completion - allows for different implementations
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send the conversation (oldest first) and return the assistant reply
    async fn complete(&self, messages: &[ChatMessage]) -> Result<ChatReply, ChatError>;
}

#[async_trait]
impl<T: ChatBackend + ?Sized> ChatBackend for Arc<T> {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<ChatReply, ChatError> {
        (**self).complete(messages).await
    }
}
