//! Chat session - conversation history plus the one-request-at-a-time guard

use crate::chat::{ChatBackend, ChatError, ChatMessage};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Session settings
#[derive(Debug, Clone, Default)]
pub struct ChatSessionConfig {
    /// Send only the most recent N messages; `None` sends the full history.
    /// A window of 0 is treated as 1 so the new message always goes out.
    pub history_window: Option<usize>,

    /// Prepended to every request, never stored in the history
    pub system_prompt: Option<String>,
}

impl ChatSessionConfig {
    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = Some(window.max(1));
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }
}

/// Transient notice shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A request failed; the conversation is left as it was
    Failure(String),
}

#[derive(Debug, Default)]
struct SessionState {
    history: Vec<ChatMessage>,
    notifications: Vec<Notification>,
}

/// Clears the in-flight flag even if the send future is dropped
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A conversation with one chat backend
pub struct ChatSession<B> {
    backend: B,
    config: ChatSessionConfig,
    state: Mutex<SessionState>,
    in_flight: AtomicBool,
}

impl<B: ChatBackend> ChatSession<B> {
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, ChatSessionConfig::default())
    }

    pub fn with_config(backend: B, config: ChatSessionConfig) -> Self {
        Self {
            backend,
            config,
            state: Mutex::new(SessionState::default()),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Whether a request is outstanding (the send control is disabled)
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Full local history, oldest first
    pub async fn history(&self) -> Vec<ChatMessage> {
        self.state.lock().await.history.clone()
    }

    /// Drain pending notifications
    pub async fn take_notifications(&self) -> Vec<Notification> {
        std::mem::take(&mut self.state.lock().await.notifications)
    }

    /// Send a user message and wait for the reply
    ///
    /// Blank input is ignored (`Ok(None)`). The user entry is appended before
    /// the request goes out; on success exactly one assistant entry follows.
    /// On failure no assistant entry is added and one
    /// [`Notification::Failure`] is recorded.
    ///
    /// # Errors
    /// `ChatError::Busy` while another request is outstanding (nothing is
    /// recorded), otherwise whatever the backend returned.
    pub async fn send(&self, text: &str) -> Result<Option<ChatMessage>, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Chat send refused, request in flight");
            return Err(ChatError::Busy);
        }
        let _guard = InFlight(&self.in_flight);

        let outgoing = {
            let mut state = self.state.lock().await;
            state.history.push(ChatMessage::user(text));
            self.outgoing(&state.history)
        };

        let result = self.backend.complete(&outgoing).await;

        let mut state = self.state.lock().await;
        match result {
            Ok(reply) => {
                let message = ChatMessage::assistant(reply.content);
                state.history.push(message.clone());
                Ok(Some(message))
            }
            Err(err) => {
                warn!("Chat request failed: {}", err);
                state.notifications.push(Notification::Failure(err.to_string()));
                Err(err)
            }
        }
    }

    fn outgoing(&self, history: &[ChatMessage]) -> Vec<ChatMessage> {
        let start = self
            .config
            .history_window
            .map_or(0, |window| history.len().saturating_sub(window.max(1)));

        let mut messages = Vec::with_capacity(history.len() - start + 1);
        if let Some(prompt) = &self.config.system_prompt {
            messages.push(ChatMessage::system(prompt.clone()));
        }
        messages.extend_from_slice(&history[start..]);
        messages
    }
}
