//! Chat client configuration

/// Environment variable holding the chat endpoint URL
pub const CHAT_URL_ENV: &str = "PIPEBOARD_CHAT_URL";

/// Configuration for the chat client
#[derive(Debug, Clone)]
pub struct ChatClientConfig {
    /// URL the conversation is POSTed to
    pub endpoint: Option<String>,

    /// Timeout for requests in seconds
    pub timeout_secs: u64,
}

impl Default for ChatClientConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: 60,
        }
    }
}

impl ChatClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config with the endpoint taken from `PIPEBOARD_CHAT_URL`, if set
    pub fn from_env() -> Self {
        let config = Self::default();
        match std::env::var(CHAT_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => config.with_endpoint(url),
            _ => config,
        }
    }

    pub fn with_endpoint(mut self, endpoint: String) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_client_config_builder() {
        let config = ChatClientConfig::new()
            .with_endpoint("http://localhost:8080/chat".to_string())
            .with_timeout(15);

        assert_eq!(config.endpoint, Some("http://localhost:8080/chat".to_string()));
        assert_eq!(config.timeout_secs, 15);
    }

    #[test]
    fn test_default_timeout() {
        let config = ChatClientConfig::default();
        assert!(config.endpoint.is_none());
        assert_eq!(config.timeout_secs, 60);
    }
}
