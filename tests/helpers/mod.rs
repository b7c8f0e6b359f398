//! Test utility functions for pipeboard
#![allow(dead_code)]

use async_trait::async_trait;
use pipeboard::board::{view::check_partition, Board};
use pipeboard::chat::{ChatBackend, ChatError, ChatMessage, ChatReply};
use pipeboard::core::presets::{grant_registry, newsletter_registry};
use pipeboard::core::{GrantFields, ItemFields, ItemId, NewsletterFields};
use pipeboard::persistence::{InMemoryPersistence, PersistenceBackend, StoredItem};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Scripted reply of the mock backend
#[derive(Debug, Clone)]
pub enum MockReply {
    Content(String),
    Status(u16),
}

/// Mock chat backend that returns predefined replies
///
/// Every request is recorded so tests can check what history was sent.
pub struct MockChatBackend {
    replies: Vec<MockReply>,
    index: AtomicUsize,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
    simulate_delay: Option<Duration>,
}

impl MockChatBackend {
    pub fn new(replies: Vec<MockReply>) -> Self {
        Self {
            replies,
            index: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            simulate_delay: None,
        }
    }

    /// Backend that answers every request with `content`
    pub fn answering(content: &str) -> Self {
        Self::new(vec![MockReply::Content(content.to_string())])
    }

    /// Backend that fails every request with `status`
    pub fn failing(status: u16) -> Self {
        Self::new(vec![MockReply::Status(status)])
    }

    /// Add artificial delay to simulate a slow endpoint
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.simulate_delay = Some(delay);
        self
    }

    /// Conversations sent so far, one entry per request
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.index.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatBackend for MockChatBackend {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<ChatReply, ChatError> {
        self.requests.lock().unwrap().push(messages.to_vec());
        let idx = self.index.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.simulate_delay {
            tokio::time::sleep(delay).await;
        }

        // The last scripted reply repeats
        let reply = self
            .replies
            .get(idx)
            .or_else(|| self.replies.last())
            .cloned()
            .ok_or_else(|| ChatError::Http("MockChatBackend: no replies scripted".to_string()))?;

        match reply {
            MockReply::Content(content) => Ok(ChatReply { content }),
            MockReply::Status(status) => Err(ChatError::Status(status)),
        }
    }
}

/// In-memory backend whose writes can be switched off
pub struct FailingBackend {
    inner: InMemoryPersistence,
    fail: AtomicBool,
}

impl FailingBackend {
    pub fn new() -> Self {
        Self {
            inner: InMemoryPersistence::new(),
            fail: AtomicBool::new(false),
        }
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> anyhow::Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("FailingBackend: writes disabled");
        }
        Ok(())
    }
}

#[async_trait]
impl PersistenceBackend for FailingBackend {
    async fn save_item(&self, item: &StoredItem) -> anyhow::Result<()> {
        self.check()?;
        self.inner.save_item(item).await
    }

    async fn delete_item(&self, board: &str, id: ItemId) -> anyhow::Result<()> {
        self.check()?;
        self.inner.delete_item(board, id).await
    }

    async fn load_items(&self, board: &str) -> anyhow::Result<Vec<StoredItem>> {
        self.inner.load_items(board).await
    }

    async fn list_boards(&self) -> anyhow::Result<Vec<String>> {
        self.inner.list_boards().await
    }

    async fn is_seeded(&self, board: &str) -> anyhow::Result<bool> {
        self.inner.is_seeded(board).await
    }

    async fn mark_seeded(&self, board: &str) -> anyhow::Result<()> {
        self.check()?;
        self.inner.mark_seeded(board).await
    }
}

pub fn grant_board() -> Board<GrantFields> {
    Board::new("grants", grant_registry().unwrap())
}

pub fn newsletter_board() -> Board<NewsletterFields> {
    Board::new("newsletter", newsletter_registry().unwrap())
}

/// Ids shown in one column of the board, in display order
pub fn column_ids<F: ItemFields>(board: &Board<F>, stage: &str) -> Vec<ItemId> {
    let items = board.list();
    let view = board.view(&items, None);
    view.column(stage)
        .map(|column| column.items.iter().map(|item| item.id).collect())
        .unwrap_or_default()
}

/// Assert every item sits in exactly one registered column
pub fn assert_partition<F: ItemFields>(board: &Board<F>) {
    let items = board.list();
    check_partition(board.registry(), &items).expect("Partition invariant violated");
}

/// Request captured by the stub server
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub head: String,
    pub body: String,
}

/// One-shot HTTP server answering with `status` and `body`
///
/// Returns the URL to post to and a handle resolving to the request it saw.
pub async fn spawn_stub_server(status: u16, body: &str) -> (String, JoinHandle<CapturedRequest>) {
    spawn_stub_server_with_delay(status, body, Duration::ZERO).await
}

/// Like [`spawn_stub_server`], but waits `delay` before answering
pub async fn spawn_stub_server_with_delay(
    status: u16,
    body: &str,
    delay: Duration,
) -> (String, JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/chat", listener.local_addr().unwrap());
    let body = body.to_string();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;

        tokio::time::sleep(delay).await;

        let response = format!(
            "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;

        request
    });

    (url, handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> CapturedRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.unwrap();
        assert!(n > 0, "Connection closed before headers were complete");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    CapturedRequest {
        head,
        body: String::from_utf8_lossy(&buf[header_end..]).to_string(),
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}
