//! Persistence layer for board items

#[cfg(feature = "sqlite")]
pub mod store;

#[cfg(feature = "sqlite")]
pub use store::SqliteItemStore;

use crate::core::{ItemFields, ItemId, PipelineItem, StageKey};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Item as written to a backend, with fields kept as JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredItem {
    /// Board the item belongs to
    pub board: String,

    pub id: ItemId,

    pub stage: StageKey,

    /// Instance-specific fields
    pub fields: serde_json::Value,

    pub created_at: DateTime<Utc>,
}

impl StoredItem {
    pub fn from_item<F: ItemFields>(board: &str, item: &PipelineItem<F>) -> Result<Self> {
        Ok(Self {
            board: board.to_string(),
            id: item.id,
            stage: item.stage.clone(),
            fields: serde_json::to_value(&item.fields)
                .with_context(|| format!("Failed to encode {} {}", F::KIND, item.id))?,
            created_at: item.created_at,
        })
    }

    pub fn into_item<F: ItemFields>(self) -> Result<PipelineItem<F>> {
        let fields = serde_json::from_value(self.fields)
            .with_context(|| format!("Failed to decode {} {}", F::KIND, self.id))?;
        Ok(PipelineItem {
            id: self.id,
            stage: self.stage,
            fields,
            created_at: self.created_at,
        })
    }
}

/// Trait for persistence backends
#[async_trait::async_trait]
pub trait PersistenceBackend: Send + Sync {
    /// Insert or replace an item
    async fn save_item(&self, item: &StoredItem) -> Result<()>;

    /// Delete an item; deleting an absent item is not an error
    async fn delete_item(&self, board: &str, id: ItemId) -> Result<()>;

    /// All items of a board, oldest first
    async fn load_items(&self, board: &str) -> Result<Vec<StoredItem>>;

    /// All board names with at least one item
    async fn list_boards(&self) -> Result<Vec<String>>;

    /// Whether demo records were ever loaded into a board
    async fn is_seeded(&self, board: &str) -> Result<bool>;

    /// Remember that a board has had its demo records
    async fn mark_seeded(&self, board: &str) -> Result<()>;
}

/// In-memory persistence (for testing or ephemeral use)
pub struct InMemoryPersistence {
    boards: tokio::sync::RwLock<HashMap<String, Vec<StoredItem>>>,
    seeded: tokio::sync::RwLock<HashSet<String>>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self {
            boards: tokio::sync::RwLock::new(HashMap::new()),
            seeded: tokio::sync::RwLock::new(HashSet::new()),
        }
    }
}

impl Default for InMemoryPersistence {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl PersistenceBackend for InMemoryPersistence {
    async fn save_item(&self, item: &StoredItem) -> Result<()> {
        let mut boards = self.boards.write().await;
        let items = boards.entry(item.board.clone()).or_default();

        match items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => *existing = item.clone(),
            None => items.push(item.clone()),
        }

        Ok(())
    }

    async fn delete_item(&self, board: &str, id: ItemId) -> Result<()> {
        let mut boards = self.boards.write().await;
        if let Some(items) = boards.get_mut(board) {
            items.retain(|item| item.id != id);
            if items.is_empty() {
                boards.remove(board);
            }
        }
        Ok(())
    }

    async fn load_items(&self, board: &str) -> Result<Vec<StoredItem>> {
        let boards = self.boards.read().await;
        let mut items = boards.get(board).cloned().unwrap_or_default();
        items.sort_by_key(|item| item.created_at);
        Ok(items)
    }

    async fn list_boards(&self) -> Result<Vec<String>> {
        let boards = self.boards.read().await;
        let mut names: Vec<String> = boards.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn is_seeded(&self, board: &str) -> Result<bool> {
        Ok(self.seeded.read().await.contains(board))
    }

    async fn mark_seeded(&self, board: &str) -> Result<()> {
        self.seeded.write().await.insert(board.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::presets::GrantFields;

    fn stored(board: &str, name: &str) -> StoredItem {
        let item = PipelineItem::new(GrantFields::new(name, 1_000), StageKey::new("research"));
        StoredItem::from_item(board, &item).unwrap()
    }

    #[tokio::test]
    async fn test_in_memory_save_and_load() {
        let store = InMemoryPersistence::new();
        let item = stored("grants", "Pro Juventute");
        store.save_item(&item).await.unwrap();

        let loaded = store.load_items("grants").await.unwrap();
        assert_eq!(loaded, vec![item]);
        assert!(store.load_items("newsletter").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_in_memory_save_replaces() {
        let store = InMemoryPersistence::new();
        let mut item = stored("grants", "Pro Juventute");
        store.save_item(&item).await.unwrap();

        item.stage = StageKey::new("approved");
        store.save_item(&item).await.unwrap();

        let loaded = store.load_items("grants").await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].stage, "approved");
    }

    #[tokio::test]
    async fn test_in_memory_delete() {
        let store = InMemoryPersistence::new();
        let item = stored("grants", "Pro Juventute");
        store.save_item(&item).await.unwrap();
        store.save_item(&stored("newsletter", "Winter")).await.unwrap();

        store.delete_item("grants", item.id).await.unwrap();
        store.delete_item("grants", item.id).await.unwrap();

        assert_eq!(store.list_boards().await.unwrap(), vec!["newsletter".to_string()]);
    }

    #[test]
    fn test_stored_item_round_trip_keeps_fields() {
        let item = PipelineItem::new(GrantFields::new("Pro Juventute", 15_000), StageKey::new("contacted"));
        let stored = StoredItem::from_item("grants", &item).unwrap();
        assert_eq!(stored.fields["foundation"], "Pro Juventute");

        let back: PipelineItem<GrantFields> = stored.into_item().unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_decode_wrong_kind_fails() {
        let stored = StoredItem {
            board: "grants".to_string(),
            id: ItemId::generate(),
            stage: StageKey::new("research"),
            fields: serde_json::json!({ "amount": "not a number" }),
            created_at: Utc::now(),
        };
        assert!(stored.into_item::<GrantFields>().is_err());
    }

    #[tokio::test]
    async fn test_in_memory_seeded_marker() {
        let store = InMemoryPersistence::new();
        assert!(!store.is_seeded("grants").await.unwrap());

        store.mark_seeded("grants").await.unwrap();
        store.mark_seeded("grants").await.unwrap();
        assert!(store.is_seeded("grants").await.unwrap());
        assert!(!store.is_seeded("newsletter").await.unwrap());
    }
}
