//! SQLite-based item store

use crate::core::{ItemId, StageKey};
use crate::persistence::{PersistenceBackend, StoredItem};
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::path::Path;
use std::str::FromStr;

/// SQLite item store
pub struct SqliteItemStore {
    pool: SqlitePool,
}

impl SqliteItemStore {
    /// Open (creating if needed) a database file
    pub async fn new(db_path: &Path) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open database: {}", db_path.display()))?;

        let store = Self { pool };
        store.init().await?;

        Ok(store)
    }

    /// Private in-memory database, used by tests and `--no-persist` runs
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

        // Each connection to :memory: is its own database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .context("Failed to open in-memory database")?;

        let store = Self { pool };
        store.init().await?;

        Ok(store)
    }

    /// Create store with default path
    pub async fn with_default_path() -> Result<Self> {
        let db_path = Self::default_path();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        Self::new(&db_path).await
    }

    /// `<data_local_dir>/pipeboard/boards.db`
    pub fn default_path() -> std::path::PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| std::path::PathBuf::from("."))
            .join("pipeboard")
            .join("boards.db")
    }

    /// Initialize database schema
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS items (
                board TEXT NOT NULL,
                id TEXT NOT NULL,
                stage TEXT NOT NULL,
                fields TEXT NOT NULL,
                created_at TEXT NOT NULL,
                PRIMARY KEY (board, id)
            );

            CREATE INDEX IF NOT EXISTS idx_items_board ON items(board, created_at);

            CREATE TABLE IF NOT EXISTS seeded_boards (
                board TEXT PRIMARY KEY,
                seeded_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to initialize database schema")?;

        Ok(())
    }

    /// Convert DateTime<Utc> to NaiveDateTime for SQLite
    fn to_naive(dt: DateTime<Utc>) -> NaiveDateTime {
        dt.naive_utc()
    }

    /// Convert NaiveDateTime to DateTime<Utc>
    fn from_naive(dt: NaiveDateTime) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(dt, Utc)
    }

    fn row_to_item(row: &sqlx::sqlite::SqliteRow) -> Result<StoredItem> {
        let id: String = row.get("id");
        let fields: String = row.get("fields");
        Ok(StoredItem {
            board: row.get("board"),
            id: ItemId::parse(&id).with_context(|| format!("Invalid item id in database: {}", id))?,
            stage: StageKey::new(row.get::<String, _>("stage")),
            fields: serde_json::from_str(&fields)
                .with_context(|| format!("Invalid fields JSON for item {}", id))?,
            created_at: Self::from_naive(row.get("created_at")),
        })
    }
}

#[async_trait::async_trait]
impl PersistenceBackend for SqliteItemStore {
    async fn save_item(&self, item: &StoredItem) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO items (board, id, stage, fields, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&item.board)
        .bind(item.id.to_string())
        .bind(item.stage.as_str())
        .bind(item.fields.to_string())
        .bind(Self::to_naive(item.created_at))
        .execute(&self.pool)
        .await
        .context("Failed to save item")?;

        Ok(())
    }

    async fn delete_item(&self, board: &str, id: ItemId) -> Result<()> {
        sqlx::query("DELETE FROM items WHERE board = ?1 AND id = ?2")
            .bind(board)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to delete item")?;

        Ok(())
    }

    async fn load_items(&self, board: &str) -> Result<Vec<StoredItem>> {
        let rows = sqlx::query(
            r#"
            SELECT board, id, stage, fields, created_at
            FROM items
            WHERE board = ?1
            ORDER BY created_at ASC
            "#,
        )
        .bind(board)
        .fetch_all(&self.pool)
        .await
        .context("Failed to load items")?;

        rows.iter().map(Self::row_to_item).collect()
    }

    async fn list_boards(&self) -> Result<Vec<String>> {
        let rows = sqlx::query(
            r#"
            SELECT DISTINCT board
            FROM items
            ORDER BY board ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list boards")?;

        Ok(rows.iter().map(|row| row.get("board")).collect())
    }

    async fn is_seeded(&self, board: &str) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM seeded_boards WHERE board = ?1")
            .bind(board)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to read seeded marker")?;

        Ok(row.is_some())
    }

    async fn mark_seeded(&self, board: &str) -> Result<()> {
        sqlx::query("INSERT OR IGNORE INTO seeded_boards (board, seeded_at) VALUES (?1, ?2)")
            .bind(board)
            .bind(Self::to_naive(Utc::now()))
            .execute(&self.pool)
            .await
            .context("Failed to save seeded marker")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::presets::GrantFields;
    use crate::core::PipelineItem;

    fn stored(board: &str, name: &str) -> StoredItem {
        let item = PipelineItem::new(GrantFields::new(name, 1_000), StageKey::new("research"));
        StoredItem::from_item(board, &item).unwrap()
    }

    #[tokio::test]
    async fn test_sqlite_store() {
        let store = SqliteItemStore::in_memory().await.unwrap();

        let item = stored("grants", "Pro Juventute");
        store.save_item(&item).await.unwrap();

        let loaded = store.load_items("grants").await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, item.id);
        assert_eq!(loaded[0].fields, item.fields);
        assert_eq!(loaded[0].stage, "research");
    }

    #[tokio::test]
    async fn test_sqlite_replace_and_delete() {
        let store = SqliteItemStore::in_memory().await.unwrap();

        let mut item = stored("grants", "Pro Juventute");
        store.save_item(&item).await.unwrap();
        item.stage = StageKey::new("approved");
        store.save_item(&item).await.unwrap();

        let loaded = store.load_items("grants").await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].stage, "approved");

        store.delete_item("grants", item.id).await.unwrap();
        assert!(store.load_items("grants").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sqlite_file_is_created() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("boards.db");

        let store = SqliteItemStore::new(&path).await.unwrap();
        store.save_item(&stored("newsletter", "Winter")).await.unwrap();

        assert!(path.exists());
        assert_eq!(store.list_boards().await.unwrap(), vec!["newsletter".to_string()]);
    }

    #[tokio::test]
    async fn test_sqlite_seeded_marker_survives_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("boards.db");

        {
            let store = SqliteItemStore::new(&path).await.unwrap();
            assert!(!store.is_seeded("grants").await.unwrap());
            store.mark_seeded("grants").await.unwrap();
        }

        let store = SqliteItemStore::new(&path).await.unwrap();
        assert!(store.is_seeded("grants").await.unwrap());
        assert!(store.list_boards().await.unwrap().is_empty());
    }
}
