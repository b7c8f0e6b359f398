//! Pipeline board: item store, views and the transition engine
//!
//! [`Board`] ties one stage registry, one item store and one transition
//! engine together and optionally writes every change through to a
//! [`PersistenceBackend`]. Pages that need the same items share a `Board`
//! by reference instead of keeping their own copies.

pub mod detail;
pub mod drag;
pub mod form;
pub mod store;
pub mod transition;
pub mod view;

pub use detail::{DetailPanel, MoveTarget};
pub use drag::{DragController, DragState, DropIntent};
pub use form::{FormDraft, FormModal, FormSubmission};
pub use store::ItemStore;
pub use transition::{BoardEvent, Transition, TransitionEngine, TransitionSource};
pub use view::{BoardView, Column};

use crate::core::{ItemFields, ItemId, PipelineItem, SearchPattern, StageKey, StageRegistry};
use crate::persistence::{PersistenceBackend, StoredItem};
use anyhow::Result;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Error types for board operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("Stage registry must contain at least one stage")]
    EmptyRegistry,

    #[error("Duplicate stage key: {0}")]
    DuplicateStage(String),

    #[error("Invalid stage: {0}")]
    InvalidStage(String),

    #[error("Unknown stage: {0}")]
    UnknownStage(String),
}

/// A pipeline board instance
pub struct Board<F> {
    name: String,
    store: ItemStore<F>,
    engine: TransitionEngine,
    backend: Option<Arc<dyn PersistenceBackend>>,
}

impl<F: ItemFields> Board<F> {
    /// Create an empty in-memory board
    pub fn new(name: &str, registry: StageRegistry) -> Self {
        Self {
            name: name.to_string(),
            store: ItemStore::new(&registry),
            engine: TransitionEngine::new(registry),
            backend: None,
        }
    }

    /// Open a board backed by `backend`, loading its saved items
    ///
    /// Saved items whose stage is no longer in the registry are moved to the
    /// first stage so the partition stays intact.
    pub async fn open(
        name: &str,
        registry: StageRegistry,
        backend: Arc<dyn PersistenceBackend>,
    ) -> Result<Self> {
        let stored = backend.load_items(name).await?;
        let mut items = Vec::with_capacity(stored.len());
        let mut repaired = Vec::new();

        for record in stored {
            let mut item: PipelineItem<F> = record.into_item()?;
            if !registry.contains(item.stage.as_str()) {
                warn!(
                    "Board '{}': {} '{}' had unknown stage '{}', moved to '{}'",
                    name,
                    F::KIND,
                    item.fields.title(),
                    item.stage,
                    registry.first().key
                );
                item.stage = registry.first().key.clone();
                repaired.push(StoredItem::from_item(name, &item)?);
            }
            items.push(item);
        }

        for record in &repaired {
            backend.save_item(record).await?;
        }

        info!("Opened board '{}' with {} items", name, items.len());

        Ok(Self {
            name: name.to_string(),
            store: ItemStore::from_items(&registry, items),
            engine: TransitionEngine::new(registry),
            backend: Some(backend),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn registry(&self) -> &StageRegistry {
        self.engine.registry()
    }

    pub fn store(&self) -> &ItemStore<F> {
        &self.store
    }

    /// Current snapshot of all items
    pub fn list(&self) -> Arc<[PipelineItem<F>]> {
        self.store.list()
    }

    pub fn get(&self, id: ItemId) -> Option<&PipelineItem<F>> {
        self.store.get(id)
    }

    /// Find an item by the leading characters of its id
    pub fn find_by_prefix(&self, prefix: &str) -> Result<&PipelineItem<F>> {
        let prefix = prefix.trim().to_lowercase();
        if prefix.is_empty() {
            anyhow::bail!("Item id must not be empty");
        }

        let matches: Vec<&PipelineItem<F>> = self
            .store
            .iter()
            .filter(|item| item.id.to_string().starts_with(&prefix))
            .collect();

        match matches.as_slice() {
            [item] => Ok(*item),
            [] => anyhow::bail!("No {} matches id '{}'", F::KIND, prefix),
            _ => anyhow::bail!("Id '{}' matches {} items, use a longer prefix", prefix, matches.len()),
        }
    }

    /// Add an event handler
    pub fn add_event_handler<H>(&mut self, handler: H)
    where
        H: Fn(&BoardEvent) + Send + Sync + 'static,
    {
        self.engine.add_event_handler(handler);
    }

    /// Columns for rendering, optionally filtered by a search pattern
    pub fn view<'a>(&'a self, items: &'a [PipelineItem<F>], search: Option<&SearchPattern>) -> BoardView<'a, F> {
        BoardView::build_filtered(self.registry(), items, search)
    }

    /// Detail panel for a selected item
    pub fn detail(&self, id: Option<ItemId>) -> DetailPanel<'_, F> {
        DetailPanel::new(self.registry(), id.and_then(|id| self.store.get(id)))
    }

    /// Load the demo records into a board that never had them
    ///
    /// With a backend the board is seeded at most once, so a board emptied by
    /// explicit removals stays empty when it is opened again.
    pub async fn seed_demo(&mut self) -> Result<usize> {
        let backend = self.backend.clone();
        if let Some(backend) = &backend {
            if backend.is_seeded(&self.name).await? {
                return Ok(0);
            }
        }

        let added = if self.store.is_empty() {
            self.insert_demo().await?
        } else {
            0
        };

        if let Some(backend) = &backend {
            backend.mark_seeded(&self.name).await?;
        }
        Ok(added)
    }

    async fn insert_demo(&mut self) -> Result<usize> {
        let previous = self.store.clone();
        let mut added = Vec::new();

        for (stage, fields) in F::demo() {
            if !self.registry().contains(stage) {
                debug!("Skipping demo {} in unknown stage '{}'", F::KIND, stage);
                continue;
            }
            if let Some(id) = self.store.add_in_stage(fields, StageKey::new(stage)) {
                added.push(id);
            }
        }

        self.commit(previous, &added).await?;
        Ok(added.len())
    }

    /// Create an item in the first stage
    ///
    /// Returns `None` when the required field is blank.
    pub async fn add(&mut self, fields: F) -> Result<Option<ItemId>> {
        let previous = self.store.clone();
        let Some(id) = self.store.add(fields) else {
            return Ok(None);
        };
        self.commit(previous, &[id]).await?;

        let stage = self.registry().first().key.clone();
        info!("Added {} {} to '{}'", F::KIND, id.short(), self.name);
        self.engine.emit(BoardEvent::ItemAdded { id, stage });

        Ok(Some(id))
    }

    /// Move an item to another stage
    ///
    /// The move is announced only once the backend has accepted it.
    pub async fn move_item(&mut self, id: ItemId, target: &str, source: TransitionSource) -> Result<Transition<F>> {
        let previous = self.store.clone();
        let transition = self.engine.apply(&mut self.store, id, target)?;
        if let Transition::Moved { .. } = transition {
            self.commit(previous, &[id]).await?;
        }
        self.engine.announce(&transition, source);
        Ok(transition)
    }

    /// Apply a completed drag gesture
    pub async fn drop_item(&mut self, intent: DropIntent) -> Result<Transition<F>> {
        self.move_item(intent.item, intent.stage.as_str(), TransitionSource::Drag).await
    }

    /// Apply a detail-panel "move to" control
    pub async fn apply_move(&mut self, item: ItemId, stage: &StageKey) -> Result<Transition<F>> {
        self.move_item(item, stage.as_str(), TransitionSource::Button).await
    }

    /// Replace an item's fields; `false` when unknown or the required field is blank
    pub async fn update(&mut self, id: ItemId, fields: F) -> Result<bool> {
        let previous = self.store.clone();
        if self.store.update(id, fields).is_none() {
            return Ok(false);
        }
        self.commit(previous, &[id]).await?;

        self.engine.emit(BoardEvent::ItemUpdated { id });
        Ok(true)
    }

    /// Apply a confirmed form
    pub async fn submit(&mut self, submission: FormSubmission<F, ItemId>) -> Result<Option<ItemId>> {
        match submission {
            FormSubmission::Create(fields) => self.add(fields).await,
            FormSubmission::Edit(id, fields) => Ok(self.update(id, fields).await?.then_some(id)),
        }
    }

    /// Delete an item; `false` when it was not there
    pub async fn remove(&mut self, id: ItemId) -> Result<bool> {
        let previous = self.store.clone();
        if !self.store.remove(id) {
            return Ok(false);
        }

        if let Some(backend) = &self.backend {
            if let Err(err) = backend.delete_item(&self.name, id).await {
                warn!("Board '{}': delete of {} failed, item kept", self.name, id.short());
                self.store = previous;
                return Err(err);
            }
        }

        info!("Removed {} {} from '{}'", F::KIND, id.short(), self.name);
        self.engine.emit(BoardEvent::ItemRemoved { id });
        Ok(true)
    }

    /// Save `ids`, restoring the `previous` snapshot if the backend fails
    async fn commit(&mut self, previous: ItemStore<F>, ids: &[ItemId]) -> Result<()> {
        for id in ids {
            if let Err(err) = self.persist(*id).await {
                warn!("Board '{}': save of {} failed, change rolled back", self.name, id.short());
                self.store = previous;
                return Err(err);
            }
        }
        Ok(())
    }

    async fn persist(&self, id: ItemId) -> Result<()> {
        let (Some(backend), Some(item)) = (&self.backend, self.store.get(id)) else {
            return Ok(());
        };
        backend.save_item(&StoredItem::from_item(&self.name, item)?).await
    }
}
