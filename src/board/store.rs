//! Item store - the in-memory collection behind one board

use crate::core::{ItemFields, ItemId, PipelineItem, StageKey, StageRegistry};
use std::sync::Arc;
use tracing::debug;

/// In-memory collection of a board's items
///
/// Every mutation builds a new snapshot and replaces the old one wholesale;
/// snapshots handed out by [`ItemStore::list`] never change underneath the
/// caller. The revision counter is bumped on each replace so views can tell
/// when to re-render.
#[derive(Debug, Clone)]
pub struct ItemStore<F> {
    items: Arc<[PipelineItem<F>]>,
    default_stage: StageKey,
    revision: u64,
}

impl<F: ItemFields> ItemStore<F> {
    /// Create an empty store whose new items land in the registry's first stage
    pub fn new(registry: &StageRegistry) -> Self {
        Self {
            items: Arc::from(Vec::new()),
            default_stage: registry.first().key.clone(),
            revision: 0,
        }
    }

    /// Create a store from already existing records (e.g. loaded from persistence)
    pub fn from_items(registry: &StageRegistry, mut items: Vec<PipelineItem<F>>) -> Self {
        items.sort_by_key(|item| item.created_at);
        Self {
            items: Arc::from(items),
            default_stage: registry.first().key.clone(),
            revision: 0,
        }
    }

    /// Current snapshot, in insertion order
    pub fn list(&self) -> Arc<[PipelineItem<F>]> {
        Arc::clone(&self.items)
    }

    pub fn get(&self, id: ItemId) -> Option<&PipelineItem<F>> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PipelineItem<F>> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of snapshot replacements so far
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Items currently in one stage
    pub fn column(&self, stage: &StageKey) -> Vec<&PipelineItem<F>> {
        self.items.iter().filter(|item| &item.stage == stage).collect()
    }

    /// Append a new item in the default stage
    ///
    /// Returns `None` without touching the store when the required field is blank.
    pub fn add(&mut self, fields: F) -> Option<ItemId> {
        if !fields.required_present() {
            debug!("Ignoring {} item with blank required field", F::KIND);
            return None;
        }

        let item = PipelineItem::new(fields, self.default_stage.clone());
        let id = item.id;

        let mut next = self.items.to_vec();
        next.push(item);
        self.replace(next);

        Some(id)
    }

    /// Append an item in an explicit stage
    ///
    /// The caller is responsible for `stage` being a registry key.
    pub(crate) fn add_in_stage(&mut self, fields: F, stage: StageKey) -> Option<ItemId> {
        if !fields.required_present() {
            return None;
        }

        let item = PipelineItem::new(fields, stage);
        let id = item.id;

        let mut next = self.items.to_vec();
        next.push(item);
        self.replace(next);

        Some(id)
    }

    /// Replace an item's stage; no-op when `id` is unknown
    ///
    /// Returns the updated record when the item was found.
    pub fn set_stage(&mut self, id: ItemId, stage: StageKey) -> Option<PipelineItem<F>> {
        let index = self.items.iter().position(|item| item.id == id)?;

        if self.items[index].stage == stage {
            return Some(self.items[index].clone());
        }

        let updated = self.items[index].with_stage(stage);
        let mut next = self.items.to_vec();
        next[index] = updated.clone();
        self.replace(next);

        Some(updated)
    }

    /// Replace an item's fields; no-op when `id` is unknown or the required field is blank
    pub fn update(&mut self, id: ItemId, fields: F) -> Option<PipelineItem<F>> {
        if !fields.required_present() {
            return None;
        }

        let index = self.items.iter().position(|item| item.id == id)?;
        let updated = self.items[index].with_fields(fields);
        let mut next = self.items.to_vec();
        next[index] = updated.clone();
        self.replace(next);

        Some(updated)
    }

    /// Delete an item; no-op when `id` is unknown
    pub fn remove(&mut self, id: ItemId) -> bool {
        if !self.items.iter().any(|item| item.id == id) {
            return false;
        }

        let next: Vec<_> = self.items.iter().filter(|item| item.id != id).cloned().collect();
        self.replace(next);
        true
    }

    fn replace(&mut self, next: Vec<PipelineItem<F>>) {
        self.items = Arc::from(next);
        self.revision += 1;
    }
}
