//! Detail panel - one item's full record plus "move to" controls

use crate::core::{ItemFields, ItemId, PipelineItem, Stage, StageRegistry};

/// A "move to stage X" control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveTarget<'a> {
    pub item: ItemId,
    pub stage: &'a Stage,
}

/// Detail view of the selected item, if any
#[derive(Debug)]
pub struct DetailPanel<'a, F> {
    registry: &'a StageRegistry,
    item: Option<&'a PipelineItem<F>>,
}

impl<'a, F: ItemFields> DetailPanel<'a, F> {
    pub fn new(registry: &'a StageRegistry, item: Option<&'a PipelineItem<F>>) -> Self {
        Self { registry, item }
    }

    pub fn item(&self) -> Option<&'a PipelineItem<F>> {
        self.item
    }

    /// Stage the selected item currently sits in
    pub fn current_stage(&self) -> Option<&'a Stage> {
        self.item.and_then(|item| self.registry.get(item.stage.as_str()))
    }

    /// Label/value rows of the selected item
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        self.item.map(|item| item.fields.detail_rows()).unwrap_or_default()
    }

    /// One control per stage other than the current one, in registry order
    pub fn move_targets(&self) -> Vec<MoveTarget<'a>> {
        let Some(item) = self.item else {
            return Vec::new();
        };

        self.registry
            .iter()
            .filter(|stage| stage.key != item.stage)
            .map(|stage| MoveTarget { item: item.id, stage })
            .collect()
    }
}
