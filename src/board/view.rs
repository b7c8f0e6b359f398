//! Board view - items grouped into one column per stage

use crate::board::BoardError;
use crate::core::{ItemFields, PipelineItem, SearchPattern, Stage, StageRegistry};

/// Text shown in a column with no items
pub const EMPTY_COLUMN_PLACEHOLDER: &str = "no items here";

/// One rendered column
#[derive(Debug)]
pub struct Column<'a, F> {
    pub stage: &'a Stage,
    pub items: Vec<&'a PipelineItem<F>>,
}

impl<'a, F> Column<'a, F> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Columns of a board, in registry order
#[derive(Debug)]
pub struct BoardView<'a, F> {
    pub columns: Vec<Column<'a, F>>,
}

impl<'a, F: ItemFields> BoardView<'a, F> {
    /// Group a snapshot by stage
    pub fn build(registry: &'a StageRegistry, items: &'a [PipelineItem<F>]) -> Self {
        Self::build_filtered(registry, items, None)
    }

    /// Group a snapshot by stage, keeping only items matching `search`
    pub fn build_filtered(
        registry: &'a StageRegistry,
        items: &'a [PipelineItem<F>],
        search: Option<&SearchPattern>,
    ) -> Self {
        let columns = registry
            .iter()
            .map(|stage| Column {
                stage,
                items: items
                    .iter()
                    .filter(|item| item.stage == stage.key)
                    .filter(|item| search.map_or(true, |pattern| pattern.matches_item(*item)))
                    .collect(),
            })
            .collect();

        Self { columns }
    }

    /// Number of items shown across all columns
    pub fn total(&self) -> usize {
        self.columns.iter().map(|c| c.len()).sum()
    }

    pub fn column(&self, key: &str) -> Option<&Column<'a, F>> {
        self.columns.iter().find(|c| c.stage.key == key)
    }
}

/// Check that every item sits in exactly one registered stage
pub fn check_partition<F: ItemFields>(
    registry: &StageRegistry,
    items: &[PipelineItem<F>],
) -> Result<(), BoardError> {
    if let Some(orphan) = items.iter().find(|item| !registry.contains(item.stage.as_str())) {
        return Err(BoardError::UnknownStage(orphan.stage.to_string()));
    }

    let view = BoardView::build(registry, items);
    if view.total() != items.len() {
        return Err(BoardError::InvalidStage(format!(
            "columns hold {} items but the store has {}",
            view.total(),
            items.len()
        )));
    }

    Ok(())
}
