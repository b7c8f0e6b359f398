//! Drag-and-drop gesture state

use crate::core::{ItemId, StageKey};

/// State of a drag gesture on the board
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    /// No gesture in progress
    #[default]
    Idle,
    /// A card is being dragged, not over any column
    Dragging { item: ItemId },
    /// A card is being dragged over a column
    Hovering { item: ItemId, stage: StageKey },
    /// The card was released over a column
    Dropped { item: ItemId, stage: StageKey },
}

/// A completed drop, to be handed to the transition engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropIntent {
    pub item: ItemId,
    pub stage: StageKey,
}

/// Tracks one drag gesture at a time
///
/// Ending a gesture without a drop returns to `Idle` without producing an
/// intent, which is the only way to cancel a move.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Pick up a card; replaces any gesture in progress
    pub fn start(&mut self, item: ItemId) {
        self.state = DragState::Dragging { item };
    }

    /// Pointer entered a column
    pub fn hover(&mut self, stage: StageKey) {
        if let Some(item) = self.dragged_item() {
            self.state = DragState::Hovering { item, stage };
        }
    }

    /// Pointer left the hovered column
    pub fn leave(&mut self) {
        if let DragState::Hovering { item, .. } = self.state {
            self.state = DragState::Dragging { item };
        }
    }

    /// Card released over a column
    ///
    /// Returns `None` when no card is being dragged.
    pub fn drop_on(&mut self, stage: StageKey) -> Option<DropIntent> {
        let item = self.dragged_item()?;
        self.state = DragState::Dropped {
            item,
            stage: stage.clone(),
        };
        Some(DropIntent { item, stage })
    }

    /// Gesture finished (after a drop, or released outside any column)
    pub fn end(&mut self) {
        self.state = DragState::Idle;
    }

    pub fn cancel(&mut self) {
        self.end();
    }

    /// Card currently held, if any
    pub fn dragged_item(&self) -> Option<ItemId> {
        match self.state {
            DragState::Dragging { item } | DragState::Hovering { item, .. } => Some(item),
            _ => None,
        }
    }

    /// Whether a column should be drawn as the active drop target
    pub fn is_highlighted(&self, stage: &StageKey) -> bool {
        matches!(&self.state, DragState::Hovering { stage: hovered, .. } if hovered == stage)
    }

    /// Whether a card should be drawn at reduced opacity
    pub fn is_dimmed(&self, item: ItemId) -> bool {
        self.dragged_item() == Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_gesture() {
        let id = ItemId::generate();
        let mut drag = DragController::new();

        drag.start(id);
        assert!(drag.is_dimmed(id));

        drag.hover(StageKey::new("contacted"));
        assert!(drag.is_highlighted(&StageKey::new("contacted")));
        assert!(!drag.is_highlighted(&StageKey::new("research")));

        drag.leave();
        drag.hover(StageKey::new("submitted"));

        let intent = drag.drop_on(StageKey::new("submitted")).unwrap();
        assert_eq!(intent.item, id);
        assert_eq!(intent.stage, "submitted");
        assert!(!drag.is_dimmed(id));

        drag.end();
        assert_eq!(drag.state(), &DragState::Idle);
    }

    #[test]
    fn test_release_outside_columns_cancels() {
        let id = ItemId::generate();
        let mut drag = DragController::new();

        drag.start(id);
        drag.hover(StageKey::new("approved"));
        drag.leave();
        drag.end();

        assert_eq!(drag.state(), &DragState::Idle);
        assert!(drag.drop_on(StageKey::new("approved")).is_none());
    }

    #[test]
    fn test_hover_without_drag_is_ignored() {
        let mut drag = DragController::new();
        drag.hover(StageKey::new("approved"));
        assert_eq!(drag.state(), &DragState::Idle);
    }
}
