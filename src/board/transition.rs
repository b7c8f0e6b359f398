//! Transition engine - the single mutation path for stage changes

use crate::board::{store::ItemStore, BoardError};
use crate::core::{ItemFields, ItemId, PipelineItem, StageKey, StageRegistry};
use std::sync::Arc;
use tracing::{debug, info};

/// What triggered a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionSource {
    /// Card dropped on a column
    Drag,
    /// "Move to" control in the detail panel
    Button,
}

/// Outcome of a transition request
#[derive(Debug, Clone, PartialEq)]
pub enum Transition<F> {
    /// The item changed columns
    Moved {
        from: StageKey,
        item: PipelineItem<F>,
    },
    /// The item already sat in the target stage; the record is untouched
    Unchanged,
    /// No item with that id; nothing happened
    NotFound,
}

/// Events emitted as a board changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    ItemAdded {
        id: ItemId,
        stage: StageKey,
    },
    ItemMoved {
        id: ItemId,
        from: StageKey,
        to: StageKey,
        source: TransitionSource,
    },
    ItemUpdated {
        id: ItemId,
    },
    ItemRemoved {
        id: ItemId,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(&BoardEvent) + Send + Sync>;

/// Validates and applies stage changes
///
/// Drag-and-drop and the detail panel's buttons both call
/// [`TransitionEngine::transition`]; there is no second mutation path.
pub struct TransitionEngine {
    registry: StageRegistry,
    event_handlers: Vec<EventHandler>,
}

impl TransitionEngine {
    pub fn new(registry: StageRegistry) -> Self {
        Self {
            registry,
            event_handlers: Vec::new(),
        }
    }

    pub fn registry(&self) -> &StageRegistry {
        &self.registry
    }

    /// Add an event handler
    pub fn add_event_handler<H>(&mut self, handler: H)
    where
        H: Fn(&BoardEvent) + Send + Sync + 'static,
    {
        self.event_handlers.push(Arc::new(handler));
    }

    /// Emit an event to all handlers
    pub fn emit(&self, event: BoardEvent) {
        for handler in &self.event_handlers {
            handler(&event);
        }
    }

    /// Move an item to `target` and announce the move
    ///
    /// Unknown target keys are rejected; unknown item ids are a silent no-op.
    pub fn transition<F: ItemFields>(
        &self,
        store: &mut ItemStore<F>,
        id: ItemId,
        target: &str,
        source: TransitionSource,
    ) -> Result<Transition<F>, BoardError> {
        let transition = self.apply(store, id, target)?;
        self.announce(&transition, source);
        Ok(transition)
    }

    /// Validate and apply a stage change without notifying handlers
    ///
    /// Callers that still have to persist the change announce it afterwards
    /// with [`TransitionEngine::announce`].
    pub fn apply<F: ItemFields>(
        &self,
        store: &mut ItemStore<F>,
        id: ItemId,
        target: &str,
    ) -> Result<Transition<F>, BoardError> {
        let stage = self
            .registry
            .get(target)
            .ok_or_else(|| BoardError::UnknownStage(target.to_string()))?;

        let from = match store.get(id) {
            Some(item) => item.stage.clone(),
            None => {
                debug!("Transition for unknown {} {} ignored", F::KIND, id);
                return Ok(Transition::NotFound);
            }
        };

        if from == stage.key {
            return Ok(Transition::Unchanged);
        }

        match store.set_stage(id, stage.key.clone()) {
            Some(item) => Ok(Transition::Moved { from, item }),
            None => Ok(Transition::NotFound),
        }
    }

    /// Log and emit a completed move; other outcomes are silent
    pub fn announce<F: ItemFields>(&self, transition: &Transition<F>, source: TransitionSource) {
        let Transition::Moved { from, item } = transition else {
            return;
        };

        info!(
            "Moved {} '{}' from {} to {} ({:?})",
            F::KIND,
            item.fields.title(),
            from,
            item.stage,
            source
        );
        self.emit(BoardEvent::ItemMoved {
            id: item.id,
            from: from.clone(),
            to: item.stage.clone(),
            source,
        });
    }
}

impl std::fmt::Debug for TransitionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionEngine")
            .field("registry", &self.registry)
            .field("event_handlers", &self.event_handlers.len())
            .finish()
    }
}
