//! Create/edit form modal state machine
//!
//! Every list + modal page follows the same lifecycle:
//! `Closed -> Open(draft) -> { confirm -> Closed + submission | cancel -> Closed }`.
//! Editing the draft never touches the store; only a confirmed submission does.

use crate::core::ItemId;

/// A record that can be edited in a form
pub trait FormDraft: Clone + Default {
    /// Whether the required field(s) are filled in
    fn required_present(&self) -> bool;
}

/// What the open form will do on confirm
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode<K> {
    /// Create a new record
    Create,
    /// Replace the fields of an existing record
    Edit(K),
}

/// Lifecycle state of a form modal
#[derive(Debug, Clone)]
pub enum FormState<D, K> {
    Closed,
    Open {
        draft: D,
        mode: FormMode<K>,
    },
}

/// Result of confirming a form
#[derive(Debug, Clone, PartialEq)]
pub enum FormSubmission<D, K> {
    Create(D),
    Edit(K, D),
}

/// Form modal bound to a local draft
#[derive(Debug, Clone)]
pub struct FormModal<D, K = ItemId> {
    state: FormState<D, K>,
}

impl<D: FormDraft, K: Clone> FormModal<D, K> {
    pub fn new() -> Self {
        Self {
            state: FormState::Closed,
        }
    }

    /// Open with an empty template draft
    pub fn open_create(&mut self) {
        self.state = FormState::Open {
            draft: D::default(),
            mode: FormMode::Create,
        };
    }

    /// Open pre-filled with an existing record's fields
    pub fn open_edit(&mut self, key: K, current: D) {
        self.state = FormState::Open {
            draft: current,
            mode: FormMode::Edit(key),
        };
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, FormState::Open { .. })
    }

    pub fn state(&self) -> &FormState<D, K> {
        &self.state
    }

    pub fn draft(&self) -> Option<&D> {
        match &self.state {
            FormState::Open { draft, .. } => Some(draft),
            FormState::Closed => None,
        }
    }

    /// Mutable access to the draft for field edits
    pub fn draft_mut(&mut self) -> Option<&mut D> {
        match &mut self.state {
            FormState::Open { draft, .. } => Some(draft),
            FormState::Closed => None,
        }
    }

    /// Whether the confirm control is enabled
    pub fn can_confirm(&self) -> bool {
        self.draft().is_some_and(|draft| draft.required_present())
    }

    /// Confirm the form
    ///
    /// Returns `None` and stays open while the confirm control is disabled.
    pub fn confirm(&mut self) -> Option<FormSubmission<D, K>> {
        if !self.can_confirm() {
            return None;
        }

        match std::mem::replace(&mut self.state, FormState::Closed) {
            FormState::Open { draft, mode } => Some(match mode {
                FormMode::Create => FormSubmission::Create(draft),
                FormMode::Edit(key) => FormSubmission::Edit(key, draft),
            }),
            FormState::Closed => None,
        }
    }

    /// Discard the draft
    pub fn cancel(&mut self) {
        self.state = FormState::Closed;
    }
}

impl<D: FormDraft, K: Clone> Default for FormModal<D, K> {
    fn default() -> Self {
        Self::new()
    }
}
