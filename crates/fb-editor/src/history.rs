//! Undo/Redo history log.
//!
//! Every recorded edit carries the mutation that produced it and the
//! inverse that reverses it. The log is linear: recording after an undo
//! discards the redo tail before appending.

use chrono::{DateTime, Utc};
use fb_core::{Applied, ElementId, FormId, FormMutation};
use serde::Serialize;

/// What kind of edit an action describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Add,
    Update,
    Delete,
    Move,
    Config,
}

/// An action ready to be recorded; `HistoryLog::record` stamps the time.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAction {
    pub kind: ActionKind,
    pub element_id: Option<ElementId>,
    pub form_id: FormId,
    pub forward: FormMutation,
    pub inverse: FormMutation,
}

impl PendingAction {
    /// Derive the replayable forward mutation and its inverse from the
    /// record the store returned for an applied edit.
    pub fn from_applied(form_id: FormId, applied: &Applied) -> Self {
        let (kind, element_id) = match applied {
            Applied::Added { element, .. } => (ActionKind::Add, Some(element.id)),
            Applied::Duplicated { copy, .. } => (ActionKind::Add, Some(copy.id)),
            Applied::Updated { current, .. } => (ActionKind::Update, Some(current.id)),
            Applied::Removed { element } => (ActionKind::Delete, Some(element.id)),
            Applied::Moved { id, .. } => (ActionKind::Move, Some(*id)),
            Applied::Configured { .. } => (ActionKind::Config, None),
        };
        Self {
            kind,
            element_id,
            form_id,
            forward: forward_of(applied),
            inverse: compute_inverse(applied),
        }
    }
}

/// A recorded, timestamped action.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryAction {
    pub kind: ActionKind,
    pub element_id: Option<ElementId>,
    pub form_id: FormId,
    pub forward: FormMutation,
    pub inverse: FormMutation,
    pub recorded_at: DateTime<Utc>,
}

impl HistoryAction {
    pub fn summary(&self) -> ActionSummary {
        ActionSummary {
            kind: self.kind,
            element_id: self.element_id,
            form_id: self.form_id,
            recorded_at: self.recorded_at,
        }
    }
}

/// Serializable view of an action, without the mutations.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionSummary {
    pub kind: ActionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_id: Option<ElementId>,
    pub form_id: FormId,
    pub recorded_at: DateTime<Utc>,
}

/// Linear action log with a cursor.
///
/// `applied` counts the actions currently in effect, so the cursor of the
/// most recently applied action is `applied - 1` (none when zero).
pub struct HistoryLog {
    actions: Vec<HistoryAction>,
    applied: usize,
    /// Maximum number of actions kept.
    max_depth: usize,
}

impl HistoryLog {
    pub fn new(max_depth: usize) -> Self {
        Self {
            actions: Vec::new(),
            applied: 0,
            max_depth: max_depth.max(1),
        }
    }

    /// Stamp and append `action`, discarding any redo tail first.
    pub fn record(&mut self, action: PendingAction) {
        self.actions.truncate(self.applied);
        self.actions.push(HistoryAction {
            kind: action.kind,
            element_id: action.element_id,
            form_id: action.form_id,
            forward: action.forward,
            inverse: action.inverse,
            recorded_at: Utc::now(),
        });
        if self.actions.len() > self.max_depth {
            self.actions.remove(0);
        }
        self.applied = self.actions.len();
    }

    /// Step the cursor back and return the action being undone.
    pub fn undo(&mut self) -> Option<&HistoryAction> {
        self.applied = self.applied.checked_sub(1)?;
        self.actions.get(self.applied)
    }

    /// Step the cursor forward and return the action being re-applied.
    pub fn redo(&mut self) -> Option<&HistoryAction> {
        let action = self.actions.get(self.applied)?;
        self.applied += 1;
        Some(action)
    }

    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    pub fn can_redo(&self) -> bool {
        self.applied < self.actions.len()
    }

    /// Index of the most recently applied action.
    pub fn cursor(&self) -> Option<usize> {
        self.applied.checked_sub(1)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn actions(&self) -> &[HistoryAction] {
        &self.actions
    }
}

/// The mutation that replays `applied` exactly, with positions and ids resolved.
fn forward_of(applied: &Applied) -> FormMutation {
    match applied {
        Applied::Added { element, position } => FormMutation::AddElement {
            element: Box::new(element.clone()),
            position: Some(*position),
        },
        Applied::Updated { current, .. } => FormMutation::ReplaceElement {
            element: Box::new(current.clone()),
        },
        Applied::Removed { element } => FormMutation::RemoveElement { id: element.id },
        Applied::Moved { id, to, .. } => FormMutation::MoveElement {
            id: *id,
            position: *to,
        },
        Applied::Duplicated { source, copy } => FormMutation::DuplicateElement {
            id: *source,
            copy_id: copy.id,
        },
        Applied::Configured { current, .. } => FormMutation::SetConfig {
            patch: current.clone(),
        },
    }
}

/// The mutation that reverses `applied`.
fn compute_inverse(applied: &Applied) -> FormMutation {
    match applied {
        Applied::Added { element, .. } => FormMutation::RemoveElement { id: element.id },
        Applied::Duplicated { copy, .. } => FormMutation::RemoveElement { id: copy.id },
        Applied::Updated { previous, .. } => FormMutation::ReplaceElement {
            element: Box::new(previous.clone()),
        },
        Applied::Removed { element } => FormMutation::AddElement {
            element: Box::new(element.clone()),
            position: Some(element.position),
        },
        Applied::Moved { id, from, .. } => FormMutation::MoveElement {
            id: *id,
            position: *from,
        },
        Applied::Configured { previous, .. } => FormMutation::SetConfig {
            patch: previous.clone(),
        },
    }
}
