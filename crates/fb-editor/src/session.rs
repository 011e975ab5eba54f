//! Editing session: the form store, its undo history and the element
//! selection, driven as one unit.
//!
//! Every recorded edit goes through `execute`, which applies the mutation to
//! the current form and logs the forward/inverse pair. `undo`/`redo` replay
//! those mutations against the form they were recorded on without touching
//! the log again.

use crate::history::{HistoryLog, PendingAction};
use crate::resize::SnapConfig;
use crate::shortcuts::ShortcutAction;
use fb_core::catalog;
use fb_core::{
    Applied, BlobStore, ConfigPatch, EditorSettings, ElementId, ElementPatch, ElementTemplate,
    FormDefinition, FormElement, FormId, FormMutation, FormRepository, FormStore, LintDiagnostic,
    lint_form,
};

pub struct EditorSession {
    store: FormStore,
    history: HistoryLog,
    selected: Option<ElementId>,
    settings: EditorSettings,
}

impl EditorSession {
    pub fn new(repository: FormRepository, settings: EditorSettings) -> Self {
        Self {
            store: FormStore::with_settings(repository, &settings),
            history: HistoryLog::new(settings.history_depth),
            selected: None,
            settings,
        }
    }

    /// Open a session over `blobs`, using the storage key from `settings`.
    pub fn open(blobs: impl BlobStore + 'static, settings: EditorSettings) -> Self {
        let repository = FormRepository::new(blobs, settings.storage_key.clone());
        Self::new(repository, settings)
    }

    pub fn in_memory() -> Self {
        Self::new(FormRepository::in_memory(), EditorSettings::default())
    }

    pub fn store(&self) -> &FormStore {
        &self.store
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    /// Snapping rules for resizable panels under the current settings.
    pub fn snap_config(&self) -> SnapConfig {
        SnapConfig::from_settings(&self.settings)
    }

    pub fn current(&self) -> Option<&FormDefinition> {
        self.store.current()
    }

    pub fn ordered_elements(&self) -> Vec<&FormElement> {
        self.store.ordered_elements()
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn selected(&self) -> Option<ElementId> {
        self.selected
    }

    pub fn selected_element(&self) -> Option<&FormElement> {
        self.current()?.elements.get(self.selected?)
    }

    /// Select an element of the current form, or clear with `None`.
    /// Returns `false` if `id` is not in the current form.
    pub fn select_element(&mut self, id: Option<ElementId>) -> bool {
        match id {
            None => {
                self.selected = None;
                true
            }
            Some(id) if self.in_current(id) => {
                self.selected = Some(id);
                true
            }
            Some(_) => false,
        }
    }

    fn in_current(&self, id: ElementId) -> bool {
        self.current().is_some_and(|f| f.elements.contains(id))
    }

    /// Drop the selection if the element it names is gone.
    fn reconcile_selection(&mut self) {
        if let Some(id) = self.selected
            && !self.in_current(id)
        {
            self.selected = None;
        }
    }

    // ─── Forms ───────────────────────────────────────────────────────────

    pub fn create_form(&mut self) -> FormId {
        self.selected = None;
        self.store.create_form()
    }

    pub fn select_form(&mut self, id: FormId) -> bool {
        if self.store.current_id() == Some(id) {
            return self.store.form(id).is_some();
        }
        let found = self.store.select_form(id);
        if found {
            self.selected = None;
        }
        found
    }

    /// Delete a form. Recorded actions that target it stay in the log and
    /// replay as no-ops.
    pub fn delete_form(&mut self, id: FormId) -> Option<FormDefinition> {
        let removed = self.store.delete_form(id)?;
        self.reconcile_selection();
        Some(removed)
    }

    pub fn update_config(&mut self, patch: ConfigPatch) -> bool {
        self.execute(FormMutation::SetConfig { patch }).is_some()
    }

    // ─── Elements ────────────────────────────────────────────────────────

    /// Apply `mutation` to the current form and record it for undo.
    /// Not-found targets change nothing and are not recorded.
    pub fn execute(&mut self, mutation: FormMutation) -> Option<Applied> {
        let form_id = self.store.current_id()?;
        let applied = self.store.apply(form_id, mutation)?;
        if changes_state(&applied) {
            self.history.record(PendingAction::from_applied(form_id, &applied));
        }
        Some(applied)
    }

    /// Add a fresh element from `template`. Returns its id.
    pub fn add_element(
        &mut self,
        template: &ElementTemplate,
        position: Option<usize>,
    ) -> Option<ElementId> {
        let element = template.instantiate(ElementId::generate());
        let id = element.id;
        self.execute(FormMutation::AddElement {
            element: Box::new(element),
            position,
        })?;
        Some(id)
    }

    /// Add an element of the palette kind `tag` (e.g. `"email"`).
    pub fn add_element_of_kind(
        &mut self,
        tag: &str,
        position: Option<usize>,
    ) -> Option<ElementId> {
        let Some(template) = catalog::template(tag) else {
            log::debug!("no palette entry for `{tag}`");
            return None;
        };
        self.add_element(template, position)
    }

    pub fn update_element(&mut self, id: ElementId, patch: ElementPatch) -> bool {
        self.execute(FormMutation::UpdateElement {
            id,
            patch: Box::new(patch),
        })
        .is_some()
    }

    pub fn remove_element(&mut self, id: ElementId) -> bool {
        let removed = self.execute(FormMutation::RemoveElement { id }).is_some();
        if removed && self.selected == Some(id) {
            self.selected = None;
        }
        removed
    }

    /// Returns the position the element landed on after clamping.
    pub fn move_element(&mut self, id: ElementId, position: usize) -> Option<usize> {
        match self.execute(FormMutation::MoveElement { id, position })? {
            Applied::Moved { to, .. } => Some(to),
            _ => None,
        }
    }

    /// Duplicate `id` and select the copy.
    pub fn duplicate_element(&mut self, id: ElementId) -> Option<ElementId> {
        let copy_id = ElementId::generate();
        self.execute(FormMutation::DuplicateElement { id, copy_id })?;
        self.selected = Some(copy_id);
        Some(copy_id)
    }

    // ─── History ─────────────────────────────────────────────────────────

    /// Reverse the most recent action. Returns `false` with nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(action) = self.history.undo() else {
            return false;
        };
        let (form_id, inverse) = (action.form_id, action.inverse.clone());
        log::debug!("undo {:?} on form {form_id}", action.kind);
        if self.store.apply(form_id, inverse).is_none() {
            log::debug!("undo target in form {form_id} no longer exists");
        }
        self.reconcile_selection();
        true
    }

    /// Re-apply the most recently undone action.
    pub fn redo(&mut self) -> bool {
        let Some(action) = self.history.redo() else {
            return false;
        };
        let (form_id, forward) = (action.form_id, action.forward.clone());
        log::debug!("redo {:?} on form {form_id}", action.kind);
        if self.store.apply(form_id, forward).is_none() {
            log::debug!("redo target in form {form_id} no longer exists");
        }
        self.reconcile_selection();
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ─── Shortcuts ───────────────────────────────────────────────────────

    /// Run a shortcut action. Returns whether anything changed.
    pub fn dispatch(&mut self, action: ShortcutAction) -> bool {
        let selected = self.selected;
        match action {
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::Save => self.save(),
            ShortcutAction::Deselect => self.selected.take().is_some(),
            ShortcutAction::Delete => selected.is_some_and(|id| self.remove_element(id)),
            ShortcutAction::Duplicate => selected
                .and_then(|id| self.duplicate_element(id))
                .is_some(),
            ShortcutAction::MoveUp => self.nudge_selected(-1),
            ShortcutAction::MoveDown => self.nudge_selected(1),
        }
    }

    fn nudge_selected(&mut self, delta: isize) -> bool {
        let Some(el) = self.selected_element() else {
            return false;
        };
        let (id, from) = (el.id, el.position);
        let Some(to) = from.checked_add_signed(delta) else {
            return false;
        };
        self.move_element(id, to).is_some_and(|landed| landed != from)
    }

    // ─── Output ──────────────────────────────────────────────────────────

    pub fn export_json(&self) -> Option<String> {
        self.store.export_json()
    }

    pub fn export_html(&self) -> Option<String> {
        self.store.export_html()
    }

    /// Lint findings for the current form; empty when none is selected.
    pub fn lint(&self) -> Vec<LintDiagnostic> {
        self.current().map(lint_form).unwrap_or_default()
    }

    pub fn save(&mut self) -> bool {
        self.store.save()
    }
}

/// Whether an applied mutation is worth an undo step.
fn changes_state(applied: &Applied) -> bool {
    match applied {
        Applied::Moved { from, to, .. } => from != to,
        Applied::Updated { previous, current } => previous != current,
        Applied::Configured { previous, current } => previous != current,
        Applied::Added { .. } | Applied::Removed { .. } | Applied::Duplicated { .. } => true,
    }
}
