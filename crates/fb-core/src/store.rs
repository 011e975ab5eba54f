//! The form collection and the mutations that change it.
//!
//! All edits to a form go through `FormStore::apply` as a `FormMutation`.
//! A successful apply bumps the form's `updated_at`, persists the whole
//! collection (when auto-save is on and not held), and returns an `Applied` record with
//! enough of the previous state to reverse the change.

use crate::catalog::ElementTemplate;
use crate::export;
use crate::form::{ConfigPatch, FormDefinition};
use crate::id::{ElementId, FormId};
use crate::model::{ElementPatch, FormElement};
use crate::persist::FormRepository;
use crate::settings::EditorSettings;

/// A single edit to one form.
#[derive(Debug, Clone, PartialEq)]
pub enum FormMutation {
    /// Insert at `position` (clamped), or append when `None`.
    AddElement {
        element: Box<FormElement>,
        position: Option<usize>,
    },
    UpdateElement {
        id: ElementId,
        patch: Box<ElementPatch>,
    },
    /// Overwrite kind and properties of the element with the same id.
    ReplaceElement {
        element: Box<FormElement>,
    },
    RemoveElement {
        id: ElementId,
    },
    /// Move to `position` (clamped to the last slot).
    MoveElement {
        id: ElementId,
        position: usize,
    },
    /// Clone `id` directly after itself. The caller picks `copy_id` so the
    /// same duplicate can be replayed.
    DuplicateElement {
        id: ElementId,
        copy_id: ElementId,
    },
    SetConfig {
        patch: ConfigPatch,
    },
}

/// Outcome of an applied mutation, carrying the state it replaced.
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    Added {
        element: FormElement,
        position: usize,
    },
    Updated {
        previous: FormElement,
        current: FormElement,
    },
    Removed {
        element: FormElement,
    },
    Moved {
        id: ElementId,
        from: usize,
        to: usize,
    },
    Duplicated {
        source: ElementId,
        copy: FormElement,
    },
    Configured {
        previous: ConfigPatch,
        current: ConfigPatch,
    },
}

/// Owns every form plus the "currently edited" selection.
pub struct FormStore {
    forms: Vec<FormDefinition>,
    current: Option<FormId>,
    repository: FormRepository,
    auto_save: bool,
    /// Set when the stored collection could not be read. Auto-save stays
    /// off until an explicit save, so the unreadable blob is not overwritten.
    writes_held: bool,
}

impl FormStore {
    /// Open a store over `repository`, loading whatever it holds. Unreadable
    /// data opens as an empty collection with auto-save held.
    pub fn new(repository: FormRepository) -> Self {
        let (forms, writes_held) = match repository.try_load() {
            Ok(forms) => (forms, false),
            Err(e) => {
                log::warn!(
                    "Failed to load forms from `{}`: {e}; auto-save held until an explicit save",
                    repository.key()
                );
                (Vec::new(), true)
            }
        };
        Self {
            forms,
            current: None,
            repository,
            auto_save: true,
            writes_held,
        }
    }

    pub fn with_settings(repository: FormRepository, settings: &EditorSettings) -> Self {
        let mut store = Self::new(repository);
        store.auto_save = settings.auto_save;
        store
    }

    /// An empty store that keeps nothing between sessions.
    pub fn in_memory() -> Self {
        Self::new(FormRepository::in_memory())
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn forms(&self) -> &[FormDefinition] {
        &self.forms
    }

    pub fn form(&self, id: FormId) -> Option<&FormDefinition> {
        self.forms.iter().find(|f| f.id == id)
    }

    fn form_mut(&mut self, id: FormId) -> Option<&mut FormDefinition> {
        self.forms.iter_mut().find(|f| f.id == id)
    }

    pub fn current_id(&self) -> Option<FormId> {
        self.current
    }

    pub fn current(&self) -> Option<&FormDefinition> {
        self.form(self.current?)
    }

    /// Elements of the current form in render order; empty when none is selected.
    pub fn ordered_elements(&self) -> Vec<&FormElement> {
        self.current()
            .map(|f| f.elements.ordered())
            .unwrap_or_default()
    }

    /// Pretty JSON of the current form; `None` when no form is selected.
    pub fn export_json(&self) -> Option<String> {
        export::export_json(self.current()?)
            .inspect_err(|e| log::warn!("Failed to export form as JSON: {e}"))
            .ok()
    }

    /// HTML document for the current form; `None` when no form is selected.
    pub fn export_html(&self) -> Option<String> {
        Some(export::export_html(self.current()?))
    }

    // ─── Form collection ─────────────────────────────────────────────────

    /// Create an empty form, make it current, and persist.
    pub fn create_form(&mut self) -> FormId {
        let form = FormDefinition::new(FormId::generate());
        let id = form.id;
        self.forms.push(form);
        self.current = Some(id);
        log::debug!("created form {id}");
        self.persist();
        id
    }

    /// Make `id` the current form. Unknown ids leave the selection as is.
    pub fn select_form(&mut self, id: FormId) -> bool {
        if self.form(id).is_some() {
            self.current = Some(id);
            true
        } else {
            false
        }
    }

    /// Delete a form and everything it owns; clears the selection if it was current.
    pub fn delete_form(&mut self, id: FormId) -> Option<FormDefinition> {
        let idx = self.forms.iter().position(|f| f.id == id)?;
        let removed = self.forms.remove(idx);
        if self.current == Some(id) {
            self.current = None;
        }
        log::debug!("deleted form {id}");
        self.persist();
        Some(removed)
    }

    /// Whether auto-save is held after a failed load.
    pub fn writes_held(&self) -> bool {
        self.writes_held
    }

    /// Write the collection now, regardless of auto-save. A successful write
    /// releases held auto-save.
    pub fn save(&mut self) -> bool {
        let saved = self.repository.save(&self.forms);
        if saved {
            self.writes_held = false;
        }
        saved
    }

    fn persist(&mut self) {
        if self.auto_save && !self.writes_held {
            self.repository.save(&self.forms);
        }
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Apply `mutation` to form `form_id`. `None` (and no side effects) when
    /// the form or the targeted element does not exist.
    pub fn apply(&mut self, form_id: FormId, mutation: FormMutation) -> Option<Applied> {
        let form = self.form_mut(form_id)?;
        let applied = apply_to_form(form, mutation)?;
        form.touch();
        log::debug!("form {form_id}: {applied:?}");
        self.persist();
        Some(applied)
    }

    /// Apply `mutation` to the current form.
    pub fn apply_current(&mut self, mutation: FormMutation) -> Option<Applied> {
        let id = self.current?;
        self.apply(id, mutation)
    }

    /// Merge title/description into the current form.
    pub fn update_config(&mut self, patch: ConfigPatch) -> Option<Applied> {
        self.apply_current(FormMutation::SetConfig { patch })
    }

    /// Add a fresh element built from `template` to the current form.
    pub fn add_element(
        &mut self,
        template: &ElementTemplate,
        position: Option<usize>,
    ) -> Option<FormElement> {
        let element = template.instantiate(ElementId::generate());
        match self.apply_current(FormMutation::AddElement {
            element: Box::new(element),
            position,
        })? {
            Applied::Added { element, .. } => Some(element),
            _ => None,
        }
    }

    pub fn update_element(&mut self, id: ElementId, patch: ElementPatch) -> Option<&FormElement> {
        self.apply_current(FormMutation::UpdateElement {
            id,
            patch: Box::new(patch),
        })?;
        self.current()?.elements.get(id)
    }

    pub fn remove_element(&mut self, id: ElementId) -> Option<FormElement> {
        match self.apply_current(FormMutation::RemoveElement { id })? {
            Applied::Removed { element } => Some(element),
            _ => None,
        }
    }

    pub fn move_element(&mut self, id: ElementId, position: usize) -> Option<usize> {
        match self.apply_current(FormMutation::MoveElement { id, position })? {
            Applied::Moved { to, .. } => Some(to),
            _ => None,
        }
    }

    pub fn duplicate_element(&mut self, id: ElementId) -> Option<FormElement> {
        let copy_id = ElementId::generate();
        match self.apply_current(FormMutation::DuplicateElement { id, copy_id })? {
            Applied::Duplicated { copy, .. } => Some(copy),
            _ => None,
        }
    }
}

fn apply_to_form(form: &mut FormDefinition, mutation: FormMutation) -> Option<Applied> {
    let elements = &mut form.elements;
    match mutation {
        FormMutation::AddElement { element, position } => {
            if elements.contains(element.id) {
                log::warn!("refusing to add duplicate element id {}", element.id);
                return None;
            }
            let id = element.id;
            let position = elements.insert(*element, position);
            let element = elements.get(id)?.clone();
            Some(Applied::Added { element, position })
        }
        FormMutation::UpdateElement { id, patch } => {
            let previous = elements.get(id)?.clone();
            let current = elements.update(id, &patch)?.clone();
            Some(Applied::Updated { previous, current })
        }
        FormMutation::ReplaceElement { element } => {
            let id = element.id;
            let previous = elements.replace(*element)?;
            let current = elements.get(id)?.clone();
            Some(Applied::Updated { previous, current })
        }
        FormMutation::RemoveElement { id } => {
            let element = elements.remove(id)?;
            Some(Applied::Removed { element })
        }
        FormMutation::MoveElement { id, position } => {
            let (from, to) = elements.move_to(id, position)?;
            Some(Applied::Moved { id, from, to })
        }
        FormMutation::DuplicateElement { id, copy_id } => {
            if elements.contains(copy_id) {
                return None;
            }
            let copy = elements.duplicate(id, copy_id)?.clone();
            Some(Applied::Duplicated { source: id, copy })
        }
        FormMutation::SetConfig { patch } => {
            let previous = ConfigPatch {
                title: Some(form.title.clone()),
                description: Some(form.description.clone()),
            };
            patch.apply(form);
            let current = ConfigPatch {
                title: Some(form.title.clone()),
                description: Some(form.description.clone()),
            };
            Some(Applied::Configured { previous, current })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::persist::{DEFAULT_STORAGE_KEY, MemoryBlobStore};
    use pretty_assertions::assert_eq;

    fn text() -> &'static ElementTemplate {
        catalog::template("text").unwrap()
    }

    #[test]
    fn create_form_selects_and_persists() {
        let blobs = MemoryBlobStore::new();
        let mut store = FormStore::new(FormRepository::new(blobs.clone(), DEFAULT_STORAGE_KEY));
        let id = store.create_form();
        assert_eq!(store.current_id(), Some(id));
        assert!(blobs.raw(DEFAULT_STORAGE_KEY).unwrap().contains(id.as_str()));
    }

    #[test]
    fn select_unknown_form_keeps_selection() {
        let mut store = FormStore::in_memory();
        let a = store.create_form();
        assert!(!store.select_form(FormId::intern("form-missing")));
        assert_eq!(store.current_id(), Some(a));
    }

    #[test]
    fn delete_current_form_clears_selection() {
        let mut store = FormStore::in_memory();
        let a = store.create_form();
        let b = store.create_form();
        assert!(store.select_form(a));
        store.delete_form(a).unwrap();
        assert_eq!(store.current_id(), None);
        assert_eq!(store.forms().len(), 1);
        assert_eq!(store.forms()[0].id, b);
        assert!(store.delete_form(a).is_none());
    }

    #[test]
    fn element_ops_without_selection_are_noops() {
        let mut store = FormStore::in_memory();
        assert!(store.add_element(text(), None).is_none());
        assert!(store.update_config(ConfigPatch::default()).is_none());
        assert!(store.ordered_elements().is_empty());
    }

    #[test]
    fn mutations_bump_updated_at() {
        let mut store = FormStore::in_memory();
        store.create_form();
        let before = store.current().unwrap().updated_at;
        let created = store.current().unwrap().created_at;
        store.add_element(text(), None).unwrap();
        let form = store.current().unwrap();
        assert!(form.updated_at >= before);
        assert_eq!(form.created_at, created);
    }

    #[test]
    fn update_config_merges() {
        let mut store = FormStore::in_memory();
        store.create_form();
        store.update_config(ConfigPatch {
            title: Some("Survey".into()),
            description: None,
        });
        let form = store.current().unwrap();
        assert_eq!(form.title, "Survey");
        assert_eq!(form.description, crate::form::DEFAULT_DESCRIPTION);
    }

    #[test]
    fn add_refuses_duplicate_ids() {
        let mut store = FormStore::in_memory();
        let form = store.create_form();
        let el = store.add_element(text(), None).unwrap();
        let again = FormMutation::AddElement {
            element: Box::new(el),
            position: None,
        };
        assert!(store.apply(form, again).is_none());
        assert_eq!(store.ordered_elements().len(), 1);
    }

    #[test]
    fn auto_save_off_defers_writes() {
        let blobs = MemoryBlobStore::new();
        let settings = EditorSettings {
            auto_save: false,
            ..EditorSettings::default()
        };
        let mut store = FormStore::with_settings(
            FormRepository::new(blobs.clone(), DEFAULT_STORAGE_KEY),
            &settings,
        );
        store.create_form();
        assert!(blobs.raw(DEFAULT_STORAGE_KEY).is_none());
        assert!(store.save());
        assert!(blobs.raw(DEFAULT_STORAGE_KEY).is_some());
    }

    #[test]
    fn unreadable_blob_survives_until_explicit_save() {
        let blobs = MemoryBlobStore::new();
        let corrupt = r#"[{"id":"form-x","title":"Survey""#;
        blobs.insert(DEFAULT_STORAGE_KEY, corrupt);
        let mut store = FormStore::new(FormRepository::new(blobs.clone(), DEFAULT_STORAGE_KEY));
        assert!(store.forms().is_empty());
        assert!(store.writes_held());

        store.create_form();
        store.add_element(text(), None).unwrap();
        assert_eq!(blobs.raw(DEFAULT_STORAGE_KEY).as_deref(), Some(corrupt));

        assert!(store.save());
        assert!(!store.writes_held());
        store.create_form();
        let stored: Vec<FormDefinition> =
            serde_json::from_str(&blobs.raw(DEFAULT_STORAGE_KEY).unwrap()).unwrap();
        assert_eq!(stored.len(), 2);
    }

    #[test]
    fn missing_blob_does_not_hold_writes() {
        let blobs = MemoryBlobStore::new();
        let mut store = FormStore::new(FormRepository::new(blobs.clone(), DEFAULT_STORAGE_KEY));
        assert!(!store.writes_held());
        store.create_form();
        assert!(blobs.raw(DEFAULT_STORAGE_KEY).is_some());
    }
}
