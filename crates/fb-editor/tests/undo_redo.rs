//! Integration tests: undo/redo through the editing session (fb-editor).
//!
//! Every recorded edit must be reversible by its inverse and replayable by
//! its forward mutation, leaving the ordered element view exactly as it was.

use fb_core::persist::DEFAULT_STORAGE_KEY;
use fb_core::{
    ConfigPatch, EditorSettings, ElementId, ElementPatch, FormElement, FormRepository, FormStore,
    MemoryBlobStore,
};
use fb_editor::{ActionKind, EditorSession};
use pretty_assertions::assert_eq;

/// A session with one current form holding `count` text fields.
fn session_with(count: usize) -> (EditorSession, Vec<ElementId>) {
    let mut session = EditorSession::in_memory();
    session.create_form();
    let ids = (0..count)
        .map(|i| {
            let id = session.add_element_of_kind("text", None).unwrap();
            session.update_element(
                id,
                ElementPatch {
                    label: Some(format!("Field {i}")),
                    ..ElementPatch::default()
                },
            );
            id
        })
        .collect();
    (session, ids)
}

/// Owned snapshot of the ordered view.
fn snapshot(session: &EditorSession) -> Vec<FormElement> {
    session
        .ordered_elements()
        .into_iter()
        .cloned()
        .collect()
}

fn labels(session: &EditorSession) -> Vec<String> {
    session
        .ordered_elements()
        .iter()
        .map(|e| e.label().to_string())
        .collect()
}

// ─── Single actions ──────────────────────────────────────────────────────

#[test]
fn undo_add_then_redo_restores_same_element() {
    let (mut session, _) = session_with(2);
    let before = snapshot(&session);
    let id = session.add_element_of_kind("email", Some(0)).unwrap();
    let after = snapshot(&session);

    assert!(session.undo());
    assert_eq!(snapshot(&session), before);

    assert!(session.redo());
    assert_eq!(snapshot(&session), after);
    assert_eq!(session.ordered_elements()[0].id, id);
}

#[test]
fn undo_remove_restores_old_position() {
    let (mut session, ids) = session_with(3);
    let before = snapshot(&session);
    assert!(session.remove_element(ids[1]));
    assert_eq!(labels(&session), ["Field 0", "Field 2"]);

    assert!(session.undo());
    assert_eq!(snapshot(&session), before);

    assert!(session.redo());
    assert_eq!(labels(&session), ["Field 0", "Field 2"]);
}

#[test]
fn undo_move_returns_to_origin() {
    let (mut session, ids) = session_with(4);
    let before = snapshot(&session);
    assert_eq!(session.move_element(ids[3], 1), Some(1));
    let after = snapshot(&session);
    assert_eq!(labels(&session), ["Field 0", "Field 3", "Field 1", "Field 2"]);

    assert!(session.undo());
    assert_eq!(snapshot(&session), before);
    assert!(session.redo());
    assert_eq!(snapshot(&session), after);
}

#[test]
fn undo_duplicate_removes_copy_and_redo_reuses_its_id() {
    let (mut session, ids) = session_with(2);
    let before = snapshot(&session);
    let copy = session.duplicate_element(ids[0]).unwrap();
    assert_eq!(labels(&session), ["Field 0", "Field 0 (Copy)", "Field 1"]);

    assert!(session.undo());
    assert_eq!(snapshot(&session), before);
    assert_eq!(session.selected(), None);

    assert!(session.redo());
    assert_eq!(session.ordered_elements()[1].id, copy);
    assert_eq!(
        session.history().actions().last().map(|a| a.kind),
        Some(ActionKind::Add)
    );
}

#[test]
fn undo_update_restores_previous_properties() {
    let (mut session, ids) = session_with(1);
    let before = snapshot(&session);
    session.update_element(
        ids[0],
        ElementPatch {
            label: Some("Name".into()),
            required: Some(true),
            placeholder: Some("Jane".into()),
            ..ElementPatch::default()
        },
    );
    let after = snapshot(&session);
    assert!(after[0].props.required);

    assert!(session.undo());
    assert_eq!(snapshot(&session), before);
    assert!(session.redo());
    assert_eq!(snapshot(&session), after);
}

#[test]
fn undo_config_restores_title() {
    let (mut session, _) = session_with(0);
    session.update_config(ConfigPatch {
        title: Some("Survey".into()),
        description: None,
    });
    assert_eq!(session.current().unwrap().title, "Survey");

    assert!(session.undo());
    assert_eq!(session.current().unwrap().title, "Untitled Form");
    assert!(session.redo());
    assert_eq!(session.current().unwrap().title, "Survey");
}

// ─── Sequences ───────────────────────────────────────────────────────────

#[test]
fn undo_everything_then_redo_everything() {
    let (mut session, ids) = session_with(3);
    session.move_element(ids[0], 2);
    session.duplicate_element(ids[1]);
    session.remove_element(ids[2]);
    session.add_element_of_kind("checkbox", Some(1));
    let last = snapshot(&session);

    let mut undone = 0;
    while session.undo() {
        undone += 1;
    }
    assert_eq!(undone, session.history().len());
    assert!(session.ordered_elements().is_empty());
    assert!(!session.can_undo());

    while session.redo() {}
    assert_eq!(snapshot(&session), last);
    assert!(!session.can_redo());
}

#[test]
fn new_edit_after_undo_discards_redo_tail() {
    let (mut session, _) = session_with(0);
    for tag in ["text", "email", "number"] {
        session.add_element_of_kind(tag, None);
    }
    assert!(session.undo());
    assert!(session.undo());
    assert_eq!(session.history().cursor(), Some(0));

    session.add_element_of_kind("date", None);
    assert_eq!(session.history().len(), 2);
    assert_eq!(session.history().cursor(), Some(1));
    assert!(!session.can_redo());
    assert_eq!(labels(&session), ["Text Field", "Date"]);
}

// ─── Across forms ────────────────────────────────────────────────────────

#[test]
fn undo_applies_to_the_recorded_form() {
    let (mut session, _) = session_with(1);
    let first = session.current().unwrap().id;
    session.add_element_of_kind("email", None);

    session.create_form();
    let second = session.current().unwrap().id;
    assert!(session.undo());

    assert_eq!(session.current().unwrap().id, second);
    assert_eq!(session.store().form(first).unwrap().elements.len(), 1);
}

#[test]
fn undo_on_deleted_form_only_moves_cursor() {
    let (mut session, _) = session_with(2);
    let doomed = session.current().unwrap().id;
    let other = session.create_form();
    let untouched = session.store().form(other).unwrap().clone();
    session.delete_form(doomed).unwrap();

    let cursor = session.history().cursor();
    assert!(session.undo());
    assert_ne!(session.history().cursor(), cursor);
    assert_eq!(session.store().forms(), [untouched]);
}

// ─── Persistence ─────────────────────────────────────────────────────────

#[test]
fn undo_is_persisted() {
    let blobs = MemoryBlobStore::new();
    let mut session = EditorSession::open(blobs.clone(), EditorSettings::default());
    session.create_form();
    session.add_element_of_kind("text", None);
    session.add_element_of_kind("textarea", None);
    assert!(session.undo());

    let reopened = FormStore::new(FormRepository::new(blobs, DEFAULT_STORAGE_KEY));
    assert_eq!(reopened.forms(), session.store().forms());
    assert_eq!(reopened.forms()[0].elements.len(), 1);
}
