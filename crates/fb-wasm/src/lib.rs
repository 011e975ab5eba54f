//! WASM bridge for FB: exposes the form editing session to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. Structured values cross the
//! boundary as JSON strings; ids cross as plain strings, with `""` standing
//! for "none".

#[cfg(target_arch = "wasm32")]
mod storage;

use fb_core::catalog;
use fb_core::{ConfigPatch, EditorSettings, ElementId, ElementPatch, FormId, import_json, lint_form};
use fb_editor::resize::width_for;
use fb_editor::{EditorSession, ShortcutAction, ShortcutMap};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// The main WASM-facing editor controller.
///
/// Holds the editing session (forms, history, selection). All interaction
/// from the page goes through this struct.
#[wasm_bindgen]
pub struct FbEditor {
    session: EditorSession,
}

#[wasm_bindgen]
impl FbEditor {
    /// Create an editor from settings JSON (`""` for defaults), loading the
    /// stored forms.
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: &str) -> Self {
        console_error_panic_hook_setup();

        let settings = if settings_json.trim().is_empty() {
            EditorSettings::default()
        } else {
            EditorSettings::from_json(settings_json)
        };
        Self {
            session: open_session(settings),
        }
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    /// All forms as a JSON array.
    pub fn get_forms(&self) -> String {
        to_json(self.session.store().forms(), "[]")
    }

    /// The current form as JSON, or `null`.
    pub fn get_current_form(&self) -> String {
        to_json(&self.session.current(), "null")
    }

    pub fn get_current_form_id(&self) -> String {
        self.session
            .current()
            .map(|f| f.id.as_str().to_string())
            .unwrap_or_default()
    }

    /// Elements of the current form in render order, as a JSON array.
    pub fn get_elements(&self) -> String {
        to_json(&self.session.ordered_elements(), "[]")
    }

    /// The element palette as a JSON array.
    pub fn get_palette(&self) -> String {
        let palette: Vec<serde_json::Value> = catalog::templates()
            .iter()
            .map(|t| {
                serde_json::json!({
                    "kind": t.kind,
                    "label": t.display_label,
                    "icon": t.icon,
                    "defaultProperties": t.default_properties,
                })
            })
            .collect();
        to_json(&palette, "[]")
    }

    pub fn get_settings(&self) -> String {
        to_json(self.session.settings(), "{}")
    }

    // ─── Forms ───────────────────────────────────────────────────────────

    /// Create a form, make it current, and return its id.
    pub fn create_form(&mut self) -> String {
        self.session.create_form().as_str().to_string()
    }

    pub fn select_form(&mut self, form_id: &str) -> bool {
        self.session.select_form(FormId::intern(form_id))
    }

    pub fn delete_form(&mut self, form_id: &str) -> bool {
        self.session.delete_form(FormId::intern(form_id)).is_some()
    }

    /// Merge `{"title"?, "description"?}` into the current form.
    pub fn update_config(&mut self, patch_json: &str) -> bool {
        match serde_json::from_str::<ConfigPatch>(patch_json) {
            Ok(patch) => self.session.update_config(patch),
            Err(e) => {
                log::warn!("Ignoring malformed config patch: {e}");
                false
            }
        }
    }

    // ─── Elements ────────────────────────────────────────────────────────

    /// Add an element of palette kind `kind` at `position` (negative appends).
    /// Returns the new id, or `""`.
    pub fn add_element(&mut self, kind: &str, position: i32) -> String {
        let position = usize::try_from(position).ok();
        self.session
            .add_element_of_kind(kind, position)
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    /// Merge a JSON property patch into an element.
    pub fn update_element(&mut self, element_id: &str, patch_json: &str) -> bool {
        match serde_json::from_str::<ElementPatch>(patch_json) {
            Ok(patch) => self.session.update_element(ElementId::intern(element_id), patch),
            Err(e) => {
                log::warn!("Ignoring malformed element patch: {e}");
                false
            }
        }
    }

    pub fn remove_element(&mut self, element_id: &str) -> bool {
        self.session.remove_element(ElementId::intern(element_id))
    }

    /// Move an element. Returns the position it landed on, or `-1`.
    pub fn move_element(&mut self, element_id: &str, position: u32) -> i32 {
        self.session
            .move_element(ElementId::intern(element_id), position as usize)
            .and_then(|p| i32::try_from(p).ok())
            .unwrap_or(-1)
    }

    /// Duplicate an element. Returns the copy's id, or `""`.
    pub fn duplicate_element(&mut self, element_id: &str) -> String {
        self.session
            .duplicate_element(ElementId::intern(element_id))
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    /// Select an element by id; `""` clears the selection.
    pub fn select_element(&mut self, element_id: &str) -> bool {
        if element_id.is_empty() {
            return self.session.select_element(None);
        }
        self.session.select_element(Some(ElementId::intern(element_id)))
    }

    pub fn get_selected_id(&self) -> String {
        self.session
            .selected()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        self.session.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.session.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.session.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.session.can_redo()
    }

    /// The recorded actions as JSON: `{"cursor":n|null,"actions":[...]}`.
    pub fn get_history(&self) -> String {
        let history = self.session.history();
        let actions: Vec<_> = history.actions().iter().map(|a| a.summary()).collect();
        to_json(
            &serde_json::json!({ "cursor": history.cursor(), "actions": actions }),
            r#"{"cursor":null,"actions":[]}"#,
        )
    }

    // ─── Keyboard Shortcut API ───────────────────────────────────────────

    /// Handle a keyboard event. Returns JSON
    /// `{"changed":bool,"action":"<name>"|null}`.
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> String {
        let Some(action) = ShortcutMap::resolve(key, ctrl, shift, alt, meta) else {
            return KeyOutcome::default().to_json();
        };
        KeyOutcome {
            changed: self.session.dispatch(action),
            action: Some(action),
        }
        .to_json()
    }

    // ─── Output ──────────────────────────────────────────────────────────

    /// Pretty JSON of the current form, or `""` with none selected.
    pub fn export_json(&self) -> String {
        self.session.export_json().unwrap_or_default()
    }

    /// HTML document of the current form, or `""` with none selected.
    pub fn export_html(&self) -> String {
        self.session.export_html().unwrap_or_default()
    }

    /// Lint diagnostics for the current form as a JSON array.
    pub fn lint(&self) -> String {
        to_json(&self.session.lint(), "[]")
    }

    /// Write the collection now. Returns whether the write landed.
    pub fn save(&mut self) -> bool {
        self.session.save()
    }

    // ─── Resize ──────────────────────────────────────────────────────────

    /// Snapped panel size after a drag, under the session's snap settings.
    pub fn snap_resize(
        &self,
        start_px: f64,
        delta_px: f64,
        total_px: f64,
        min_px: f64,
        max_px: f64,
    ) -> f64 {
        self.session
            .snap_config()
            .with_bounds(min_px, max_px)
            .resize(start_px, delta_px, total_px)
    }

    /// Width class (`"full"`, `"half"`, ...) nearest to `px` of `total_px`.
    pub fn width_class(&self, px: f64, total_px: f64) -> String {
        serde_json::to_value(width_for(px, total_px))
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default()
    }
}

#[derive(Default, Serialize)]
struct KeyOutcome {
    changed: bool,
    action: Option<ShortcutAction>,
}

impl KeyOutcome {
    fn to_json(&self) -> String {
        to_json(self, r#"{"changed":false,"action":null}"#)
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T, fallback: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::warn!("Failed to serialize response: {e}");
        fallback.to_string()
    })
}

#[cfg(target_arch = "wasm32")]
fn open_session(settings: EditorSettings) -> EditorSession {
    match storage::LocalStorage::open() {
        Ok(blobs) => EditorSession::open(blobs, settings),
        Err(e) => {
            log::warn!("Falling back to in-memory storage: {e}");
            EditorSession::open(fb_core::MemoryBlobStore::new(), settings)
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn open_session(settings: EditorSettings) -> EditorSession {
    EditorSession::open(fb_core::MemoryBlobStore::new(), settings)
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("FB WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone validation (no editor needed) ────────────────────────────

/// Validate exported form JSON. Returns
/// `{"ok":true,"diagnostics":[...]}` or `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn validate(form_json: &str) -> String {
    let body = match import_json(form_json) {
        Ok(form) => serde_json::json!({ "ok": true, "diagnostics": lint_form(&form) }),
        Err(e) => serde_json::json!({ "ok": false, "error": e.to_string() }),
    };
    body.to_string()
}
