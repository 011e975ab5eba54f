//! Editor settings.

use crate::persist::DEFAULT_STORAGE_KEY;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Auto,
}

/// Settings for one editing session. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorSettings {
    /// Persist after every mutation. When off, only explicit saves write.
    pub auto_save: bool,
    /// Debounce interval for the UI's auto-save timer, in milliseconds.
    pub save_interval: u32,
    /// Snap resized panels to grid columns instead of fractions.
    pub grid_snap: bool,
    pub show_grid: bool,
    pub theme: Theme,
    /// Maximum number of undo steps kept.
    pub history_depth: usize,
    /// Key the form collection is stored under.
    pub storage_key: String,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            auto_save: true,
            save_interval: 2000,
            grid_snap: true,
            show_grid: false,
            theme: Theme::Light,
            history_depth: 200,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl EditorSettings {
    /// Parse settings JSON, falling back to defaults on malformed input.
    pub fn from_json(json: &str) -> Self {
        serde_json::from_str(json).unwrap_or_else(|e| {
            log::warn!("Ignoring malformed editor settings: {e}");
            Self::default()
        })
    }
}
