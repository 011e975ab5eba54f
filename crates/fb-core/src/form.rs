//! Form definitions: title, description, elements, and timestamps.

use crate::elements::ElementList;
use crate::id::FormId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "Untitled Form";
pub const DEFAULT_DESCRIPTION: &str = "Form description";

/// One form and everything it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDefinition {
    pub id: FormId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub elements: ElementList,
    /// Set once on creation.
    pub created_at: DateTime<Utc>,
    /// Bumped on every mutation.
    pub updated_at: DateTime<Utc>,
}

impl FormDefinition {
    /// A new empty form with default title and description.
    pub fn new(id: FormId) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: DEFAULT_TITLE.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            elements: ElementList::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Bump `updated_at`. Never moves backwards.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.updated_at);
    }
}

/// Partial title/description update.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConfigPatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl ConfigPatch {
    pub fn apply(&self, form: &mut FormDefinition) {
        if let Some(title) = &self.title {
            form.title = title.clone();
        }
        if let Some(description) = &self.description {
            form.description = description.clone();
        }
    }
}
