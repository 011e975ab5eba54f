pub mod catalog;
pub mod elements;
pub mod export;
pub mod form;
pub mod id;
pub mod lint;
pub mod model;
pub mod persist;
pub mod settings;
pub mod store;

pub use catalog::{ElementTemplate, Markup, templates};
pub use elements::ElementList;
pub use export::{export_html, export_json, import_json};
pub use form::{ConfigPatch, FormDefinition};
pub use id::{ElementId, FormId};
pub use lint::{LintDiagnostic, LintSeverity, lint_form};
pub use model::*;
pub use persist::{BlobStore, FileBlobStore, FormRepository, MemoryBlobStore, PersistError};
pub use settings::{EditorSettings, Theme};
pub use store::{Applied, FormMutation, FormStore};
