pub mod history;
pub mod resize;
pub mod session;
pub mod shortcuts;

pub use history::{ActionKind, ActionSummary, HistoryAction, HistoryLog, PendingAction};
pub use resize::{SnapConfig, SnapMode};
pub use session::EditorSession;
pub use shortcuts::{ShortcutAction, ShortcutMap};
