//! Client state containers.

mod action;
mod sync;
mod tree;
mod wizard;

pub use action::ActionStatus;
pub use sync::{SyncState, SyncStore, DEFAULT_HISTORY_LIMIT};
pub use tree::{TreeState, TreeStore, TreeStoreError};
pub use wizard::{WizardState, WizardStore};
