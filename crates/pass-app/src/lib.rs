//! Application layer of the passdesk client.
//!
//! Each store is an explicit context object over a shared
//! [`PassBackendPort`](pass_core::PassBackendPort). Stores never talk to each
//! other; they only share the backend.

pub mod best_effort;
pub mod stores;

pub use best_effort::best_effort;
pub use stores::{
    ActionStatus, SyncState, SyncStore, TreeState, TreeStore, TreeStoreError, WizardState,
    WizardStore, DEFAULT_HISTORY_LIMIT,
};
