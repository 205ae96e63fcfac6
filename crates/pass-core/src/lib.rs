//! # pass-core
//!
//! Core domain models and pure logic for the passdesk client.
//!
//! This crate contains no I/O. Everything that touches the password store,
//! GPG or git sits behind [`ports::PassBackendPort`], implemented by the
//! privileged backend process.

pub mod config;
pub mod keys;
pub mod ports;
pub mod search;
pub mod security;
pub mod setup;
pub mod store;

// Re-export commonly used types at the crate root
pub use config::{ClientConfig, GeneratorConfig, LoggingConfig, SearchConfig};
pub use keys::{preferred_key, GpgKey};
pub use ports::{BackendError, PassBackendPort};
pub use search::{NameMatcher, SearchMode};
pub use security::SecretString;
pub use setup::{DependencyStatus, SetupStatus, StepGate, WizardStep};
pub use store::{filter_tree, FilterMemo, StoreInfo, Tree, TreeNode};
