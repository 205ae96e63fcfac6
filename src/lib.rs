//! # passdesk
//!
//! Client state layer of a desktop password-store manager.
//!
//! The stores live in `pass-app`, the models and the backend port in
//! `pass-core`. This crate wires them together for one application session.

pub mod bootstrap;

pub use bootstrap::session::AppSession;
pub use pass_app::{SyncStore, TreeStore, WizardStore};
pub use pass_core::{ClientConfig, PassBackendPort};
