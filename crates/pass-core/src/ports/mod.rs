//! Port interfaces for the application layer
//!
//! The client never touches the password store, GPG or git directly. Every
//! read and mutation crosses the backend boundary through
//! [`PassBackendPort`], implemented by the privileged backend process.

mod backend;
pub mod errors;
#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

pub use backend::PassBackendPort;
pub use errors::BackendError;
