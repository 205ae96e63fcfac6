use async_trait::async_trait;

use crate::keys::GpgKey;
use crate::ports::BackendError;
use crate::security::SecretString;
use crate::setup::SetupStatus;
use crate::store::{StoreInfo, TreeNode};

/// Request/response contract with the backend process.
///
/// Each call is a single attempt with no timeout or cancellation. Failures
/// carry the backend's payload as a [`BackendError`].
#[async_trait]
pub trait PassBackendPort: Send + Sync {
    // === Store ===

    /// Full tree of the store, ordered as the backend lists it.
    async fn list_tree(&self) -> Result<Vec<TreeNode>, BackendError>;

    /// Decrypted content of one entry.
    async fn show_entry(&self, path: &str) -> Result<String, BackendError>;

    async fn remove_entry(&self, path: &str) -> Result<(), BackendError>;

    /// Remove several entries in one all-or-nothing request.
    async fn remove_batch(&self, paths: &[String]) -> Result<(), BackendError>;

    /// Create or overwrite an entry with multi-line `content`.
    async fn insert_entry(&self, path: &str, content: &SecretString)
        -> Result<String, BackendError>;

    /// Create or overwrite an entry with a generated password.
    async fn generate_entry(
        &self,
        path: &str,
        length: u32,
        no_symbols: bool,
    ) -> Result<String, BackendError>;

    async fn move_entry(&self, from: &str, to: &str) -> Result<String, BackendError>;

    async fn copy_entry(&self, from: &str, to: &str) -> Result<String, BackendError>;

    // === Setup ===

    async fn check_setup_status(&self) -> Result<SetupStatus, BackendError>;

    async fn get_store_info(&self) -> Result<StoreInfo, BackendError>;

    /// Install missing dependencies and report the resulting status.
    async fn install_dependencies(&self) -> Result<SetupStatus, BackendError>;

    async fn list_gpg_keys(&self) -> Result<Vec<GpgKey>, BackendError>;

    async fn generate_gpg_key(
        &self,
        name: &str,
        email: &str,
        passphrase: &SecretString,
    ) -> Result<GpgKey, BackendError>;

    async fn init_store(&self, gpg_id: &str) -> Result<String, BackendError>;

    async fn init_git_repo(&self) -> Result<String, BackendError>;

    async fn add_git_remote(&self, url: &str) -> Result<String, BackendError>;

    async fn mark_setup_complete(&self) -> Result<(), BackendError>;

    // === Sync ===

    async fn git_push(&self) -> Result<String, BackendError>;

    async fn git_pull(&self) -> Result<String, BackendError>;

    /// One-line-per-commit history, newest first.
    async fn git_log(&self, limit: u32) -> Result<String, BackendError>;
}
