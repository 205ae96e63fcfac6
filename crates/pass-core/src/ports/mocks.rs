//! Mock implementation of [`PassBackendPort`] for testing.
//!
//! Generated with `mockall`; enable the `test-utils` feature to use it from
//! other crates.

use async_trait::async_trait;
use mockall::mock;

use crate::keys::GpgKey;
use crate::ports::{BackendError, PassBackendPort};
use crate::security::SecretString;
use crate::setup::SetupStatus;
use crate::store::{StoreInfo, TreeNode};

mock! {
    pub PassBackend {}

    #[async_trait]
    impl PassBackendPort for PassBackend {
        async fn list_tree(&self) -> Result<Vec<TreeNode>, BackendError>;
        async fn show_entry(&self, path: &str) -> Result<String, BackendError>;
        async fn remove_entry(&self, path: &str) -> Result<(), BackendError>;
        async fn remove_batch(&self, paths: &[String]) -> Result<(), BackendError>;
        async fn insert_entry(&self, path: &str, content: &SecretString)
            -> Result<String, BackendError>;
        async fn generate_entry(
            &self,
            path: &str,
            length: u32,
            no_symbols: bool,
        ) -> Result<String, BackendError>;
        async fn move_entry(&self, from: &str, to: &str) -> Result<String, BackendError>;
        async fn copy_entry(&self, from: &str, to: &str) -> Result<String, BackendError>;
        async fn check_setup_status(&self) -> Result<SetupStatus, BackendError>;
        async fn get_store_info(&self) -> Result<StoreInfo, BackendError>;
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
        async fn git_push(&self) -> Result<String, BackendError>;
        async fn git_pull(&self) -> Result<String, BackendError>;
        async fn git_log(&self, limit: u32) -> Result<String, BackendError>;
    }
}
