use serde::{Deserialize, Serialize};

/// Snapshot of an initialized password store.
///
/// 已初始化密码库的快照。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreInfo {
    /// Location of the store on disk.
    pub store_path: String,
    /// Key id recorded in the store's `.gpg-id`, if any.
    pub gpg_id: Option<String>,
    pub has_git: bool,
    pub git_remote: Option<String>,
}

impl StoreInfo {
    /// Recorded key id, ignoring an empty `.gpg-id`.
    pub fn recorded_key_id(&self) -> Option<&str> {
        self.gpg_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Configured remote URL, ignoring an empty one.
    pub fn remote_url(&self) -> Option<&str> {
        self.git_remote.as_deref().filter(|url| !url.is_empty())
    }
}
