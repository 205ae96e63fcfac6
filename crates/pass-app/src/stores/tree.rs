//! Password tree state: snapshot, search, multi-select and detail view.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, PoisonError};

use pass_core::{
    BackendError, ClientConfig, FilterMemo, GeneratorConfig, NameMatcher, PassBackendPort,
    SecretString, Tree, TreeNode,
};
use tokio::sync::watch;
use tracing::{debug, info, info_span, warn, Instrument};

const LOAD_TREE_FALLBACK: &str = "Failed to load store";
const SHOW_ENTRY_FALLBACK: &str = "Failed to load entry";

/// Observable state of the password tree.
///
/// 密码树状态。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeState {
    pub tree: Tree,
    pub selected_path: Option<String>,
    /// Decrypted content or an `Error: ...` surrogate. `None` while loading.
    pub detail_content: Option<String>,
    pub detail_loading: bool,
    pub search_query: String,
    /// Checked leaf paths. May hold stale paths after external deletions.
    pub checked_paths: BTreeSet<String>,
    /// True while at least one tree load is in flight.
    pub loading: bool,
    pub error: Option<String>,
    // Token of the latest detail request; older responses are dropped.
    detail_request: u64,
    loads_in_flight: u32,
}

impl TreeState {
    pub fn is_checked(&self, path: &str) -> bool {
        self.checked_paths.contains(path)
    }

    fn begin_load(&mut self) {
        self.loads_in_flight += 1;
        self.loading = true;
    }

    fn finish_load(&mut self) {
        self.loads_in_flight = self.loads_in_flight.saturating_sub(1);
        self.loading = self.loads_in_flight > 0;
    }

    fn clear_selection(&mut self) {
        self.selected_path = None;
        self.detail_content = None;
        self.detail_loading = false;
        self.detail_request = self.detail_request.wrapping_add(1);
    }
}

/// Errors from tree mutations. These propagate to the caller and leave the
/// local state untouched.
#[derive(Debug, thiserror::Error)]
pub enum TreeStoreError {
    #[error("failed to remove {path}: {source}")]
    Remove {
        path: String,
        #[source]
        source: BackendError,
    },
    #[error("failed to remove {} entries: {source}", paths.len())]
    RemoveBatch {
        paths: Vec<String>,
        #[source]
        source: BackendError,
    },
    #[error("failed to insert {path}: {source}")]
    Insert {
        path: String,
        #[source]
        source: BackendError,
    },
    #[error("failed to generate {path}: {source}")]
    Generate {
        path: String,
        #[source]
        source: BackendError,
    },
    #[error("failed to move {from} to {to}: {source}")]
    Move {
        from: String,
        to: String,
        #[source]
        source: BackendError,
    },
    #[error("failed to copy {from} to {to}: {source}")]
    Copy {
        from: String,
        to: String,
        #[source]
        source: BackendError,
    },
}

impl TreeStoreError {
    pub fn backend_error(&self) -> &BackendError {
        match self {
            Self::Remove { source, .. }
            | Self::RemoveBatch { source, .. }
            | Self::Insert { source, .. }
            | Self::Generate { source, .. }
            | Self::Move { source, .. }
            | Self::Copy { source, .. } => source,
        }
    }

    /// Text for an action-specific failure notice.
    pub fn user_message(&self) -> String {
        let fallback = match self {
            Self::Remove { .. } | Self::RemoveBatch { .. } => "Failed to delete",
            Self::Insert { .. } => "Failed to save entry",
            Self::Generate { .. } => "Failed to generate entry",
            Self::Move { .. } => "Failed to move entry",
            Self::Copy { .. } => "Failed to copy entry",
        };
        self.backend_error().display_or(fallback)
    }
}

/// State container for the password tree.
pub struct TreeStore {
    backend: Arc<dyn PassBackendPort>,
    state: watch::Sender<TreeState>,
    matcher: NameMatcher,
    generator: GeneratorConfig,
    filter_memo: Mutex<FilterMemo>,
}

impl TreeStore {
    pub fn new(backend: Arc<dyn PassBackendPort>) -> Self {
        Self::with_config(backend, &ClientConfig::default())
    }

    pub fn with_config(backend: Arc<dyn PassBackendPort>, config: &ClientConfig) -> Self {
        let (state, _) = watch::channel(TreeState::default());
        Self {
            backend,
            state,
            matcher: NameMatcher::new(config.search.mode),
            generator: config.generator.clone(),
            filter_memo: Mutex::new(FilterMemo::new()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<TreeState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> TreeState {
        self.state.borrow().clone()
    }

    /// Tree projected onto the current search query.
    ///
    /// Memoized on (snapshot identity, query, search mode). With an empty
    /// query this is the snapshot itself.
    pub fn filtered_tree(&self) -> Tree {
        let (tree, query) = {
            let state = self.state.borrow();
            (Arc::clone(&state.tree), state.search_query.clone())
        };
        let mut memo = self
            .filter_memo
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        memo.get(&tree, &query, &self.matcher)
    }

    pub fn set_search_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.state.send_if_modified(|state| {
            if state.search_query == query {
                return false;
            }
            state.search_query = query;
            true
        });
    }

    /// Replace the tree snapshot with the backend's listing.
    ///
    /// A failure keeps the previous snapshot and records the error. Loads may
    /// overlap: the last response wins and `loading` stays set until every
    /// load has finished.
    pub async fn load_tree(&self) {
        let span = info_span!("store.tree.load_tree");
        async {
            self.state.send_modify(|state| {
                state.begin_load();
                state.error = None;
            });

            match self.backend.list_tree().await {
                Ok(nodes) => {
                    debug!(count = nodes.len(), "tree loaded");
                    self.state.send_modify(|state| {
                        state.tree = Arc::new(nodes);
                        state.error = None;
                        state.finish_load();
                    });
                }
                Err(err) => {
                    warn!(error = %err, "failed to load tree");
                    self.state.send_modify(|state| {
                        state.error = Some(err.display_or(LOAD_TREE_FALLBACK));
                        state.finish_load();
                    });
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Select `path` and fetch its decrypted content.
    ///
    /// The selection changes before the request is sent. A response is only
    /// applied if no newer selection was made meanwhile.
    pub async fn show_entry(&self, path: &str) {
        let span = info_span!("store.tree.show_entry", path = %path);
        async {
            let mut token = 0;
            self.state.send_modify(|state| {
                state.detail_request = state.detail_request.wrapping_add(1);
                token = state.detail_request;
                state.selected_path = Some(path.to_string());
                state.detail_content = None;
                state.detail_loading = true;
            });

            let content = match self.backend.show_entry(path).await {
                Ok(content) => content,
                Err(err) => {
                    warn!(error = %err, "failed to load entry");
                    format!("Error: {}", err.display_or(SHOW_ENTRY_FALLBACK))
                }
            };

            let applied = self.state.send_if_modified(|state| {
                if state.detail_request != token {
                    return false;
                }
                state.detail_content = Some(content);
                state.detail_loading = false;
                true
            });
            if !applied {
                debug!("discarding stale detail response");
            }
        }
        .instrument(span)
        .await
    }

    pub fn toggle_checked(&self, path: &str) {
        self.state.send_modify(|state| {
            if !state.checked_paths.remove(path) {
                state.checked_paths.insert(path.to_string());
            }
        });
    }

    /// Check or uncheck every leaf under `node` in one update.
    pub fn toggle_all_in_node(&self, node: &TreeNode, checked: bool) {
        let leaves = node.leaf_paths();
        self.state.send_modify(|state| {
            for path in leaves {
                if checked {
                    state.checked_paths.insert(path.to_string());
                } else {
                    state.checked_paths.remove(path);
                }
            }
        });
    }

    pub fn clear_checked(&self) {
        self.state.send_if_modified(|state| {
            if state.checked_paths.is_empty() {
                return false;
            }
            state.checked_paths.clear();
            true
        });
    }

    /// Delete one entry, then reload the tree.
    pub async fn delete_single(&self, path: &str) -> Result<(), TreeStoreError> {
        let span = info_span!("store.tree.delete_single", path = %path);
        async {
            self.backend.remove_entry(path).await.map_err(|source| {
                warn!(error = %source, "failed to remove entry");
                TreeStoreError::Remove {
                    path: path.to_string(),
                    source,
                }
            })?;

            self.state.send_modify(|state| {
                if state.selected_path.as_deref() == Some(path) {
                    state.clear_selection();
                }
                state.checked_paths.remove(path);
            });
            info!("entry removed");

            self.load_tree().await;
            Ok::<_, TreeStoreError>(())
        }
        .instrument(span)
        .await
    }

    /// Delete every checked entry in one batch, then reload the tree.
    ///
    /// No-op when nothing is checked. The batch is all-or-nothing: on failure
    /// the checked set and selection are left as they were.
    pub async fn delete_selected(&self) -> Result<(), TreeStoreError> {
        let paths: Vec<String> = self.state.borrow().checked_paths.iter().cloned().collect();
        if paths.is_empty() {
            return Ok(());
        }

        let span = info_span!("store.tree.delete_selected", count = paths.len());
        async {
            if let Err(source) = self.backend.remove_batch(&paths).await {
                warn!(error = %source, "failed to remove checked entries");
                return Err(TreeStoreError::RemoveBatch { paths, source });
            }

            self.state.send_modify(|state| {
                let selected_deleted = state
                    .selected_path
                    .as_ref()
                    .is_some_and(|selected| paths.contains(selected));
                if selected_deleted {
                    state.clear_selection();
                }
                state.checked_paths.clear();
            });
            info!("checked entries removed");

            self.load_tree().await;
            Ok(())
        }
        .instrument(span)
        .await
    }

    /// Create or overwrite `path` with `content`, then reload the tree.
    pub async fn insert_entry(
        &self,
        path: &str,
        content: SecretString,
    ) -> Result<String, TreeStoreError> {
        let span = info_span!("store.tree.insert_entry", path = %path);
        async {
            let output = self
                .backend
                .insert_entry(path, &content)
                .await
                .map_err(|source| {
                    warn!(error = %source, "failed to insert entry");
                    TreeStoreError::Insert {
                        path: path.to_string(),
                        source,
                    }
                })?;

            self.after_overwrite(path).await;
            Ok::<_, TreeStoreError>(output)
        }
        .instrument(span)
        .await
    }

    /// Create or overwrite `path` with a generated password.
    ///
    /// Missing arguments fall back to the generator configuration. Returns
    /// the backend's output.
    pub async fn generate_entry(
        &self,
        path: &str,
        length: Option<u32>,
        no_symbols: Option<bool>,
    ) -> Result<String, TreeStoreError> {
        let length = length.unwrap_or(self.generator.length);
        let no_symbols = no_symbols.unwrap_or(self.generator.no_symbols);
        let span = info_span!("store.tree.generate_entry", path = %path, length, no_symbols);
        async {
            let output = self
                .backend
                .generate_entry(path, length, no_symbols)
                .await
                .map_err(|source| {
                    warn!(error = %source, "failed to generate entry");
                    TreeStoreError::Generate {
                        path: path.to_string(),
                        source,
                    }
                })?;

            self.after_overwrite(path).await;
            Ok::<_, TreeStoreError>(output)
        }
        .instrument(span)
        .await
    }

    /// Rename `from` to `to`, then reload the tree.
    ///
    /// A selection on `from` follows the entry to `to`.
    pub async fn move_entry(&self, from: &str, to: &str) -> Result<String, TreeStoreError> {
        let span = info_span!("store.tree.move_entry", from = %from, to = %to);
        async {
            let output = self.backend.move_entry(from, to).await.map_err(|source| {
                warn!(error = %source, "failed to move entry");
                TreeStoreError::Move {
                    from: from.to_string(),
                    to: to.to_string(),
                    source,
                }
            })?;

            let mut was_selected = false;
            self.state.send_modify(|state| {
                state.checked_paths.remove(from);
                was_selected = state.selected_path.as_deref() == Some(from);
            });

            self.load_tree().await;
            if was_selected {
                self.show_entry(to).await;
            }
            Ok::<_, TreeStoreError>(output)
        }
        .instrument(span)
        .await
    }

    /// Duplicate `from` as `to`, then reload the tree.
    pub async fn copy_entry(&self, from: &str, to: &str) -> Result<String, TreeStoreError> {
        let span = info_span!("store.tree.copy_entry", from = %from, to = %to);
        async {
            let output = self.backend.copy_entry(from, to).await.map_err(|source| {
                warn!(error = %source, "failed to copy entry");
                TreeStoreError::Copy {
                    from: from.to_string(),
                    to: to.to_string(),
                    source,
                }
            })?;

            self.load_tree().await;
            Ok::<_, TreeStoreError>(output)
        }
        .instrument(span)
        .await
    }

    // Reload, and refresh the detail pane if it shows the overwritten entry.
    async fn after_overwrite(&self, path: &str) {
        self.load_tree().await;
        let selected = self.state.borrow().selected_path.as_deref() == Some(path);
        if selected {
            self.show_entry(path).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use pass_core::ports::mocks::MockPassBackend;
    use pass_core::SearchMode;

    fn sample_nodes() -> Vec<TreeNode> {
        vec![
            TreeNode::leaf("email", "email"),
            TreeNode::dir(
                "work",
                "work",
                vec![
                    TreeNode::leaf("aws", "work/aws"),
                    TreeNode::leaf("vpn", "work/vpn"),
                ],
            ),
        ]
    }

    #[tokio::test]
    async fn load_tree_failure_keeps_previous_snapshot() {
        let mut backend = MockPassBackend::new();
        let mut calls = 0;
        backend.expect_list_tree().times(2).returning(move || {
            calls += 1;
            if calls == 1 {
                Ok(sample_nodes())
            } else {
                Err(BackendError::from_payload(serde_json::json!({ "code": 1 })))
            }
        });
        let store = TreeStore::new(Arc::new(backend));

        store.load_tree().await;
        let loaded = store.snapshot();
        assert_eq!(*loaded.tree, sample_nodes());
        assert_eq!(loaded.error, None);

        store.load_tree().await;
        let failed = store.snapshot();
        assert!(Arc::ptr_eq(&loaded.tree, &failed.tree));
        assert_eq!(failed.error.as_deref(), Some(LOAD_TREE_FALLBACK));
        assert!(!failed.loading);
    }

    #[tokio::test]
    async fn load_tree_success_clears_previous_error() {
        let mut backend = MockPassBackend::new();
        let mut calls = 0;
        backend.expect_list_tree().times(2).returning(move || {
            calls += 1;
            if calls == 1 {
                Err(BackendError::from("pass: store not found"))
            } else {
                Ok(sample_nodes())
            }
        });
        let store = TreeStore::new(Arc::new(backend));

        store.load_tree().await;
        assert_eq!(store.snapshot().error.as_deref(), Some("pass: store not found"));

        store.load_tree().await;
        assert_eq!(store.snapshot().error, None);
    }

    #[tokio::test]
    async fn show_entry_failure_becomes_display_text() {
        let mut backend = MockPassBackend::new();
        backend
            .expect_show_entry()
            .with(eq("email"))
            .returning(|_| Err(BackendError::from("gpg: decryption failed")));
        let store = TreeStore::new(Arc::new(backend));

        store.show_entry("email").await;

        let state = store.snapshot();
        assert_eq!(state.selected_path.as_deref(), Some("email"));
        assert_eq!(
            state.detail_content.as_deref(),
            Some("Error: gpg: decryption failed")
        );
        assert!(!state.detail_loading);
    }

    #[test]
    fn toggle_all_round_trip_restores_checked_set() {
        let store = TreeStore::new(Arc::new(MockPassBackend::new()));
        store.toggle_checked("email");
        let before = store.snapshot().checked_paths;

        let work = &sample_nodes()[1];
        store.toggle_all_in_node(work, true);
        let checked = store.snapshot().checked_paths;
        assert!(checked.contains("work/aws"));
        assert!(checked.contains("work/vpn"));
        assert!(!checked.contains("work"));

        store.toggle_all_in_node(work, false);
        assert_eq!(store.snapshot().checked_paths, before);
    }

    #[test]
    fn toggle_all_notifies_subscribers() {
        let store = TreeStore::new(Arc::new(MockPassBackend::new()));
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.toggle_all_in_node(&sample_nodes()[1], true);

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().checked_paths.len(), 2);
    }

    #[test]
    fn toggle_checked_flips_membership() {
        let store = TreeStore::new(Arc::new(MockPassBackend::new()));

        store.toggle_checked("email");
        assert!(store.snapshot().is_checked("email"));
        store.toggle_checked("email");
        assert!(!store.snapshot().is_checked("email"));

        store.toggle_checked("work/aws");
        store.clear_checked();
        assert!(store.snapshot().checked_paths.is_empty());
    }

    #[tokio::test]
    async fn filtered_tree_follows_query_and_reuses_projection() {
        let mut backend = MockPassBackend::new();
        backend.expect_list_tree().returning(|| Ok(sample_nodes()));
        let store = TreeStore::new(Arc::new(backend));
        store.load_tree().await;

        let unfiltered = store.filtered_tree();
        assert!(Arc::ptr_eq(&unfiltered, &store.snapshot().tree));

        store.set_search_query("aws");
        let first = store.filtered_tree();
        let second = store.filtered_tree();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first[0].leaf_paths(), vec!["work/aws"]);
    }

    #[tokio::test]
    async fn fuzzy_mode_matches_with_gaps() {
        let mut backend = MockPassBackend::new();
        backend.expect_list_tree().returning(|| Ok(sample_nodes()));
        let mut config = ClientConfig::default();
        config.search.mode = SearchMode::Fuzzy;
        let store = TreeStore::with_config(Arc::new(backend), &config);
        store.load_tree().await;

        store.set_search_query("eml");

        let filtered = store.filtered_tree();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].path, "email");
    }

    #[tokio::test]
    async fn generate_entry_uses_configured_defaults() {
        let mut backend = MockPassBackend::new();
        backend
            .expect_generate_entry()
            .with(eq("web/forum"), eq(25), eq(false))
            .times(1)
            .returning(|_, _, _| Ok("generated".to_string()));
        backend.expect_list_tree().returning(|| Ok(sample_nodes()));
        let store = TreeStore::new(Arc::new(backend));

        let output = store.generate_entry("web/forum", None, None).await.unwrap();

        assert_eq!(output, "generated");
    }

    #[tokio::test]
    async fn generate_entry_explicit_arguments_override_config() {
        let mut backend = MockPassBackend::new();
        backend
            .expect_generate_entry()
            .with(eq("wifi"), eq(12), eq(true))
            .times(1)
            .returning(|_, _, _| Ok("generated".to_string()));
        backend.expect_list_tree().returning(|| Ok(Vec::new()));
        let store = TreeStore::new(Arc::new(backend));

        store
            .generate_entry("wifi", Some(12), Some(true))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn insert_refreshes_selected_entry() {
        let mut backend = MockPassBackend::new();
        backend
            .expect_insert_entry()
            .times(1)
            .returning(|_, _| Ok(String::new()));
        backend.expect_list_tree().returning(|| Ok(sample_nodes()));
        let mut reads = 0;
        backend.expect_show_entry().times(2).returning(move |_| {
            reads += 1;
            Ok(if reads == 1 { "old" } else { "new" }.to_string())
        });
        let store = TreeStore::new(Arc::new(backend));
        store.show_entry("email").await;

        store
            .insert_entry("email", SecretString::new("new"))
            .await
            .unwrap();

        assert_eq!(store.snapshot().detail_content.as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn mutation_failure_reports_backend_text() {
        let mut backend = MockPassBackend::new();
        backend
            .expect_copy_entry()
            .returning(|_, _| Err(BackendError::message("")));
        backend.expect_list_tree().times(0);
        let store = TreeStore::new(Arc::new(backend));

        let err = store.copy_entry("a", "b").await.unwrap_err();

        assert!(matches!(err, TreeStoreError::Copy { .. }));
        assert_eq!(err.user_message(), "Failed to copy entry");
    }
}
