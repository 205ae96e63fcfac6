//! Git synchronization state for an initialized store.

use std::sync::Arc;

use pass_core::{BackendError, PassBackendPort};
use tokio::sync::watch;
use tracing::{debug, info, info_span, warn, Instrument};

/// History length used when the caller has no preference.
pub const DEFAULT_HISTORY_LIMIT: u32 = 20;

const PUSH_FALLBACK: &str = "Failed to push";
const PULL_FALLBACK: &str = "Failed to pull";
const HISTORY_FALLBACK: &str = "Failed to load history";

/// Observable sync state. The error is shared by all sync actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncState {
    pub loading: bool,
    pub error: Option<String>,
    /// Output of the last successful push or pull.
    pub last_output: Option<String>,
    /// Commit lines, newest first.
    pub history: Vec<String>,
}

/// State container for push, pull and history.
pub struct SyncStore {
    backend: Arc<dyn PassBackendPort>,
    state: watch::Sender<SyncState>,
}

impl SyncStore {
    pub fn new(backend: Arc<dyn PassBackendPort>) -> Self {
        let (state, _) = watch::channel(SyncState::default());
        Self { backend, state }
    }

    pub fn subscribe(&self) -> watch::Receiver<SyncState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SyncState {
        self.state.borrow().clone()
    }

    pub async fn push(&self) {
        let span = info_span!("store.sync.push");
        async {
            self.begin();
            let result = self.backend.git_push().await;
            self.record_output(result, PUSH_FALLBACK);
        }
        .instrument(span)
        .await
    }

    pub async fn pull(&self) {
        let span = info_span!("store.sync.pull");
        async {
            self.begin();
            let result = self.backend.git_pull().await;
            self.record_output(result, PULL_FALLBACK);
        }
        .instrument(span)
        .await
    }

    /// Fetch the commit history, `limit` entries at most.
    pub async fn load_history(&self, limit: Option<u32>) {
        let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
        let span = info_span!("store.sync.load_history", limit);
        async {
            self.begin();
            match self.backend.git_log(limit).await {
                Ok(log) => {
                    let history: Vec<String> = log
                        .lines()
                        .map(str::trim)
                        .filter(|line| !line.is_empty())
                        .map(str::to_string)
                        .collect();
                    debug!(count = history.len(), "history loaded");
                    self.state.send_modify(|state| {
                        state.history = history;
                        state.loading = false;
                    });
                }
                Err(err) => self.fail(&err, HISTORY_FALLBACK),
            }
        }
        .instrument(span)
        .await
    }

    fn begin(&self) {
        self.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });
    }

    fn record_output(&self, result: Result<String, BackendError>, fallback: &str) {
        match result {
            Ok(output) => {
                info!("sync finished");
                self.state.send_modify(|state| {
                    state.last_output = Some(output);
                    state.loading = false;
                });
            }
            Err(err) => self.fail(&err, fallback),
        }
    }

    fn fail(&self, err: &BackendError, fallback: &str) {
        warn!(error = %err, "sync action failed");
        self.state.send_modify(|state| {
            state.loading = false;
            state.error = Some(err.display_or(fallback));
        });
    }
}
