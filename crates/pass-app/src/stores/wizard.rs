//! Onboarding wizard state.
//!
//! Four linear steps: dependency check, key selection, store initialization
//! and optional remote setup. `can_proceed_from_step` only answers whether
//! advancing is allowed; `next_step` never consults it, so the UI can render
//! a disabled control instead of a silently rejected action.

use std::sync::Arc;

use pass_core::{
    preferred_key, BackendError, GpgKey, PassBackendPort, SecretString, SetupStatus, StepGate,
    StoreInfo, WizardStep,
};
use tokio::sync::watch;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::best_effort::best_effort;
use crate::stores::ActionStatus;

const CHECK_STATUS_FALLBACK: &str = "Failed to check status";
const INSTALL_FALLBACK: &str = "Failed to install";
const LIST_KEYS_FALLBACK: &str = "Failed to list keys";
const GENERATE_KEY_FALLBACK: &str = "Failed to generate key";
const INIT_STORE_FALLBACK: &str = "Failed to init store";
const SETUP_GIT_FALLBACK: &str = "Failed to setup git";

/// Observable onboarding state.
///
/// 引导向导状态。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardState {
    pub current_step: WizardStep,
    pub setup_status: Option<SetupStatus>,
    pub store_info: Option<StoreInfo>,
    pub gpg_keys: Vec<GpgKey>,
    pub selected_key_id: Option<String>,
    pub git_enabled: bool,
    pub remote_url: String,
    pub store_initialized: bool,
    pub use_existing_store: bool,
    pub git_configured: bool,

    pub deps: ActionStatus,
    pub install: ActionStatus,
    pub keys: ActionStatus,
    pub generate_key: ActionStatus,
    pub init: ActionStatus,
    pub git: ActionStatus,
}

impl WizardState {
    pub fn step_gate(&self) -> StepGate {
        StepGate {
            dependencies_ready: self
                .setup_status
                .as_ref()
                .is_some_and(|status| status.dependencies_ok),
            key_selected: self.selected_key_id.is_some(),
            store_initialized: self.store_initialized,
            use_existing_store: self.use_existing_store,
        }
    }

    /// Whether the wizard may advance from the current step.
    pub fn can_proceed_from_step(&self) -> bool {
        self.current_step.can_proceed(&self.step_gate())
    }

    /// Whether the last fetched status asks for onboarding. False before any fetch.
    pub fn needs_onboarding(&self) -> bool {
        self.setup_status
            .as_ref()
            .is_some_and(|status| status.needs_setup)
    }
}

/// State container for the onboarding wizard.
pub struct WizardStore {
    backend: Arc<dyn PassBackendPort>,
    state: watch::Sender<WizardState>,
}

impl WizardStore {
    pub fn new(backend: Arc<dyn PassBackendPort>) -> Self {
        let (state, _) = watch::channel(WizardState::default());
        Self { backend, state }
    }

    pub fn subscribe(&self) -> watch::Receiver<WizardState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> WizardState {
        self.state.borrow().clone()
    }

    pub fn can_proceed_from_step(&self) -> bool {
        self.state.borrow().can_proceed_from_step()
    }

    pub fn needs_onboarding(&self) -> bool {
        self.state.borrow().needs_onboarding()
    }

    // === Step cursor ===

    pub fn next_step(&self) {
        self.move_cursor(WizardStep::next);
    }

    pub fn prev_step(&self) {
        self.move_cursor(WizardStep::prev);
    }

    fn move_cursor(&self, step: fn(WizardStep) -> WizardStep) {
        self.state.send_if_modified(|state| {
            let target = step(state.current_step);
            if target == state.current_step {
                return false;
            }
            debug!(from = ?state.current_step, to = ?target, "wizard step changed");
            state.current_step = target;
            true
        });
    }

    // === UI input ===

    pub fn select_key(&self, key_id: impl Into<String>) {
        let key_id = key_id.into();
        self.state
            .send_modify(|state| state.selected_key_id = Some(key_id));
    }

    pub fn set_git_enabled(&self, enabled: bool) {
        self.state.send_modify(|state| state.git_enabled = enabled);
    }

    pub fn set_remote_url(&self, url: impl Into<String>) {
        let url = url.into();
        self.state.send_modify(|state| state.remote_url = url);
    }

    /// Proceed with the store already on disk instead of initializing one.
    pub fn confirm_existing_store(&self) {
        self.state
            .send_modify(|state| state.use_existing_store = true);
    }

    // === Backend operations ===

    /// Fetch dependency and store status.
    ///
    /// A store found on disk counts as initialized.
    pub async fn check_status(&self) {
        let span = info_span!("store.wizard.check_status");
        async {
            self.state.send_modify(|state| state.deps.begin());

            match self.backend.check_setup_status().await {
                Ok(status) => {
                    debug!(
                        dependencies_ok = status.dependencies_ok,
                        store_exists = status.store_exists,
                        "setup status fetched"
                    );
                    self.state.send_modify(|state| {
                        if status.store_exists {
                            state.store_initialized = true;
                        }
                        state.setup_status = Some(status);
                        state.deps.succeed();
                    });
                }
                Err(err) => {
                    warn!(error = %err, "failed to check setup status");
                    self.state
                        .send_modify(|state| state.deps.fail(&err, CHECK_STATUS_FALLBACK));
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Fetch store metadata. Best-effort: a failure leaves state unchanged.
    pub async fn load_store_info(&self) {
        let span = info_span!("store.wizard.load_store_info");
        async {
            let Some(info) = best_effort("get_store_info", self.backend.get_store_info()).await
            else {
                return;
            };

            self.state.send_modify(|state| {
                if let Some(remote) = info.remote_url() {
                    state.remote_url = remote.to_string();
                    state.git_enabled = true;
                }
                state.store_info = Some(info);
            });
        }
        .instrument(span)
        .await
    }

    /// Install missing dependencies; the response replaces the status snapshot.
    pub async fn install_deps(&self) {
        let span = info_span!("store.wizard.install_deps");
        async {
            self.state.send_modify(|state| state.install.begin());

            match self.backend.install_dependencies().await {
                Ok(status) => {
                    info!(
                        dependencies_ok = status.dependencies_ok,
                        "dependency installation finished"
                    );
                    self.state.send_modify(|state| {
                        state.setup_status = Some(status);
                        state.install.succeed();
                    });
                }
                Err(err) => {
                    warn!(error = %err, "failed to install dependencies");
                    self.state
                        .send_modify(|state| state.install.fail(&err, INSTALL_FALLBACK));
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Fetch signing keys and preselect one.
    ///
    /// A single key is selected outright; a key matching the store's
    /// recorded id wins over that. Otherwise the selection is kept.
    pub async fn load_gpg_keys(&self) {
        let span = info_span!("store.wizard.load_gpg_keys");
        async {
            self.state.send_modify(|state| state.keys.begin());

            match self.backend.list_gpg_keys().await {
                Ok(keys) => {
                    debug!(count = keys.len(), "signing keys listed");
                    self.state.send_modify(|state| {
                        let recorded = state
                            .store_info
                            .as_ref()
                            .and_then(StoreInfo::recorded_key_id);
                        if let Some(key) = preferred_key(&keys, recorded) {
                            state.selected_key_id = Some(key.key_id.clone());
                        }
                        state.gpg_keys = keys;
                        state.keys.succeed();
                    });
                }
                Err(err) => {
                    warn!(error = %err, "failed to list signing keys");
                    self.state
                        .send_modify(|state| state.keys.fail(&err, LIST_KEYS_FALLBACK));
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Create a signing key, append it to the list and select it.
    pub async fn generate_key(&self, name: &str, email: &str, passphrase: SecretString) {
        let span = info_span!("store.wizard.generate_key", email = %email);
        async {
            self.state.send_modify(|state| state.generate_key.begin());

            match self.backend.generate_gpg_key(name, email, &passphrase).await {
                Ok(key) => {
                    info!(key_id = %key.key_id, "signing key generated");
                    self.state.send_modify(|state| {
                        state.selected_key_id = Some(key.key_id.clone());
                        state.gpg_keys.push(key);
                        state.generate_key.succeed();
                    });
                }
                Err(err) => {
                    warn!(error = %err, "failed to generate signing key");
                    self.state.send_modify(|state| {
                        state.generate_key.fail(&err, GENERATE_KEY_FALLBACK)
                    });
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Initialize the store with the selected key. No-op without a selection.
    ///
    /// Store info is not refreshed; call [`Self::load_store_info`] for that.
    pub async fn init_store(&self) {
        let Some(key_id) = self.state.borrow().selected_key_id.clone() else {
            debug!("no signing key selected, skipping store init");
            return;
        };

        let span = info_span!("store.wizard.init_store", key_id = %key_id);
        async {
            self.state.send_modify(|state| state.init.begin());

            match self.backend.init_store(&key_id).await {
                Ok(_) => {
                    info!("password store initialized");
                    self.state.send_modify(|state| {
                        state.store_initialized = true;
                        state.init.succeed();
                    });
                }
                Err(err) => {
                    warn!(error = %err, "failed to initialize store");
                    self.state
                        .send_modify(|state| state.init.fail(&err, INIT_STORE_FALLBACK));
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Initialize the git repository and add the entered remote, if any.
    ///
    /// The remote is only added after the repository init succeeded. On
    /// success store info is refreshed best-effort.
    pub async fn setup_git(&self) {
        let span = info_span!("store.wizard.setup_git");
        async {
            let remote = {
                let state = self.state.borrow();
                state.remote_url.trim().to_string()
            };
            self.state.send_modify(|state| state.git.begin());

            let result = async {
                self.backend.init_git_repo().await?;
                if !remote.is_empty() {
                    self.backend.add_git_remote(&remote).await?;
                }
                Ok::<(), BackendError>(())
            }
            .await;

            match result {
                Ok(()) => {
                    info!(with_remote = !remote.is_empty(), "git configured");
                    self.state.send_modify(|state| state.git_configured = true);
                    self.load_store_info().await;
                    self.state.send_modify(|state| state.git.succeed());
                }
                Err(err) => {
                    warn!(error = %err, "failed to set up git");
                    self.state
                        .send_modify(|state| state.git.fail(&err, SETUP_GIT_FALLBACK));
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Tell the backend onboarding finished. Best-effort.
    pub async fn mark_complete(&self) {
        let span = info_span!("store.wizard.mark_complete");
        async {
            if best_effort("mark_setup_complete", self.backend.mark_setup_complete())
                .await
                .is_some()
            {
                info!("onboarding marked complete");
            }
        }
        .instrument(span)
        .await
    }
}
