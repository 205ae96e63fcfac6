//! Session wiring.
//!
//! One [`AppSession`] is built per application run and handed to whatever
//! needs a store. There are no module-level store instances.

use std::sync::Arc;

use pass_app::{SyncStore, TreeStore, WizardStore};
use pass_core::{ClientConfig, PassBackendPort};
use tracing::info;

/// All client stores over one shared backend.
pub struct AppSession {
    config: ClientConfig,
    tree: TreeStore,
    wizard: WizardStore,
    sync: SyncStore,
}

impl AppSession {
    pub fn new(backend: Arc<dyn PassBackendPort>, config: ClientConfig) -> Self {
        info!(search_mode = ?config.search.mode, "building app session");
        Self {
            tree: TreeStore::with_config(backend.clone(), &config),
            wizard: WizardStore::new(backend.clone()),
            sync: SyncStore::new(backend),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn tree(&self) -> &TreeStore {
        &self.tree
    }

    pub fn wizard(&self) -> &WizardStore {
        &self.wizard
    }

    pub fn sync(&self) -> &SyncStore {
        &self.sync
    }
}
