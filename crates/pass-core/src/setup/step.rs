//! Wizard step cursor and forward gates.

use serde::{Deserialize, Serialize};

/// Onboarding wizard step.
///
/// The cursor only moves one step at a time and is clamped at both ends.
///
/// 引导向导步骤。
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum WizardStep {
    /// Check that `pass`, `gpg` and `git` are installed.
    #[default]
    Dependencies,
    /// Choose or generate the signing key.
    KeySelection,
    /// Initialize the store or confirm an existing one.
    StoreInit,
    /// Optional source-control setup.
    Remote,
}

/// Facts the forward gates are evaluated against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepGate {
    pub dependencies_ready: bool,
    pub key_selected: bool,
    pub store_initialized: bool,
    pub use_existing_store: bool,
}

impl WizardStep {
    pub const FIRST: Self = Self::Dependencies;
    pub const LAST: Self = Self::Remote;

    pub const fn index(self) -> u8 {
        match self {
            Self::Dependencies => 0,
            Self::KeySelection => 1,
            Self::StoreInit => 2,
            Self::Remote => 3,
        }
    }

    /// Following step, or `self` on the last one.
    pub const fn next(self) -> Self {
        match self {
            Self::Dependencies => Self::KeySelection,
            Self::KeySelection => Self::StoreInit,
            Self::StoreInit | Self::Remote => Self::Remote,
        }
    }

    /// Preceding step, or `self` on the first one.
    pub const fn prev(self) -> Self {
        match self {
            Self::Dependencies | Self::KeySelection => Self::Dependencies,
            Self::StoreInit => Self::KeySelection,
            Self::Remote => Self::StoreInit,
        }
    }

    /// Whether advancing from this step is permitted.
    ///
    /// This is a query only; it never moves the cursor.
    pub const fn can_proceed(self, gate: &StepGate) -> bool {
        match self {
            Self::Dependencies => gate.dependencies_ready,
            Self::KeySelection => gate.key_selected,
            Self::StoreInit => gate.store_initialized || gate.use_existing_store,
            // Remote setup is optional.
            Self::Remote => true,
        }
    }
}
