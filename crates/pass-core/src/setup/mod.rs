//! Setup domain module.
//!
//! This module defines the onboarding wizard's prerequisite snapshot and
//! step cursor types.

mod status;
mod step;

pub use status::{DependencyStatus, SetupStatus};
pub use step::{StepGate, WizardStep};
