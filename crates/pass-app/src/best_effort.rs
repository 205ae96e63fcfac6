//! Named wrapper for calls whose failure is deliberately not surfaced.

use std::future::Future;

use pass_core::BackendError;
use tracing::warn;

/// Run `call` and swallow its failure.
///
/// Used for enrichments the primary flow must not depend on (store info
/// refresh, onboarding-complete notification). The failure is logged at
/// `warn` with `operation` so the suppression stays visible.
pub async fn best_effort<T, F>(operation: &'static str, call: F) -> Option<T>
where
    F: Future<Output = Result<T, BackendError>>,
{
    match call.await {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(operation, error = %err, "best-effort call failed, ignoring");
            None
        }
    }
}
