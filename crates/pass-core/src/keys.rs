//! Signing-key identities and the wizard's preselection policy.

use serde::{Deserialize, Serialize};

/// A GPG secret key the store can be initialized with.
///
/// 可用于初始化密码库的 GPG 密钥。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpgKey {
    pub key_id: String,
    /// Human-readable user id, e.g. `Jane Doe <jane@example.com>`.
    pub uid: String,
    pub fingerprint: String,
}

impl GpgKey {
    /// Whether `id` names this key.
    ///
    /// A store may record a short id while enumeration returns full
    /// fingerprints, so a fingerprint suffix also counts.
    pub fn matches_id(&self, id: &str) -> bool {
        !id.is_empty() && (self.key_id == id || self.fingerprint.ends_with(id))
    }
}

/// Key to preselect after enumerating `keys`.
///
/// A single available key is chosen by default. A key matching the store's
/// recorded id takes precedence over that default. `None` means the current
/// selection should be left alone.
pub fn preferred_key<'a>(keys: &'a [GpgKey], recorded_id: Option<&str>) -> Option<&'a GpgKey> {
    let single = match keys {
        [only] => Some(only),
        _ => None,
    };
    let recorded = recorded_id.and_then(|id| keys.iter().find(|key| key.matches_id(id)));
    recorded.or(single)
}
