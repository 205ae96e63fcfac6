use serde::{Deserialize, Serialize};

/// Installation state of one external tool (`pass`, `gpg`, `git`).
///
/// 单个外部依赖的安装状态。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyStatus {
    pub name: String,
    pub installed: bool,
    pub version: Option<String>,
}

/// Prerequisite snapshot reported by the backend.
///
/// 后端报告的前置条件快照。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupStatus {
    /// Every required dependency is installed.
    pub dependencies_ok: bool,
    /// A store already exists on disk.
    pub store_exists: bool,
    pub needs_setup: bool,
    pub first_run: bool,
    #[serde(default)]
    pub dependencies: Vec<DependencyStatus>,
}

impl SetupStatus {
    pub fn missing_dependencies(&self) -> impl Iterator<Item = &DependencyStatus> {
        self.dependencies.iter().filter(|dep| !dep.installed)
    }
}
