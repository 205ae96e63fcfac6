//! # Configuration Loader / 配置加载器
//!
//! Reads the TOML file and maps it onto [`ClientConfig`]. Defaults for
//! missing keys live in the DTO, not here.

use std::path::{Path, PathBuf};

use anyhow::Context;
use pass_core::ClientConfig;
use tracing::debug;

const APP_DIR_NAME: &str = "passdesk";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// # Errors / 错误
///
/// Returns error if the file cannot be read, is not valid TOML, or has keys
/// of the wrong type.
pub fn load_config(config_path: &Path) -> anyhow::Result<ClientConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    ClientConfig::from_toml(&toml_value)
        .with_context(|| format!("Invalid config file: {}", config_path.display()))
}

/// `<config_dir>/passdesk/config.toml`, or `None` when the platform has no
/// config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load `path`, falling back to defaults when the file does not exist.
///
/// A file that exists but cannot be parsed is still an error.
pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<ClientConfig> {
    match path {
        Some(path) if path.exists() => load_config(path),
        Some(path) => {
            debug!(path = %path.display(), "config file not found, using defaults");
            Ok(ClientConfig::default())
        }
        None => Ok(ClientConfig::default()),
    }
}
