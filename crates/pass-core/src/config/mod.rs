//! # Client configuration / 客户端配置
//!
//! Pure data: TOML → DTO mapping with defaults for missing keys.
//! Reading the file from disk is the bootstrap layer's job.

use serde::{Deserialize, Serialize};

use crate::search::SearchMode;

/// Default length for generated entries, matching `pass generate`.
pub const DEFAULT_GENERATED_LENGTH: u32 = 25;

/// Client configuration DTO.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub search: SearchConfig,
    pub generator: GeneratorConfig,
    pub logging: LoggingConfig,
}

/// Tree search settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub mode: SearchMode,
}

/// Defaults for `generate` requests that omit arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub length: u32,
    pub no_symbols: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            length: DEFAULT_GENERATED_LENGTH,
            no_symbols: false,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive overriding the build-profile default (`RUST_LOG` still wins).
    pub level: Option<String>,
    /// Also write a daily-rotated log file under the data directory.
    pub log_to_file: bool,
}

impl ClientConfig {
    /// Create ClientConfig from a parsed TOML value.
    ///
    /// Missing sections and keys fall back to defaults. Keys with the wrong
    /// type or an unknown search mode are reported as errors.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let config = toml_value.clone().try_into::<Self>()?;
        Ok(config)
    }
}
