//! Optional `quell.toml` configuration for the demo driver.

use quell_plugin::Mode;
use quell_rules::RuleEntry;
use serde::Deserialize;
use std::path::Path;

/// Errors that can occur when loading or validating a `quell.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(String),

    /// The configured mode is not a recognized value.
    #[error("invalid mode '{0}': expected \"warn\" or \"nowarn\"")]
    InvalidMode(String),
}

/// The `[plugin]` section of a `quell.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct PluginSection {
    /// The plugin mode (`"warn"` or `"nowarn"`).
    pub mode: Option<String>,
}

/// A `quell.toml` file: plugin mode plus extra reclassification rules.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    /// Plugin settings.
    #[serde(default)]
    pub plugin: PluginSection,
    /// Rule entries applied after the built-in family rule.
    #[serde(default)]
    pub rules: Vec<RuleEntry>,
}

impl FileConfig {
    /// Loads and parses a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Returns the configured mode, if any, validated.
    pub fn mode(&self) -> Result<Option<Mode>, ConfigError> {
        self.plugin
            .mode
            .as_deref()
            .map(|s| {
                s.parse::<Mode>()
                    .map_err(|_| ConfigError::InvalidMode(s.to_string()))
            })
            .transpose()
    }
}
