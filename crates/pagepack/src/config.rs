//! Optional `pack.toml` configuration.

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::Deserialize;

/// Configuration file structure (pack.toml).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub pack: PackSettings,
}

#[derive(Debug, Deserialize, Default)]
pub struct PackSettings {
    /// Input HTML document
    pub input: Option<PathBuf>,

    /// Output directory
    pub output: Option<PathBuf>,

    /// Pack in place and delete superseded sources
    #[serde(default)]
    pub overwrite: bool,

    /// Route every tagged resource inline
    #[serde(default)]
    pub inline: bool,

    /// Minify emitted CSS
    #[serde(default)]
    pub minify: bool,
}

/// Load configuration from pack.toml if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config() -> Result<ConfigFile> {
    let config_path = PathBuf::from("pack.toml");
    if config_path.exists() {
        let content = fs::read_to_string(&config_path)
            .map_err(|e| anyhow::anyhow!("Failed to read pack.toml: {}", e))?;
        let config: ConfigFile = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse pack.toml: {}", e))?;
        tracing::info!("Loaded config from pack.toml");
        return Ok(config);
    }
    Ok(ConfigFile::default())
}
