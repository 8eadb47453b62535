pub mod init;
mod schema;
mod validation;

pub use schema::{ChartsConfig, Config, InputConfig, ThemeMode};
pub use validation::validate_config;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.config/vendor-rank/)
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("vendor-rank"))
}

/// Get the default config file path (~/.config/vendor-rank/config.yaml)
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join("config.yaml"))
}

/// Load configuration.
///
/// With an explicit `path` the file must exist. Without one, the default
/// location is tried and a missing file yields the default configuration.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config = match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found at {}", path.display());
            }
            read_config(&path)?
        }
        None => match get_config_path() {
            Some(path) if path.exists() => read_config(&path)?,
            _ => {
                tracing::debug!("no config file, using defaults");
                Config::default()
            }
        },
    };

    if let Err(errors) = validate_config(&config) {
        anyhow::bail!("Invalid config:\n  - {}", errors.join("\n  - "));
    }
    Ok(config)
}

fn read_config(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;
    let config = parse_config(&content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Parse YAML config text. An empty document is the default config.
pub fn parse_config(content: &str) -> Result<Config> {
    if content.trim().is_empty() {
        return Ok(Config::default());
    }
    serde_saphyr::from_str(content).map_err(|e| anyhow::anyhow!("{}", e))
}
