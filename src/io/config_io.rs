use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

pub const CONFIG_FILE: &str = "tinylist.toml";

/// Error type for loading tinylist.toml
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse tinylist.toml: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Load `<root>/tinylist.toml`, falling back to defaults when it doesn't exist.
pub fn load_config(root: &Path) -> Result<Config, ConfigError> {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(Config::default());
    }
    let text = fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    Ok(toml::from_str(&text)?)
}

/// The list directory a config points at
pub fn lists_dir(root: &Path, config: &Config) -> PathBuf {
    root.join(&config.store.dir)
}
