use serde::{Deserialize, Serialize};

use super::colour::ColourMode;

/// Configuration from tinylist.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// List directory, relative to the root
    #[serde(default = "default_dir")]
    pub dir: String,
    /// chmod new lists 0777 so they can be edited by hand from any account
    #[serde(default)]
    pub world_writable: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            dir: default_dir(),
            world_writable: false,
        }
    }
}

fn default_dir() -> String {
    "lists".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub colours: ColourMode,
}
