//! Command line defaults
//!
//! Stored in ~/.config/addrtree/config.json. Every field is optional in the
//! file; missing fields fall back to the built-in defaults.

use crate::nybble::Family;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default number of insertions between progress messages
pub const DEFAULT_PROGRESS_INTERVAL: usize = 100_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Insertions between progress messages (0 disables them)
    pub progress_interval: usize,
    /// Snapshot used when no path is given on the command line
    pub tree_path: PathBuf,
    /// Address family for new trees
    pub family: Family,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            tree_path: PathBuf::from("addresses.tree"),
            family: Family::V6,
        }
    }
}

impl Config {
    /// Default config file location
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Could not find config directory".into()))?;
        Ok(config_dir.join("addrtree").join("config.json"))
    }

    /// Load from the default location, or defaults if there is no file
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Ok(path) => Self::load_from(path),
            Err(_) => Ok(Self::default()),
        }
    }

    /// Load from `path`, or defaults if the file does not exist
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Write to `path`, creating parent directories
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config dir: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config: {}", e)))?;
        Ok(())
    }
}
