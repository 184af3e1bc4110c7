//! Runtime configuration for the terminal front end.
//!
//! ```toml
//! asset_dir = "assets"
//! save_path = "saves/dungeonWalkerSave.json"
//! viewport_size = 11
//! log_filter = "info"
//! floors = []   # empty: load every floorNN.v0.json found in asset_dir
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engine::DEFAULT_VIEWPORT_SIZE;
use crate::error::ConfigError;

pub const DEFAULT_CONFIG_PATH: &str = "dungeon.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_asset_dir")]
    pub asset_dir: PathBuf,
    #[serde(default = "default_save_path")]
    pub save_path: PathBuf,
    #[serde(default = "default_viewport_size")]
    pub viewport_size: usize,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default)]
    pub floors: Vec<i32>,
}

fn default_asset_dir() -> PathBuf {
    PathBuf::from("assets")
}

fn default_save_path() -> PathBuf {
    PathBuf::from("saves").join("dungeonWalkerSave.json")
}

fn default_viewport_size() -> usize {
    DEFAULT_VIEWPORT_SIZE
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            asset_dir: default_asset_dir(),
            save_path: default_save_path(),
            viewport_size: default_viewport_size(),
            log_filter: default_log_filter(),
            floors: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_toml_str(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(raw) => Self::from_toml_str(&raw, path),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(Config::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.viewport_size == 0 || self.viewport_size % 2 == 0 {
            return Err(ConfigError::Invalid {
                field: "viewport_size",
                message: format!("must be odd and non-zero, got {}", self.viewport_size),
            });
        }
        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "log_filter",
                message: "may not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Relative asset and save paths are taken relative to the config file.
    pub fn resolve_relative_to(mut self, base: &Path) -> Self {
        if self.asset_dir.is_relative() {
            self.asset_dir = base.join(&self.asset_dir);
        }
        if self.save_path.is_relative() {
            self.save_path = base.join(&self.save_path);
        }
        self
    }
}
