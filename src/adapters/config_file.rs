//! JSON file implementation of [`ConfigPort`].
//!
//! The host-side equivalent of firmware NVS config storage: a single JSON
//! document on disk, validated on both load and save.

use std::fs;
use std::path::PathBuf;

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::SystemConfig;

/// Config store backed by a JSON file.
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ConfigPort for FileConfigStore {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SystemConfig::default());
            }
            Err(_) => return Err(ConfigError::IoError),
        };
        let config: SystemConfig =
            serde_json::from_str(&raw).map_err(|_| ConfigError::Corrupted)?;
        config.validate().map_err(ConfigError::ValidationFailed)?;
        Ok(config)
    }

    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError> {
        config.validate().map_err(ConfigError::ValidationFailed)?;
        let json = serde_json::to_string_pretty(config).map_err(|_| ConfigError::Corrupted)?;
        fs::write(&self.path, json).map_err(|_| ConfigError::IoError)
    }
}
