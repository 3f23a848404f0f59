//! JSON file configuration adapter.
//!
//! Implements [`ConfigPort`] over a single JSON document.  Missing fields
//! take their defaults, so a file only needs the values it overrides.
//! Every loaded or saved config is validated first.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::BridgeConfig;
use crate::error::Error;

pub struct JsonConfigStore {
    path: PathBuf,
}

impl JsonConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the file, or fall back to defaults when it does not exist.
    /// Any other failure is returned.
    pub fn load_or_default(&self) -> Result<BridgeConfig, ConfigError> {
        match self.load() {
            Err(ConfigError::NotFound) => {
                warn!(
                    "Config: {} not found, using defaults",
                    self.path.display()
                );
                Ok(BridgeConfig::default())
            }
            other => other,
        }
    }
}

fn validate(config: &BridgeConfig) -> Result<(), ConfigError> {
    config.validate().map_err(|e| match e {
        Error::Config(msg) => ConfigError::ValidationFailed(msg),
        _ => ConfigError::ValidationFailed("invalid configuration"),
    })
}

impl ConfigPort for JsonConfigStore {
    fn load(&self) -> Result<BridgeConfig, ConfigError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(ConfigError::NotFound),
            Err(e) => {
                warn!("Config: cannot read {}: {}", self.path.display(), e);
                return Err(ConfigError::IoError);
            }
        };
        let config: BridgeConfig = serde_json::from_str(&text).map_err(|e| {
            warn!("Config: {} is not valid: {}", self.path.display(), e);
            ConfigError::Corrupted
        })?;
        validate(&config)?;
        info!("Config: loaded {}", self.path.display());
        Ok(config)
    }

    fn save(&self, config: &BridgeConfig) -> Result<(), ConfigError> {
        validate(config)?;
        let text = serde_json::to_string_pretty(config).map_err(|_| ConfigError::IoError)?;
        fs::write(&self.path, text).map_err(|e| {
            warn!("Config: cannot write {}: {}", self.path.display(), e);
            ConfigError::IoError
        })?;
        info!("Config: saved {}", self.path.display());
        Ok(())
    }
}
