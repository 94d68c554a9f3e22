//! TOML file configuration adapter.
//!
//! Implements [`ConfigPort`] over a single TOML file.  A missing file
//! maps to [`ConfigError::NotFound`] so the caller can fall back to
//! defaults; every loaded or saved config is validated first.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::info;

use crate::app::ports::ConfigPort;
use crate::config::RobotConfig;
use crate::error::ConfigError;

pub struct ConfigFileAdapter {
    path: PathBuf,
}

impl ConfigFileAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigPort for ConfigFileAdapter {
    fn load(&self) -> Result<RobotConfig, ConfigError> {
        let text = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ConfigError::NotFound,
            _ => ConfigError::Io(e),
        })?;
        let config: RobotConfig =
            toml::from_str(&text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        info!("Loaded config from {}", self.path.display());
        Ok(config)
    }

    fn save(&self, config: &RobotConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let text = toml::to_string_pretty(config).map_err(|e| ConfigError::Parse(e.to_string()))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, text)?;
        info!("Saved config to {}", self.path.display());
        Ok(())
    }
}
