use anyhow::{Context, Result};
use sifter::config::{CONFIG_FILE_NAME, SifterConfig};
use std::path::{Path, PathBuf};

/// Configuration the CLI is working with, plus where it came from
pub struct ConfigContext {
    /// Path of the loaded file, `None` when running without one
    pub config_path: Option<PathBuf>,
    pub config: SifterConfig,
}

impl ConfigContext {
    /// Load the explicit path if given, otherwise search upward from the current directory
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_path(path),
            None => {
                let current_dir = std::env::current_dir().context("Failed to get current directory")?;
                Self::find_from(&current_dir)
            }
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let config = SifterConfig::load(path).with_context(|| format!("Failed to load {}", path.display()))?;
        Ok(Self {
            config_path: Some(path.to_path_buf()),
            config,
        })
    }

    /// Find `sifter.toml` in `start` or any parent directory. Missing config is not an error.
    pub fn find_from(start: &Path) -> Result<Self> {
        let found = SifterConfig::find_from(start)
            .with_context(|| format!("Failed to load {CONFIG_FILE_NAME} above {}", start.display()))?;
        Ok(match found {
            Some((path, config)) => Self {
                config_path: Some(path),
                config,
            },
            None => Self {
                config_path: None,
                config: SifterConfig::default(),
            },
        })
    }

    pub fn describe_source(&self) -> String {
        match &self.config_path {
            Some(path) => path.display().to_string(),
            None => format!("no {CONFIG_FILE_NAME} found"),
        }
    }
}
