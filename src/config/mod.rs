//! Bootstrap configuration asset
//!
//! A single persisted flag decides whether services are bootstrapped
//! automatically at startup.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default location of the configuration asset, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "corestrap/core_config.json";

/// Environment variable that overrides `initialize_on_awake`
pub const INITIALIZE_ON_AWAKE_ENV: &str = "CORESTRAP_INITIALIZE_ON_AWAKE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Run the bootstrap sequence automatically at startup
    pub initialize_on_awake: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            initialize_on_awake: true,
        }
    }
}

impl CoreConfig {
    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    ///
    /// Values that are not recognizable booleans are logged and ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup(INITIALIZE_ON_AWAKE_ENV) {
            match parse_bool(&raw) {
                Some(value) => {
                    tracing::debug!("{} overrides initialize_on_awake = {}", INITIALIZE_ON_AWAKE_ENV, value);
                    self.initialize_on_awake = value;
                }
                None => tracing::warn!(
                    "Ignoring {}={:?}: expected a boolean",
                    INITIALIZE_ON_AWAKE_ENV,
                    raw
                ),
            }
        }
        self
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// The configuration asset on disk
///
/// Changes made through the setters mark the store dirty; [`save`](Self::save)
/// only touches the file when there is something to write.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    config: CoreConfig,
    dirty: bool,
}

impl ConfigStore {
    /// Load the asset at `path`, falling back to defaults if it does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();

        let config = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}, using defaults", path.display());
                CoreConfig::default()
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };

        Ok(Self {
            path,
            config,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> CoreConfig {
        self.config
    }

    pub fn initialize_on_awake(&self) -> bool {
        self.config.initialize_on_awake
    }

    /// Set the flag. Returns `true` if the value changed.
    pub fn set_initialize_on_awake(&mut self, value: bool) -> bool {
        if self.config.initialize_on_awake == value {
            return false;
        }
        self.config.initialize_on_awake = value;
        self.dirty = true;
        true
    }

    /// Flip the flag and return the new value
    pub fn toggle(&mut self) -> bool {
        let value = !self.config.initialize_on_awake;
        self.set_initialize_on_awake(value);
        value
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Persist pending changes. Returns `true` if the file was written.
    pub fn save(&mut self) -> Result<bool, ConfigError> {
        if !self.dirty {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: self.path.clone(),
                source,
            })?;
        }

        let contents = serde_json::to_string_pretty(&self.config).map_err(|source| {
            ConfigError::Parse {
                path: self.path.clone(),
                source,
            }
        })?;
        fs::write(&self.path, contents).map_err(|source| ConfigError::Write {
            path: self.path.clone(),
            source,
        })?;

        tracing::info!(
            "Saved {} (initialize_on_awake = {})",
            self.path.display(),
            self.config.initialize_on_awake
        );
        self.dirty = false;
        Ok(true)
    }
}
