use std::{env, fs, path::PathBuf};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{debug, warn};

use crate::{
    Result,
    fs::{config_dir, state_dir},
};

const CURRENT_CONFIG_VERSION: u16 = 1;
const FILE_NAME: &str = "roster.toml";

/// Environment variable that overrides the configured [`StorageMode`].
pub const STORAGE_ENV: &str = "ROSTER_STORAGE";

/// Where the record list lives between runs.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum StorageMode {
    /// Nothing is read or written; every run starts from the example records.
    #[default]
    InMemory,
    /// Records are saved to the key-value database on every change.
    LocalStorage,
}

/// The backend's core configuration, serialized to TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    version: u16,
    pub storage: StorageMode,
    /// File name of the record database, relative to the state directory
    pub database: String,
}

impl CoreConfig {
    /// Read the configuration file, creating it with defaults if it doesn't exist, then apply
    /// the [`STORAGE_ENV`] override.
    pub fn load() -> Result<Self> {
        let path = config_dir()?.join(FILE_NAME);

        let cfg = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            Self::parse(&contents)
        } else {
            let cfg = Self::default();
            cfg.save()?;
            cfg
        };

        Ok(cfg.with_storage_override(env::var(STORAGE_ENV).ok().as_deref()))
    }

    pub fn save(&self) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;

        fs::write(config_dir()?.join(FILE_NAME), contents)?;

        Ok(())
    }

    /// Parse a configuration file, falling back to defaults if it is malformed.
    pub fn parse(contents: &str) -> Self {
        toml::from_str(contents).unwrap_or_else(|err| {
            warn!("Ignoring malformed configuration: {err}");
            Self::default()
        })
    }

    /// Replace the storage mode with `value` when it names a valid mode.
    pub fn with_storage_override(mut self, value: Option<&str>) -> Self {
        if let Some(value) = value {
            match value.parse() {
                Ok(mode) => {
                    debug!("Storage mode overridden to {mode}");
                    self.storage = mode;
                }
                Err(_) => warn!("Unknown storage mode '{value}', keeping {}", self.storage),
            }
        }

        self
    }

    pub fn database_path(&self) -> Result<PathBuf> {
        Ok(state_dir()?.join(&self.database))
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            version: CURRENT_CONFIG_VERSION,
            storage: StorageMode::InMemory,
            database: "records.db".into(),
        }
    }
}
