use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::EntryError;

pub const RECENT_WINDOW: usize = 5;
pub const DEFAULT_TANK_CAPACITY: f64 = 45.0;

const CONFIG_FILE_NAME: &str = "config.toml";

/// Scalars the statistics engine depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub tank_capacity: f64,
    pub recent_window: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tank_capacity: DEFAULT_TANK_CAPACITY,
            recent_window: RECENT_WINDOW,
        }
    }
}

impl EngineConfig {
    pub fn with_tank_capacity(tank_capacity: f64) -> Self {
        Self {
            tank_capacity,
            ..Self::default()
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub tank_capacity: f64,
    pub recent_window: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tank_capacity: DEFAULT_TANK_CAPACITY,
            recent_window: RECENT_WINDOW,
        }
    }
}

impl AppConfig {
    /// Reads `config.toml` from the data directory, falling back to defaults when absent.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse {}: {}", path.display(), e))?;
        config.validate()?;
        debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    pub fn save(&self, data_dir: &Path) -> Result<()> {
        self.validate()?;
        fs::create_dir_all(data_dir)?;
        let content = toml::to_string_pretty(self)?;
        fs::write(data_dir.join(CONFIG_FILE_NAME), content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), EntryError> {
        if !self.tank_capacity.is_finite() || self.tank_capacity <= 0.0 {
            return Err(EntryError::InvalidConfig(format!(
                "tank_capacity must be positive (got {})",
                self.tank_capacity
            )));
        }
        if self.recent_window == 0 {
            return Err(EntryError::InvalidConfig("recent_window must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn engine(&self) -> EngineConfig {
        EngineConfig {
            tank_capacity: self.tank_capacity,
            recent_window: self.recent_window,
        }
    }
}

/// `~/.fuellog` unless overridden.
pub fn resolve_data_dir(base_dir: Option<PathBuf>) -> Result<PathBuf> {
    match base_dir {
        Some(dir) => Ok(dir),
        None => {
            let home_dir = dirs::home_dir()
                .ok_or_else(|| anyhow!("Could not determine home directory"))?;
            Ok(home_dir.join(".fuellog"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(dir.path()).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.engine(), EngineConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            tank_capacity: 50.0,
            recent_window: 3,
        };
        config.save(dir.path()).unwrap();

        let loaded = AppConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.tank_capacity, 50.0);
        assert_eq!(loaded.engine().recent_window, 3);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "tank_capacity = 60.0\n").unwrap();

        let loaded = AppConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.tank_capacity, 60.0);
        assert_eq!(loaded.recent_window, RECENT_WINDOW);
    }

    #[test]
    fn test_rejects_invalid_values() {
        let config = AppConfig {
            tank_capacity: 0.0,
            recent_window: 5,
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            tank_capacity: 45.0,
            recent_window: 0,
        };
        assert!(config.validate().is_err());
    }
}
