use crate::error::AppError;
use crate::task_api::{DEFAULT_DURATION, DEFAULT_PRIORITY, PRIORITY_RANGE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

const CONFIG_DIR_NAME: &str = "todo-queue";
const CONFIG_FILE_NAME: &str = "config.json";
pub const CONFIG_ENV_VAR: &str = "TODO_CONFIG_PATH";

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store_path: Option<PathBuf>,
    #[serde(default)]
    pub default_priority: Option<u8>,
    #[serde(default)]
    pub default_duration: Option<u32>,
}

/// Fallbacks `add` uses when the given priority or duration is unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddDefaults {
    pub priority: u8,
    pub duration: u32,
}

impl Default for AddDefaults {
    fn default() -> Self {
        Self {
            priority: DEFAULT_PRIORITY,
            duration: DEFAULT_DURATION,
        }
    }
}

impl Config {
    /// Configured defaults, ignoring values `add` itself would reject.
    pub fn add_defaults(&self) -> AddDefaults {
        let builtin = AddDefaults::default();
        AddDefaults {
            priority: self
                .default_priority
                .filter(|priority| PRIORITY_RANGE.contains(priority))
                .unwrap_or(builtin.priority),
            duration: self
                .default_duration
                .filter(|duration| *duration > 0)
                .unwrap_or(builtin.duration),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub store_path: Option<PathBuf>,
    pub default_priority: Option<u8>,
    pub default_duration: Option<u32>,
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    let base = dirs::config_dir()
        .ok_or_else(|| AppError::invalid_data("no configuration directory available"))?;
    Ok(base.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Never fails: problems are reported through `ConfigLoad::error` and the
/// defaults are used instead.
pub fn load_config_with_fallback() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => {
            warn!(path = %path.display(), error = %err, "falling back to default config");
            ConfigLoad {
                config: Config::default(),
                error: Some(err),
            }
        }
    }
}

fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })
}

pub fn merge_overrides(base: &Config, overrides: &ConfigOverrides) -> Config {
    let mut merged = base.clone();
    if let Some(path) = overrides.store_path.as_ref() {
        merged.store_path = Some(path.clone());
    }
    if let Some(priority) = overrides.default_priority {
        merged.default_priority = Some(priority);
    }
    if let Some(duration) = overrides.default_duration {
        merged.default_duration = Some(duration);
    }

    merged
}
