//! Application configuration store.
//!
//! File-backed persistence plus the shared snapshot handle the scheduling
//! and connection components read from. A missing config file is not an
//! error: the store falls back to built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use quotapilot_types::error::ConfigError;
use quotapilot_types::models::AppConfig;

const CONFIG_FILE: &str = "gui_config.json";
const DATA_DIR: &str = ".quotapilot";

/// Get the data directory path, creating it if needed.
pub fn get_data_dir() -> Result<PathBuf, ConfigError> {
    let data_dir = if let Ok(custom_dir) = std::env::var("QUOTAPILOT_DATA_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = dirs::home_dir().ok_or_else(|| ConfigError::WriteError {
            message: "Cannot get home directory".to_string(),
        })?;
        home.join(DATA_DIR)
    };

    if !data_dir.exists() {
        fs::create_dir_all(&data_dir).map_err(|e| ConfigError::from_io_error(&e))?;
    }

    Ok(data_dir)
}

/// Load the application configuration from the default data directory.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&get_data_dir()?)
}

/// Load the application configuration from a specific directory.
/// A missing file yields the built-in defaults.
pub fn load_config_from(data_dir: &Path) -> Result<AppConfig, ConfigError> {
    let config_path = data_dir.join(CONFIG_FILE);

    if !config_path.exists() {
        return Ok(AppConfig::new());
    }

    let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::from_io_error(&e))?;
    serde_json::from_str(&content).map_err(|e| ConfigError::from_json_error(&e))
}

/// Save the application configuration to the default data directory.
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    save_config_to(&get_data_dir()?, config)
}

/// Save the application configuration to a specific directory.
pub fn save_config_to(data_dir: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    let config_path = data_dir.join(CONFIG_FILE);
    let temp_path = data_dir.join(format!("{}.tmp", CONFIG_FILE));

    let content =
        serde_json::to_string_pretty(config).map_err(|e| ConfigError::from_json_error(&e))?;

    // Atomic write
    fs::write(&temp_path, content).map_err(|e| ConfigError::from_io_error(&e))?;
    fs::rename(&temp_path, &config_path).map_err(|e| ConfigError::from_io_error(&e))
}

/// Update specific fields in the stored config.
pub fn update_config<F>(updater: F) -> Result<AppConfig, ConfigError>
where
    F: FnOnce(&mut AppConfig),
{
    let data_dir = get_data_dir()?;
    let mut config = load_config_from(&data_dir)?;
    updater(&mut config);
    save_config_to(&data_dir, &config)?;
    Ok(config)
}

/// Shared configuration snapshot handle.
///
/// The single owned configuration object passed by reference into each
/// component. The settings surface mutates it through `update`; components
/// only ever read whole snapshots, never a half-updated object.
#[derive(Clone)]
pub struct ConfigHandle {
    inner: Arc<RwLock<AppConfig>>,
}

impl ConfigHandle {
    /// Wrap an already-loaded configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { inner: Arc::new(RwLock::new(config)) }
    }

    /// Load from the default data directory.
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self::new(load_config()?))
    }

    /// Current consistent snapshot.
    pub fn snapshot(&self) -> AppConfig {
        self.inner.read().clone()
    }

    /// Apply a mutation and return the resulting snapshot.
    pub fn update<F>(&self, updater: F) -> AppConfig
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut guard = self.inner.write();
        updater(&mut guard);
        guard.clone()
    }
}
