mod loader;
mod types;
pub mod validation;

pub use loader::{load_config, load_config_from_file, CONFIG_FILE_NAME};
pub(crate) use loader::redact_url;
pub use types::*;

use crate::foundation::SigningError;
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV: &str = "MSIG_CONFIG_PATH";
pub const DATA_DIR_ENV: &str = "MSIG_DATA_DIR";

/// Resolve config (env `MSIG_CONFIG_PATH`, else `${data_dir}/msig.toml`), then validate.
pub fn load_app_config() -> Result<AppConfig, SigningError> {
    let data_dir = resolve_data_dir()?;
    let config_path = resolve_config_path(&data_dir)?;
    load_app_config_from_path(&config_path)
}

pub fn load_app_config_from_path(path: &Path) -> Result<AppConfig, SigningError> {
    let config = load_config_from_file(path)?;
    config.validate().map_err(|errors| SigningError::ConfigError(format!("validation failed: {:?}", errors)))?;
    Ok(config)
}

pub fn resolve_config_path(data_dir: &Path) -> Result<PathBuf, SigningError> {
    if let Ok(value) = std::env::var(CONFIG_PATH_ENV) {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed));
        }
    }
    Ok(data_dir.join(CONFIG_FILE_NAME))
}

pub fn resolve_data_dir() -> Result<PathBuf, SigningError> {
    if let Ok(data_dir) = std::env::var(DATA_DIR_ENV) {
        let trimmed = data_dir.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed));
        }
    }
    let cwd = std::env::current_dir()
        .map_err(|err| SigningError::StorageError { operation: "env::current_dir".to_string(), details: err.to_string() })?;
    Ok(cwd.join(".msig"))
}
