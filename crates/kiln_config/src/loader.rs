//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::KilnConfig;
use std::path::{Path, PathBuf};

/// File name looked up by [`find_config`].
pub const CONFIG_FILE_NAME: &str = "kiln.toml";

/// Loads and validates the configuration file at `path`.
///
/// Relative paths inside the file are later resolved against the file's
/// directory.
pub fn load_config(path: &Path) -> Result<KilnConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut config = load_config_from_str(&content)?;
    config.base_dir = path.parent().map(Path::to_path_buf);
    Ok(config)
}

/// Returns `<dir>/kiln.toml` if it exists.
pub fn find_config(dir: &Path) -> Option<PathBuf> {
    let path = dir.join(CONFIG_FILE_NAME);
    path.is_file().then_some(path)
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<KilnConfig, ConfigError> {
    let config: KilnConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks values that serde alone cannot.
fn validate_config(config: &KilnConfig) -> Result<(), ConfigError> {
    let aspect = config.grid.aspect_ratio;
    if !(aspect.is_finite() && aspect > 0.0) {
        return Err(ConfigError::ValidationError(format!(
            "grid.aspect_ratio must be a finite number > 0, got {aspect}"
        )));
    }
    match (config.grid.width, config.grid.height) {
        (Some(0), _) | (_, Some(0)) => {
            return Err(ConfigError::ValidationError(
                "grid.width and grid.height must be > 0".to_string(),
            ))
        }
        (Some(_), None) => {
            return Err(ConfigError::ValidationError(
                "grid.width requires grid.height".to_string(),
            ))
        }
        (None, Some(_)) => {
            return Err(ConfigError::ValidationError(
                "grid.height requires grid.width".to_string(),
            ))
        }
        _ => {}
    }
    if config.arch.file.as_deref() == Some("") {
        return Err(ConfigError::MissingField("arch.file".to_string()));
    }
    Ok(())
}
