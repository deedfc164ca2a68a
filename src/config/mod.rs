pub mod types;

use crate::error::{ConfigError, Result};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = ".aws-bp.toml";

/// Get the global config file path (~/.aws-bp.toml)
pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(CONFIG_FILE_NAME))
}

/// Get the local config file path (./.aws-bp.toml)
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAME)
}

/// Load configuration from file or use defaults
///
/// An explicit path must exist. Otherwise the local config is checked first,
/// then the global one; when neither exists the defaults are used.
pub fn load_config(explicit: Option<&Path>) -> Result<types::Config> {
    if let Some(path) = explicit {
        return read_config(path);
    }

    let local = std::env::current_dir()
        .ok()
        .map(|dir| local_config_path(&dir));
    for candidate in local.into_iter().chain(global_config_path()) {
        if candidate.is_file() {
            return read_config(&candidate);
        }
    }

    log::debug!("No {} found, using defaults", CONFIG_FILE_NAME);
    Ok(types::Config::default())
}

/// Read and parse one config file
pub fn read_config(path: &Path) -> Result<types::Config> {
    log::debug!("Loading configuration from {}", path.display());
    let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<types::Config> {
    let config: types::Config =
        toml::from_str(content).map_err(|e| ConfigError::ParsingFailed(e.to_string()))?;
    if config.audit.timeout_secs == 0 {
        return Err(ConfigError::Invalid("timeout_secs must be greater than 0".to_string()).into());
    }
    Ok(config)
}
