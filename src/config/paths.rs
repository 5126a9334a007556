//! Platform directories for the store, global config and log file.
//!
//! XDG environment variables win; otherwise `directories::ProjectDirs` decides.

use crate::error::ApiError;
use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "simvfs";

fn project_dirs() -> Result<ProjectDirs, ApiError> {
    ProjectDirs::from("", "", APP_NAME).ok_or_else(|| {
        ApiError::ConfigError("Could not determine platform directories (HOME not set)".to_string())
    })
}

/// `$XDG_DATA_HOME/simvfs/store`, or the platform data directory
pub fn default_store_path() -> Result<PathBuf, ApiError> {
    if let Ok(data_home) = std::env::var("XDG_DATA_HOME") {
        if !data_home.is_empty() {
            return Ok(PathBuf::from(data_home).join(APP_NAME).join("store"));
        }
    }
    Ok(project_dirs()?.data_dir().join("store"))
}

/// `$XDG_CONFIG_HOME/simvfs/config.toml`, or the platform config directory
pub fn global_config_path() -> Option<PathBuf> {
    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        if !config_home.is_empty() {
            return Some(PathBuf::from(config_home).join(APP_NAME).join("config.toml"));
        }
    }
    project_dirs()
        .ok()
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Default log file, in the platform state directory when there is one
pub fn default_log_file() -> Result<PathBuf, ApiError> {
    let dirs = project_dirs()?;
    let dir = dirs
        .state_dir()
        .unwrap_or_else(|| dirs.data_local_dir())
        .to_path_buf();
    Ok(dir.join("simvfs.log"))
}
