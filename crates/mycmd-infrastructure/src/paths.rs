//! Unified path management for mycmd files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/mycmd/             # Config directory
//! └── config.toml              # Application configuration
//!
//! ~/.local/share/mycmd/        # Data directory
//! ├── store/                   # Key-value store (one file per key)
//! └── mycmd-export-*.json      # Default export location
//! ```

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for mycmd.
pub struct MycmdPaths;

impl MycmdPaths {
    /// Returns the mycmd configuration directory.
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("mycmd"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the mycmd data directory.
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join("mycmd"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the key-value store directory.
    pub fn store_dir() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("store"))
    }
}
