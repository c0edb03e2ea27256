//! Configuration file loading.

use std::fs;
use std::path::PathBuf;

use mycmd_core::Config;
use tracing::warn;

use crate::paths::MycmdPaths;

/// Loads `config.toml`, falling back to defaults when the file is missing
/// or unreadable. A corrupt file is reported and ignored rather than
/// blocking startup.
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    /// Creates storage pointing at the default path
    /// (~/.config/mycmd/config.toml).
    pub fn new() -> Result<Self, crate::paths::PathError> {
        Ok(Self {
            path: MycmdPaths::config_file()?,
        })
    }

    /// Creates storage with a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the configuration, substituting defaults on any failure.
    pub fn load(&self) -> Config {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return Config::default(),
        };
        match toml::from_str(&raw) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "ignoring corrupt config");
                Config::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ConfigStorage::with_path(temp_dir.path().join("config.toml"));
        assert_eq!(storage.load(), Config::default());
    }

    #[test]
    fn test_load_valid_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "secret_word = \"nami\"\nprompt = \"captain> \"\n").unwrap();

        let config = ConfigStorage::with_path(path).load();
        assert_eq!(config.secret_word, "nami");
        assert_eq!(config.prompt, "captain> ");
    }

    #[test]
    fn test_corrupt_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "secret_word = [this is not toml").unwrap();

        assert_eq!(ConfigStorage::with_path(path).load(), Config::default());
    }
}
