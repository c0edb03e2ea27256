//! Filesystem-backed key-value store.
//!
//! One file per storage key, named exactly like the key, under the store
//! directory. Writes go through a temp file and an atomic rename so a
//! crash mid-write can never leave a half-written value behind.

use std::fs;
use std::path::{Path, PathBuf};

use mycmd_core::error::Result;
use mycmd_core::store::KeyValueStore;

use crate::paths::MycmdPaths;

/// Durable store persisting each key as its own file.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at the given directory, creating it if
    /// needed.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Creates a store at the default location (~/.local/share/mycmd/store).
    pub fn default_location() -> Result<Self> {
        let dir = MycmdPaths::store_dir()
            .map_err(|err| mycmd_core::MycmdError::Io(err.to_string()))?;
        Self::new(dir)
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.key_path(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key);
        let tmp = self.dir.join(format!("{key}.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        let mut keys: Vec<String> = entries
            .flatten()
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| !name.ends_with(".tmp"))
            .collect();
        keys.sort();
        keys
    }
}
