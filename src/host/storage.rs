use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::HighScoreStore;
use crate::utils::{GameError, GameResult};

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: BTreeMap<u32, u32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: u32, value: u32) -> Self {
        let mut store = Self::new();
        store.values.insert(key, value);
        store
    }
}

impl HighScoreStore for MemoryStore {
    fn persist_read(&self, key: u32) -> GameResult<u32> {
        Ok(self.values.get(&key).copied().unwrap_or(0))
    }

    fn persist_write(&mut self, key: u32, value: u32) -> GameResult<()> {
        self.values.insert(key, value);
        Ok(())
    }
}

/// Integer store backed by a JSON object on disk. Every read goes to the
/// file, so values written by an earlier process are always observed.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> GameResult<BTreeMap<u32, u32>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| GameError::storage(format!("Failed to read {:?}: {}", self.path, e)))?;

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content)
            .map_err(|e| GameError::storage(format!("Failed to parse {:?}: {}", self.path, e)))
    }
}

impl HighScoreStore for FileStore {
    fn persist_read(&self, key: u32) -> GameResult<u32> {
        let value = self.load()?.get(&key).copied().unwrap_or(0);
        debug!("Read key {} = {} from {:?}", key, value, self.path);
        Ok(value)
    }

    fn persist_write(&mut self, key: u32, value: u32) -> GameResult<()> {
        let mut values = self.load()?;
        values.insert(key, value);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    GameError::storage(format!("Failed to create data directory: {}", e))
                })?;
            }
        }

        let json = serde_json::to_string_pretty(&values)?;
        std::fs::write(&self.path, json)
            .map_err(|e| GameError::storage(format!("Failed to write {:?}: {}", self.path, e)))?;

        info!("Persisted key {} = {}", key, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_store_defaults_to_zero() {
        let mut store = MemoryStore::new();
        assert_eq!(store.persist_read(1337).unwrap(), 0);

        store.persist_write(1337, 12).unwrap();
        assert_eq!(store.persist_read(1337).unwrap(), 12);
        assert_eq!(store.persist_read(7).unwrap(), 0);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("scores.json");

        let mut store = FileStore::new(&path);
        assert_eq!(store.persist_read(1337).unwrap(), 0);
        store.persist_write(1337, 42).unwrap();
        store.persist_write(1, 3).unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.persist_read(1337).unwrap(), 42);
        assert_eq!(reopened.persist_read(1).unwrap(), 3);
    }

    #[test]
    fn test_file_store_rejects_garbage() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("scores.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileStore::new(&path);
        let err = store.persist_read(1337).unwrap_err();
        assert!(matches!(err, GameError::Storage { .. }));
    }
}
