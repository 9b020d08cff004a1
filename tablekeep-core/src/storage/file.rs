//! File-backed storage: one `<key>.json` file per key.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

use super::{DurableStorage, StorageError};

/// Clones share one write lock.
#[derive(Debug, Clone)]
pub struct FileStorage {
    data_dir: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FileStorage {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the file path for a key. Path separators in the key are
    /// flattened so a key can never escape the data directory.
    pub fn path(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        self.data_dir.join(format!("{}.json", file_name))
    }

    pub fn exists(&self, key: &str) -> bool {
        self.path(key).exists()
    }
}

impl DurableStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Some(contents),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Writes the value, creating the data directory if it doesn't exist.
    ///
    /// Each write goes to its own temporary file in the data directory and is
    /// renamed over the target, so readers only ever see a complete value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        fs::create_dir_all(&self.data_dir)
            .map_err(|e| StorageError::IoError(self.data_dir.clone(), e))?;

        let path = self.path(key);
        let mut tmp = NamedTempFile::new_in(&self.data_dir)
            .map_err(|e| StorageError::IoError(self.data_dir.clone(), e))?;
        tmp.write_all(value.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| StorageError::IoError(tmp.path().to_path_buf(), e))?;
        tmp.persist(&path)
            .map_err(|e| StorageError::IoError(path, e.error))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::IoError(path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_storage() -> (FileStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().to_path_buf());
        (storage, temp_dir)
    }

    #[test]
    fn test_storage_path() {
        let (storage, _temp) = test_storage();
        assert!(storage
            .path("tablekeep.inventory")
            .ends_with("tablekeep.inventory.json"));
        assert!(storage.path("../escape").ends_with(".._escape.json"));
    }

    #[test]
    fn test_get_nonexistent_returns_none() {
        let (storage, _temp) = test_storage();
        assert!(storage.get("tablekeep.menus").is_none());
        assert!(!storage.exists("tablekeep.menus"));
    }

    #[test]
    fn test_set_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested_dir = temp_dir.path().join("nested").join("data");
        let storage = FileStorage::new(nested_dir.clone());

        storage.set("tablekeep.menus", "[]").unwrap();

        assert!(nested_dir.exists());
        assert!(storage.exists("tablekeep.menus"));
    }

    #[test]
    fn test_set_and_get_roundtrip() {
        let (storage, _temp) = test_storage();
        storage.set("k", r#"[{"id":"a"}]"#).unwrap();
        assert_eq!(storage.get("k").unwrap(), r#"[{"id":"a"}]"#);
    }

    #[test]
    fn test_overwrite_existing_value() {
        let (storage, _temp) = test_storage();
        storage.set("k", "1").unwrap();
        storage.set("k", "2").unwrap();
        assert_eq!(storage.get("k").unwrap(), "2");
    }

    #[test]
    fn test_concurrent_writers_never_corrupt_value() {
        let (storage, _temp) = test_storage();

        for round in 0..50 {
            let handles: Vec<_> = (0..4)
                .map(|writer| {
                    let storage = storage.clone();
                    std::thread::spawn(move || {
                        let records: Vec<String> =
                            (0..=writer * 20 + round).map(|i| format!("r{}", i)).collect();
                        let json = serde_json::to_string(&records).unwrap();
                        storage.set("k", &json)
                    })
                })
                .collect();

            for handle in handles {
                handle.join().unwrap().unwrap();
            }

            let stored = storage.get("k").unwrap();
            let parsed: Vec<String> = serde_json::from_str(&stored).unwrap();
            assert!(!parsed.is_empty());
        }

        let leftovers: Vec<_> = fs::read_dir(storage.data_dir())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name() != "k.json")
            .collect();
        assert!(leftovers.is_empty(), "temporary files left behind");
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (storage, _temp) = test_storage();
        storage.set("k", "1").unwrap();
        storage.remove("k").unwrap();
        storage.remove("k").unwrap();
        assert!(storage.get("k").is_none());
    }
}
