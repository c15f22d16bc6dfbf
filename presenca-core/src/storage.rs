//! JSON snapshot storage for the local caches.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The two snapshots kept on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotKind {
    /// Attendance ledger.
    Records,
    /// Rosters and the class-id map.
    Rosters,
}

impl SnapshotKind {
    pub fn filename(&self) -> &'static str {
        match self {
            SnapshotKind::Records => "registros.json",
            SnapshotKind::Rosters => "alunos.json",
        }
    }
}

/// Reads and writes snapshots under one data directory.
#[derive(Debug, Clone)]
pub struct SnapshotStorage {
    data_dir: PathBuf,
}

impl SnapshotStorage {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn path(&self, kind: SnapshotKind) -> PathBuf {
        self.data_dir.join(kind.filename())
    }

    pub fn exists(&self, kind: SnapshotKind) -> bool {
        self.path(kind).exists()
    }

    /// Loads a snapshot.
    ///
    /// Returns `Ok(None)` if the file doesn't exist.
    pub fn load<T: DeserializeOwned>(&self, kind: SnapshotKind) -> Result<Option<T>, StorageError> {
        let path = self.path(kind);

        match fs::read(&path) {
            Ok(bytes) => {
                let value = serde_json::from_slice(&bytes)
                    .map_err(|e| StorageError::ParseError(path, e.to_string()))?;
                Ok(Some(value))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::IoError(path, e)),
        }
    }

    /// Writes a snapshot, creating the data directory if needed.
    ///
    /// The file is written to a temporary sibling first and renamed, so a
    /// crash mid-write leaves the previous snapshot intact.
    pub fn save<T: Serialize>(&self, kind: SnapshotKind, value: &T) -> Result<(), StorageError> {
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| StorageError::IoError(self.data_dir.clone(), e))?;

        let path = self.path(kind);
        let bytes = serde_json::to_vec_pretty(value)
            .map_err(|e| StorageError::ParseError(path.clone(), e.to_string()))?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, bytes).map_err(|e| StorageError::IoError(tmp.clone(), e))?;
        fs::rename(&tmp, &path).map_err(|e| StorageError::IoError(path, e))?;

        Ok(())
    }
}

/// Errors that can occur while reading or writing snapshots.
#[derive(Debug)]
pub enum StorageError {
    /// I/O error reading or writing a file.
    IoError(PathBuf, io::Error),
    /// The file is not valid JSON for the expected shape.
    ParseError(PathBuf, String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::IoError(path, e) => {
                write!(f, "I/O error for {}: {}", path.display(), e)
            }
            StorageError::ParseError(path, e) => {
                write!(f, "Invalid snapshot {}: {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::IoError(_, e) => Some(e),
            StorageError::ParseError(_, _) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn test_storage() -> (SnapshotStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = SnapshotStorage::new(temp_dir.path());
        (storage, temp_dir)
    }

    #[test]
    fn test_storage_path() {
        let (storage, _temp) = test_storage();
        assert!(storage.path(SnapshotKind::Records).ends_with("registros.json"));
        assert!(storage.path(SnapshotKind::Rosters).ends_with("alunos.json"));
    }

    #[test]
    fn test_load_nonexistent_returns_none() {
        let (storage, _temp) = test_storage();
        let loaded: Option<Vec<String>> = storage.load(SnapshotKind::Records).unwrap();
        assert!(loaded.is_none());
        assert!(!storage.exists(SnapshotKind::Records));
    }

    #[test]
    fn test_save_and_load() {
        let (storage, _temp) = test_storage();
        let mut map = BTreeMap::new();
        map.insert("Jovens".to_string(), vec!["Ana".to_string(), "Zico".to_string()]);

        storage.save(SnapshotKind::Rosters, &map).unwrap();
        assert!(storage.exists(SnapshotKind::Rosters));
        assert!(!storage.exists(SnapshotKind::Records));

        let loaded: BTreeMap<String, Vec<String>> =
            storage.load(SnapshotKind::Rosters).unwrap().unwrap();
        assert_eq!(loaded, map);
    }

    #[test]
    fn test_save_creates_data_dir() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        let storage = SnapshotStorage::new(&nested);

        storage.save(SnapshotKind::Records, &vec![1, 2, 3]).unwrap();
        assert!(nested.join("registros.json").exists());
        assert!(!nested.join("registros.json.tmp").exists());
    }

    #[test]
    fn test_load_corrupt_file_is_parse_error() {
        let (storage, _temp) = test_storage();
        fs::write(storage.path(SnapshotKind::Records), b"{not json").unwrap();

        let result: Result<Option<Vec<String>>, _> = storage.load(SnapshotKind::Records);
        assert!(matches!(result, Err(StorageError::ParseError(_, _))));
    }
}
