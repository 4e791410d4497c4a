//! Filesystem storage.
//!
//! Handles reading and writing the data directory:
//! - The current season snapshot (`data.json`)
//! - The hall of fame archive
//! - Season baselines used by the season builder

mod snapshot_store;

pub use snapshot_store::SnapshotStore;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::SnapshotConfig;
use crate::models::{SeasonArchive, Snapshot};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Duplicate player name in snapshot: {0}")]
    DuplicatePlayer(String),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub snapshot_file: String,
    pub hall_of_fame_file: String,
    pub baseline_file: String,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self::from_parts(data_dir, &SnapshotConfig::default())
    }

    pub fn from_parts(data_dir: PathBuf, files: &SnapshotConfig) -> Self {
        Self {
            data_dir,
            snapshot_file: files.file.clone(),
            hall_of_fame_file: files.hall_of_fame_file.clone(),
            baseline_file: files.baseline_file.clone(),
        }
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(&self.snapshot_file)
    }

    pub fn hall_of_fame_path(&self) -> PathBuf {
        self.data_dir.join(&self.hall_of_fame_file)
    }

    pub fn baseline_path(&self) -> PathBuf {
        self.data_dir.join(&self.baseline_file)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

/// Read and parse a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    if !path.exists() {
        return Err(StorageError::PathNotFound(path.to_path_buf()));
    }
    let contents = fs::read_to_string(path)?;
    let value = serde_json::from_str(&contents)?;
    debug!("Read {:?}", path);
    Ok(value)
}

/// Read a JSON file, falling back to `T::default()` when it does not exist.
pub fn read_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T, StorageError> {
    match read_json(path) {
        Err(StorageError::PathNotFound(_)) => Ok(T::default()),
        other => other,
    }
}

/// Write a value as pretty-printed JSON, creating parent directories.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let contents = serde_json::to_string_pretty(value)?;
    fs::write(path, contents)?;
    debug!("Wrote {:?}", path);
    Ok(())
}

/// Load a snapshot and check that player names are unique.
pub fn load_snapshot(path: &Path) -> Result<Snapshot, StorageError> {
    let snapshot: Snapshot = read_json(path)?;
    if let Some(name) = snapshot.duplicate_name() {
        return Err(StorageError::DuplicatePlayer(name.to_string()));
    }
    Ok(snapshot)
}

/// Load the hall of fame. A missing file is an empty archive.
pub fn load_hall_of_fame(path: &Path) -> Result<Vec<SeasonArchive>, StorageError> {
    read_json_or_default(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlayerRecord, SnapshotMeta};

    #[test]
    fn test_storage_config_paths() {
        let config = StorageConfig::new(PathBuf::from("/data"));

        assert_eq!(config.snapshot_path(), PathBuf::from("/data/data.json"));
        assert_eq!(
            config.hall_of_fame_path(),
            PathBuf::from("/data/hall_of_fame.json")
        );
        assert_eq!(config.baseline_path(), PathBuf::from("/data/baseline.json"));
    }

    #[test]
    fn test_storage_config_default() {
        let config = StorageConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
    }

    #[test]
    fn test_snapshot_round_trip_on_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("data.json");
        let snapshot = Snapshot::new(
            SnapshotMeta {
                last_updated: "01.01.2025 10:00".to_string(),
                season_active: Some(true),
            },
            vec![PlayerRecord::new("a"), PlayerRecord::new("b")],
        );

        write_json(&path, &snapshot).unwrap();
        let loaded = load_snapshot(&path).unwrap();

        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_load_snapshot_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let err = load_snapshot(&tmp.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, StorageError::PathNotFound(_)));
    }

    #[test]
    fn test_load_snapshot_rejects_duplicates() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("data.json");
        let snapshot = Snapshot::new(
            SnapshotMeta::default(),
            vec![PlayerRecord::new("a"), PlayerRecord::new("a")],
        );
        write_json(&path, &snapshot).unwrap();

        let err = load_snapshot(&path).unwrap_err();

        assert!(matches!(err, StorageError::DuplicatePlayer(ref n) if n == "a"));
    }

    #[test]
    fn test_load_snapshot_bad_json() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("data.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(load_snapshot(&path), Err(StorageError::Json(_))));
    }

    #[test]
    fn test_load_snapshot_accepts_float_and_null_counters() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("data.json");
        std::fs::write(
            &path,
            r#"{"meta": {"last_updated": "now"}, "players": [
                {"name": "a", "score": 1, "kills": 20.0, "deaths": 4, "damage": 900,
                 "hs_rate": 30, "wins": 1, "mvps": 0, "rounds": 12, "kda": 5,
                 "shots_fired": null}
            ]}"#,
        )
        .unwrap();

        let snapshot = load_snapshot(&path).unwrap();

        assert_eq!(snapshot.players[0].kills, 20);
        assert_eq!(snapshot.players[0].shots_fired, 0);
    }

    #[test]
    fn test_hall_of_fame_missing_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let seasons = load_hall_of_fame(&tmp.path().join("hall_of_fame.json")).unwrap();
        assert!(seasons.is_empty());
    }
}
