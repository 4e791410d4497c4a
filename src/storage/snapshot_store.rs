use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use super::{load_snapshot, StorageError};
use crate::models::{PlayerRecord, Snapshot};

/// The current snapshot plus a generation counter.
///
/// A snapshot is never edited in place: a reload swaps in a new `Arc` and
/// bumps the generation, so anything derived from the old one can tell it
/// is stale.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
    snapshot: Arc<Snapshot>,
    generation: u64,
    loaded_at: DateTime<Utc>,
}

impl SnapshotStore {
    /// Wrap an in-memory snapshot. `path` is where [`reload`](Self::reload) reads from.
    pub fn new(path: PathBuf, snapshot: Snapshot) -> Self {
        Self {
            path,
            snapshot: Arc::new(snapshot),
            generation: 1,
            loaded_at: Utc::now(),
        }
    }

    /// Load the snapshot at `path`.
    pub fn open(path: PathBuf) -> Result<Self, StorageError> {
        let snapshot = load_snapshot(&path)?;
        info!(
            "Loaded {} players from {:?} (last updated {})",
            snapshot.players.len(),
            path,
            snapshot.meta.last_updated
        );
        Ok(Self::new(path, snapshot))
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn players(&self) -> &[PlayerRecord] {
        &self.snapshot.players
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the whole snapshot and return the new generation.
    pub fn replace(&mut self, snapshot: Snapshot) -> u64 {
        self.snapshot = Arc::new(snapshot);
        self.generation += 1;
        self.loaded_at = Utc::now();
        self.generation
    }

    /// Re-read the snapshot file. On error the current snapshot is kept.
    pub fn reload(&mut self) -> Result<u64, StorageError> {
        let snapshot = load_snapshot(&self.path)?;
        let players = snapshot.players.len();
        let generation = self.replace(snapshot);
        info!(
            "Reloaded {} players from {:?} (generation {})",
            players, self.path, generation
        );
        Ok(generation)
    }
}
