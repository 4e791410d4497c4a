use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::calculate::RankingCache;
use crate::config::AppConfig;
use crate::storage::{SnapshotStore, StorageConfig};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub storage: Arc<StorageConfig>,
    pub store: Arc<RwLock<SnapshotStore>>,
    pub ranking_cache: Arc<Mutex<RankingCache>>,
}

impl AppState {
    pub fn new(config: AppConfig, store: SnapshotStore) -> Self {
        Self {
            storage: Arc::new(config.storage()),
            config: Arc::new(config),
            store: Arc::new(RwLock::new(store)),
            ranking_cache: Arc::new(Mutex::new(RankingCache::new())),
        }
    }

    /// Entries per leaderboard when a request does not say.
    pub fn top_k(&self) -> usize {
        self.config.leaderboard.top_k
    }
}
