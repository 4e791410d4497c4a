//! Season snapshot: metadata plus the player rows.

use serde::{Deserialize, Serialize};

use super::PlayerRecord;

/// Snapshot metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMeta {
    /// Display timestamp; never interpreted
    #[serde(default)]
    pub last_updated: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season_active: Option<bool>,
}

/// A full leaderboard snapshot as produced by one sync.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub meta: SnapshotMeta,

    #[serde(default)]
    pub players: Vec<PlayerRecord>,
}

impl Snapshot {
    pub fn new(meta: SnapshotMeta, players: Vec<PlayerRecord>) -> Self {
        Self { meta, players }
    }

    /// Look up a player by exact name.
    pub fn player(&self, name: &str) -> Option<&PlayerRecord> {
        self.players.iter().find(|p| p.name == name)
    }

    /// First name that appears more than once, if any.
    pub fn duplicate_name(&self) -> Option<&str> {
        let mut seen = std::collections::HashSet::new();
        self.players
            .iter()
            .map(|p| p.name.as_str())
            .find(|name| !seen.insert(*name))
    }
}
