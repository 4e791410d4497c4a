//! Archived season results. Read-only; passed through to the view layer.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinnerStats {
    pub rating: serde_json::Value,
    pub kda: serde_json::Value,
    pub impact: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonWinner {
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    pub stats: WinnerStats,
}

/// A notable moment of a finished season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub title: String,
    pub player: String,
    pub value: serde_json::Value,
}

/// One finished season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonArchive {
    pub season_id: serde_json::Value,
    pub season_name: String,
    pub winner: SeasonWinner,
    #[serde(default)]
    pub highlights: Vec<Highlight>,
}
