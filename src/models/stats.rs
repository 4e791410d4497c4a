//! Derived statistics models.

use serde::Serialize;

/// Per-player rates derived from the raw counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PlayerMetrics {
    /// Kills per round
    pub kpr: f64,

    /// Deaths per round
    pub dpr: f64,

    /// Average damage per round
    pub adr: f64,

    /// Share of rounds survived (0-100)
    pub survival: f64,

    /// Shots hit / shots fired (0-100), unrounded
    pub accuracy: f64,

    /// Wins per round (0-100), one decimal
    pub win_rate: f64,

    /// Frag rate and MVP composite (0-100)
    pub impact: f64,

    /// Money earned per round / 50, one decimal
    pub utility_score: f64,
}

impl PlayerMetrics {
    /// Accuracy rounded to one decimal, as displayed.
    pub fn accuracy_display(&self) -> f64 {
        crate::calculate::round_to(self.accuracy, 1)
    }
}

/// Server-wide totals across every player of a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerSummary {
    pub total_kills: i64,
    pub total_deaths: i64,
    pub total_wins: i64,
    pub total_mvps: i64,
    pub total_damage: f64,
}

/// One spoke of a single-player radar chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadarPoint {
    pub axis: &'static str,
    pub value: f64,
}

/// Achievement badge awarded by a threshold rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: &'static str,
    pub description: &'static str,
}

/// Kills with one weapon (or the aggregated remainder).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeaponShare {
    pub weapon: String,
    pub kills: i64,
}
