//! Statistics calculation engine.
//!
//! Pure functions over a borrowed player collection:
//! - Per-player derived metrics, radar profile and badges
//! - Filtering and stable sorting by any stat key
//! - Category leaderboards and the podium
//! - Equipment mastery per weapon class
//! - Head-to-head comparison normalization
//! - Server-wide totals
//!
//! Nothing here performs I/O, logs, or mutates a `PlayerRecord`.

pub mod comparison;
pub mod leaders;
pub mod mastery;
pub mod metrics;
pub mod profile;
pub mod ranking;
pub mod summary;

pub use comparison::{compare, Comparison, ComparisonRow, ComparisonStats, RadarAxis, Side};
pub use leaders::{
    category_leaders, leader_entries, podium, top_k, CategoryBoard, CategoryLeaderboard, LeaderEntry,
    CATEGORY_BOARDS,
};
pub use mastery::{default_categories, equipment_masters, EquipmentCategory, MasteryEntry};
pub use metrics::calculate_metrics;
pub use profile::{badges_for, player_profile, weapon_breakdown, PlayerProfile, BADGE_RULES};
pub use ranking::{
    filter_options, filter_players, rank_players, sort_players, CategoryFilter, RankingCache,
    RankingQuery, SortConfig, SortDirection, SortKey,
};
pub use summary::summarize;

/// Round to a fixed number of decimal digits, half away from zero.
pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

/// Divide by the round count. Zero rounds yield zero; a negative count is
/// treated as one round.
pub fn per_round(value: f64, rounds: i64) -> f64 {
    if rounds == 0 {
        return 0.0;
    }
    value / rounds.max(1) as f64
}

/// Percentage `part / whole * 100`, zero when `whole` is not positive.
pub fn percentage(part: i64, whole: i64) -> f64 {
    if whole > 0 {
        part as f64 / whole as f64 * 100.0
    } else {
        0.0
    }
}

/// Clamp to the shared 0-100 display scale.
pub fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}
