//! Filtering and stable sorting of the player table.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::PlayerRecord;

/// Sentinel category value that disables the favourite-weapon filter.
pub const ALL_CATEGORIES: &str = "All";

/// Rejected sort key or direction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankingParseError {
    #[error("unknown sort key: {0}")]
    UnknownKey(String),

    #[error("unknown sort direction: {0} (expected asc or desc)")]
    UnknownDirection(String),
}

/// A sortable player field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Name,
    Score,
    Kills,
    Deaths,
    Damage,
    HsRate,
    Wins,
    Mvps,
    Rounds,
    Kda,
}

impl SortKey {
    pub const ALL: [SortKey; 10] = [
        SortKey::Name,
        SortKey::Score,
        SortKey::Kills,
        SortKey::Deaths,
        SortKey::Damage,
        SortKey::HsRate,
        SortKey::Wins,
        SortKey::Mvps,
        SortKey::Rounds,
        SortKey::Kda,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Score => "score",
            SortKey::Kills => "kills",
            SortKey::Deaths => "deaths",
            SortKey::Damage => "damage",
            SortKey::HsRate => "hs_rate",
            SortKey::Wins => "wins",
            SortKey::Mvps => "mvps",
            SortKey::Rounds => "rounds",
            SortKey::Kda => "kda",
        }
    }

    /// Numeric value of this field, `None` for the name column.
    pub fn numeric_value(&self, player: &PlayerRecord) -> Option<f64> {
        let value = match self {
            SortKey::Name => return None,
            SortKey::Score => player.score,
            SortKey::Kills => player.kills as f64,
            SortKey::Deaths => player.deaths as f64,
            SortKey::Damage => player.damage,
            SortKey::HsRate => player.hs_rate,
            SortKey::Wins => player.wins as f64,
            SortKey::Mvps => player.mvps as f64,
            SortKey::Rounds => player.rounds as f64,
            SortKey::Kda => player.kda,
        };
        Some(value)
    }

    /// Ascending comparison of two players on this field.
    pub fn compare(&self, a: &PlayerRecord, b: &PlayerRecord) -> Ordering {
        match (self.numeric_value(a), self.numeric_value(b)) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => a.name.cmp(&b.name),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = RankingParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| RankingParseError::UnknownKey(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "asc", alias = "ascending")]
    Ascending,
    #[serde(rename = "desc", alias = "descending")]
    Descending,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "asc"),
            SortDirection::Descending => write!(f, "desc"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = RankingParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            _ => Err(RankingParseError::UnknownDirection(s.to_string())),
        }
    }
}

/// Current sort column and direction of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            key: SortKey::Score,
            direction: SortDirection::Descending,
        }
    }
}

impl SortConfig {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Next configuration after clicking the header for `key`.
    ///
    /// A new key starts descending; the same key flips descending to
    /// ascending and ascending back to descending.
    pub fn toggle(&self, key: SortKey) -> SortConfig {
        let direction = if self.key == key && self.direction == SortDirection::Descending {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        };
        SortConfig { key, direction }
    }
}

/// Favourite-weapon filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    #[default]
    All,
    Weapon(String),
}

impl CategoryFilter {
    pub fn matches(&self, player: &PlayerRecord) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Weapon(w) => player.fav_weapon == *w,
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(s: &str) -> Self {
        if s.is_empty() || s == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Weapon(s.to_string())
        }
    }
}

/// Everything that determines one rendering of the player table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RankingQuery {
    pub search: String,
    pub category: CategoryFilter,
    pub sort: SortConfig,
}

impl RankingQuery {
    fn matches(&self, player: &PlayerRecord, needle: &str) -> bool {
        player.name.to_lowercase().contains(needle) && self.category.matches(player)
    }
}

/// Keep players whose name contains `search` (case-insensitive) and whose
/// favourite weapon passes `category`. Input order is preserved.
pub fn filter_players<'a, I>(
    players: I,
    search: &str,
    category: &CategoryFilter,
) -> Vec<&'a PlayerRecord>
where
    I: IntoIterator<Item = &'a PlayerRecord>,
{
    let needle = search.to_lowercase();
    players
        .into_iter()
        .filter(|p| p.name.to_lowercase().contains(&needle) && category.matches(p))
        .collect()
}

/// Stable sort by `key`. Ties keep their input order in both directions.
pub fn sort_players<'a, I>(players: I, key: SortKey, direction: SortDirection) -> Vec<&'a PlayerRecord>
where
    I: IntoIterator<Item = &'a PlayerRecord>,
{
    let mut sorted: Vec<&PlayerRecord> = players.into_iter().collect();
    sorted.sort_by(|a, b| directed(key.compare(a, b), direction));
    sorted
}

/// Filter then sort, as the table renders it.
pub fn rank_players<'a>(players: &'a [PlayerRecord], query: &RankingQuery) -> Vec<&'a PlayerRecord> {
    rank_indices(players, query)
        .into_iter()
        .map(|i| &players[i])
        .collect()
}

/// Options for the favourite-weapon dropdown: the sentinel followed by each
/// distinct non-empty favourite weapon in order of first appearance.
pub fn filter_options(players: &[PlayerRecord]) -> Vec<String> {
    let mut options = vec![ALL_CATEGORIES.to_string()];
    for p in players {
        if !p.fav_weapon.is_empty() && !options[1..].contains(&p.fav_weapon) {
            options.push(p.fav_weapon.clone());
        }
    }
    options
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

fn rank_indices(players: &[PlayerRecord], query: &RankingQuery) -> Vec<usize> {
    let needle = query.search.to_lowercase();
    let mut indices: Vec<usize> = players
        .iter()
        .enumerate()
        .filter(|(_, p)| query.matches(p, &needle))
        .map(|(i, _)| i)
        .collect();

    let SortConfig { key, direction } = query.sort;
    indices.sort_by(|&a, &b| directed(key.compare(&players[a], &players[b]), direction));
    indices
}

struct CachedRanking {
    generation: u64,
    query: RankingQuery,
    indices: Vec<usize>,
}

/// Memo of the most recent ranking.
///
/// Entries are keyed by the snapshot generation and the full query, so a
/// reload or any change of search, category or sort misses the cache.
#[derive(Default)]
pub struct RankingCache {
    last: Option<CachedRanking>,
    hits: u64,
    misses: u64,
}

impl RankingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rank<'a>(
        &mut self,
        generation: u64,
        players: &'a [PlayerRecord],
        query: &RankingQuery,
    ) -> Vec<&'a PlayerRecord> {
        let fresh = match &self.last {
            Some(c) => c.generation == generation && c.query == *query,
            None => false,
        };

        if fresh {
            self.hits += 1;
        } else {
            self.misses += 1;
            self.last = Some(CachedRanking {
                generation,
                query: query.clone(),
                indices: rank_indices(players, query),
            });
        }

        self.last
            .as_ref()
            .map(|c| c.indices.iter().filter_map(|&i| players.get(i)).collect())
            .unwrap_or_default()
    }

    pub fn invalidate(&mut self) {
        self.last = None;
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
