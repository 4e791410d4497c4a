//! Top-K boards per stat and the score podium.

use serde::Serialize;

use crate::models::PlayerRecord;

use super::ranking::{sort_players, SortDirection, SortKey};

/// Number of places on the podium.
pub const PODIUM_SIZE: usize = 3;

/// A preset mini leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryBoard {
    pub title: &'static str,
    pub stat: SortKey,
}

/// Boards shown next to the podium.
pub const CATEGORY_BOARDS: [CategoryBoard; 3] = [
    CategoryBoard {
        title: "Damage Dealers",
        stat: SortKey::Damage,
    },
    CategoryBoard {
        title: "Headshooters",
        stat: SortKey::HsRate,
    },
    CategoryBoard {
        title: "Top Fraggers",
        stat: SortKey::Kills,
    },
];

/// One placed player on a board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderEntry<'a> {
    /// 1-based place
    pub rank: usize,
    pub player: &'a PlayerRecord,
    /// Value of the board's stat; absent for the name column
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

/// A filled board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryLeaderboard<'a> {
    pub title: &'static str,
    pub stat: SortKey,
    pub entries: Vec<LeaderEntry<'a>>,
}

/// The `k` best players by `stat`, highest first. Ties keep input order.
pub fn top_k(players: &[PlayerRecord], stat: SortKey, k: usize) -> Vec<&PlayerRecord> {
    let mut sorted = sort_players(players, stat, SortDirection::Descending);
    sorted.truncate(k);
    sorted
}

/// Top-K for one stat, annotated with rank and value.
pub fn leader_entries(players: &[PlayerRecord], stat: SortKey, k: usize) -> Vec<LeaderEntry<'_>> {
    top_k(players, stat, k)
        .into_iter()
        .enumerate()
        .map(|(i, player)| LeaderEntry {
            rank: i + 1,
            player,
            value: stat.numeric_value(player),
        })
        .collect()
}

/// Fill every preset board. Boards are independent: one player may lead
/// several of them.
pub fn category_leaders(players: &[PlayerRecord], k: usize) -> Vec<CategoryLeaderboard<'_>> {
    CATEGORY_BOARDS
        .iter()
        .map(|board| CategoryLeaderboard {
            title: board.title,
            stat: board.stat,
            entries: leader_entries(players, board.stat, k),
        })
        .collect()
}

/// First, second and third by score.
///
/// Returns `None` when there are not enough players for a full podium,
/// rather than a partial one.
pub fn podium(players: &[PlayerRecord]) -> Option<[&PlayerRecord; PODIUM_SIZE]> {
    if players.len() < PODIUM_SIZE {
        return None;
    }
    let top = top_k(players, SortKey::Score, PODIUM_SIZE);
    Some([top[0], top[1], top[2]])
}
