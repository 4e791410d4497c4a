//! Head-to-head comparison of two players.
//!
//! Both players are projected onto the same five 0-100 axes for a radar
//! chart, and a fixed set of raw stats is compared row by row. Per-round
//! rates are rounded to their display precision before any comparison, so
//! two players that look equal on screen are reported as a draw.

use serde::Serialize;

use crate::models::PlayerRecord;

use super::{clamp_score, per_round, percentage, round_to};

/// Rounded per-player stats used by the comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ComparisonStats {
    /// Two decimals
    pub kpr: f64,
    /// Two decimals
    pub dpr: f64,
    /// One decimal
    pub adr: f64,
    pub hs_rate: f64,
    /// One decimal
    pub win_rate: f64,
    /// One decimal
    pub accuracy: f64,
    /// One decimal
    pub utility_score: f64,
}

impl ComparisonStats {
    pub fn for_player(player: &PlayerRecord) -> Self {
        Self {
            kpr: round_to(per_round(player.kills as f64, player.rounds), 2),
            dpr: round_to(per_round(player.deaths as f64, player.rounds), 2),
            adr: round_to(per_round(player.damage, player.rounds), 1),
            hs_rate: player.hs_rate,
            win_rate: round_to(percentage(player.wins, player.rounds), 1),
            accuracy: round_to(percentage(player.shots_hit, player.shots_fired), 1),
            utility_score: round_to(per_round(player.money_earned as f64, player.rounds) / 50.0, 1),
        }
    }

    /// The five radar values, in axis order, each within 0-100.
    pub fn radar(&self) -> [f64; 5] {
        [
            clamp_score(self.kpr * 50.0),
            clamp_score((1.0 - self.dpr) * 100.0),
            clamp_score(self.hs_rate),
            clamp_score(self.adr / 1.5),
            clamp_score(self.win_rate),
        ]
    }
}

/// Radar axis labels, in the order of [`ComparisonStats::radar`].
pub const RADAR_AXES: [&str; 5] = ["Aggression", "Survival", "Aim", "Impact", "Consistency"];

/// Which of the two compared players a row favours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    First,
    Second,
}

/// One radar axis with both players' normalized values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadarAxis {
    pub axis: &'static str,
    pub first: f64,
    pub second: f64,
}

/// One line of the stat-by-stat table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub label: &'static str,
    pub first: f64,
    pub second: f64,
    /// Smaller value is better
    pub reverse: bool,
    /// `None` on a draw
    pub winner: Option<Side>,
}

impl ComparisonRow {
    fn new(label: &'static str, first: f64, second: f64, reverse: bool) -> Self {
        let winner = if first == second {
            None
        } else if (first > second) != reverse {
            Some(Side::First)
        } else {
            Some(Side::Second)
        };

        Self {
            label,
            first,
            second,
            reverse,
            winner,
        }
    }
}

/// Full head-to-head result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison<'a> {
    pub first: &'a PlayerRecord,
    pub second: &'a PlayerRecord,
    pub first_stats: ComparisonStats,
    pub second_stats: ComparisonStats,
    pub radar: Vec<RadarAxis>,
    pub rows: Vec<ComparisonRow>,
}

impl Comparison<'_> {
    /// Number of rows won by each side, as `(first, second)`.
    pub fn tally(&self) -> (usize, usize) {
        self.rows.iter().fold((0, 0), |(a, b), row| match row.winner {
            Some(Side::First) => (a + 1, b),
            Some(Side::Second) => (a, b + 1),
            None => (a, b),
        })
    }
}

/// Compare two players.
pub fn compare<'a>(first: &'a PlayerRecord, second: &'a PlayerRecord) -> Comparison<'a> {
    let s1 = ComparisonStats::for_player(first);
    let s2 = ComparisonStats::for_player(second);

    let radar = RADAR_AXES
        .iter()
        .zip(s1.radar().into_iter().zip(s2.radar()))
        .map(|(&axis, (a, b))| RadarAxis {
            axis,
            first: a,
            second: b,
        })
        .collect();

    let rows = vec![
        ComparisonRow::new("Score", first.score, second.score, false),
        ComparisonRow::new("K/D Ratio", first.kda, second.kda, false),
        ComparisonRow::new("Damage/Round", s1.adr, s2.adr, false),
        ComparisonRow::new("Headshot %", s1.hs_rate, s2.hs_rate, false),
        ComparisonRow::new("Win Rate", s1.win_rate, s2.win_rate, false),
        ComparisonRow::new("Accuracy", s1.accuracy, s2.accuracy, false),
        ComparisonRow::new("Deaths / Round", s1.dpr, s2.dpr, true),
        ComparisonRow::new("Total MVPs", first.mvps as f64, second.mvps as f64, false),
    ];

    Comparison {
        first,
        second,
        first_stats: s1,
        second_stats: s2,
        radar,
        rows,
    }
}
