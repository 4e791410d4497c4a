//! Server-wide totals.

use crate::models::{PlayerRecord, ServerSummary};

/// Sum kills, deaths, wins, MVPs and damage over all players.
pub fn summarize(players: &[PlayerRecord]) -> ServerSummary {
    players.iter().fold(ServerSummary::default(), |acc, p| ServerSummary {
        total_kills: acc.total_kills + p.kills,
        total_deaths: acc.total_deaths + p.deaths,
        total_wins: acc.total_wins + p.wins,
        total_mvps: acc.total_mvps + p.mvps,
        total_damage: acc.total_damage + p.damage,
    })
}
