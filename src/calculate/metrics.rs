//! Per-player derived rates.

use crate::models::{PlayerMetrics, PlayerRecord};

use super::{clamp_score, per_round, percentage, round_to};

/// Compute every derived rate for one player.
///
/// Never fails: zero rounds or zero shots produce zero rates, and
/// negative counters propagate through the formulas unchanged.
pub fn calculate_metrics(player: &PlayerRecord) -> PlayerMetrics {
    let kpr = per_round(player.kills as f64, player.rounds);
    let dpr = per_round(player.deaths as f64, player.rounds);
    let adr = per_round(player.damage, player.rounds);

    PlayerMetrics {
        kpr,
        dpr,
        adr,
        survival: clamp_score(100.0 - dpr * 100.0),
        accuracy: percentage(player.shots_hit, player.shots_fired),
        win_rate: round_to(percentage(player.wins, player.rounds), 1),
        impact: clamp_score(kpr * 50.0 + player.mvps as f64 * 2.0),
        utility_score: round_to(
            per_round(player.money_earned as f64, player.rounds) / 50.0,
            1,
        ),
    }
}
