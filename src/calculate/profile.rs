//! Single-player profile: radar chart, badges and weapon distribution.

use serde::Serialize;

use crate::models::{Badge, PlayerMetrics, PlayerRecord, RadarPoint, WeaponShare};

use super::metrics::calculate_metrics;
use super::{clamp_score, per_round};

/// Slices shown individually before the rest is folded into "OTHERS".
const WEAPON_SLICES: usize = 5;

/// A badge and the rule that awards it.
#[derive(Clone, Copy)]
pub struct BadgeRule {
    pub badge: Badge,
    pub applies: fn(&PlayerRecord, &PlayerMetrics) -> bool,
}

fn knife_kill(p: &PlayerRecord, _: &PlayerMetrics) -> bool {
    p.knife_kills > 0
}

fn blind_kills(p: &PlayerRecord, _: &PlayerMetrics) -> bool {
    p.blind_kills > 5
}

fn broke_windows(p: &PlayerRecord, _: &PlayerMetrics) -> bool {
    p.broken_windows > 0
}

fn high_score(p: &PlayerRecord, _: &PlayerMetrics) -> bool {
    p.score >= 200.0
}

fn headshot_master(p: &PlayerRecord, _: &PlayerMetrics) -> bool {
    p.hs_rate > 60.0
}

/// Badge rules, in display order.
pub const BADGE_RULES: [BadgeRule; 5] = [
    BadgeRule {
        badge: Badge {
            label: "Ninja",
            description: "Knife Kill Master",
        },
        applies: knife_kill,
    },
    BadgeRule {
        badge: Badge {
            label: "Flash King",
            description: "Blinded Enemies Eliminated",
        },
        applies: blind_kills,
    },
    BadgeRule {
        badge: Badge {
            label: "Vandal",
            description: "Property Damage Expert",
        },
        applies: broke_windows,
    },
    BadgeRule {
        badge: Badge {
            label: "MVP",
            description: "High Score Legend",
        },
        applies: high_score,
    },
    BadgeRule {
        badge: Badge {
            label: "Deadeye",
            description: "Headshot Master",
        },
        applies: headshot_master,
    },
];

/// Everything the player card shows besides the raw record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerProfile<'a> {
    pub player: &'a PlayerRecord,
    pub metrics: PlayerMetrics,
    pub radar: Vec<RadarPoint>,
    pub badges: Vec<Badge>,
    pub weapons: Vec<WeaponShare>,
}

/// Badges earned by a player, in rule order.
pub fn badges_for(player: &PlayerRecord, metrics: &PlayerMetrics) -> Vec<Badge> {
    BADGE_RULES
        .iter()
        .filter(|rule| (rule.applies)(player, metrics))
        .map(|rule| rule.badge)
        .collect()
}

/// Radar values for a single player, each within 0-100.
pub fn radar_points(player: &PlayerRecord, metrics: &PlayerMetrics) -> Vec<RadarPoint> {
    let teamplay = (player.mvps + player.bombs_defused + player.bombs_planted) as f64 * 5.0;
    let utility = per_round(player.money_earned as f64, player.rounds) / 100.0;

    vec![
        RadarPoint {
            axis: "Aim",
            value: clamp_score(player.hs_rate),
        },
        RadarPoint {
            axis: "Aggression",
            value: clamp_score(metrics.kpr * 100.0),
        },
        RadarPoint {
            axis: "Survival",
            value: metrics.survival,
        },
        RadarPoint {
            axis: "Teamplay",
            value: clamp_score(teamplay),
        },
        RadarPoint {
            axis: "Utility",
            value: clamp_score(utility),
        },
    ]
}

/// Kills per weapon, most used first.
///
/// With more than six weapons only the top five are kept and the rest are
/// summed into an `OTHERS` slice. Equal counts keep the snapshot's order.
pub fn weapon_breakdown(player: &PlayerRecord) -> Vec<WeaponShare> {
    let Some(weapons) = &player.weapons else {
        return Vec::new();
    };

    let mut shares: Vec<WeaponShare> = weapons
        .iter()
        .map(|(weapon, &kills)| WeaponShare {
            weapon: weapon.to_uppercase(),
            kills,
        })
        .collect();
    shares.sort_by(|a, b| b.kills.cmp(&a.kills));

    if shares.len() > WEAPON_SLICES + 1 {
        let others: i64 = shares[WEAPON_SLICES..].iter().map(|s| s.kills).sum();
        shares.truncate(WEAPON_SLICES);
        shares.push(WeaponShare {
            weapon: "OTHERS".to_string(),
            kills: others,
        });
    }

    shares
}

/// Build the full profile for one player.
pub fn player_profile(player: &PlayerRecord) -> PlayerProfile<'_> {
    let metrics = calculate_metrics(player);
    PlayerProfile {
        player,
        radar: radar_points(player, &metrics),
        badges: badges_for(player, &metrics),
        weapons: weapon_breakdown(player),
        metrics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeaponKills;
    use pretty_assertions::assert_eq;

    fn labels(badges: &[Badge]) -> Vec<&'static str> {
        badges.iter().map(|b| b.label).collect()
    }

    fn with_weapons(weapons: &[(&str, i64)]) -> PlayerRecord {
        let kills: WeaponKills = weapons.iter().map(|(w, k)| (w.to_string(), *k)).collect();
        PlayerRecord {
            weapons: Some(kills),
            ..PlayerRecord::new("p")
        }
    }

    #[test]
    fn test_no_badges_for_plain_player() {
        let p = PlayerRecord::new("plain");
        let m = calculate_metrics(&p);
        assert!(badges_for(&p, &m).is_empty());
    }

    #[test]
    fn test_badge_thresholds() {
        let mut p = PlayerRecord::new("p");
        p.knife_kills = 1;
        p.blind_kills = 5;
        p.broken_windows = 2;
        p.score = 200.0;
        p.hs_rate = 60.0;
        let m = calculate_metrics(&p);

        // blind_kills and hs_rate need to be strictly above the threshold
        assert_eq!(labels(&badges_for(&p, &m)), vec!["Ninja", "Vandal", "MVP"]);

        p.blind_kills = 6;
        p.hs_rate = 60.1;
        assert_eq!(
            labels(&badges_for(&p, &m)),
            vec!["Ninja", "Flash King", "Vandal", "MVP", "Deadeye"]
        );
    }

    #[test]
    fn test_radar_points() {
        let p = PlayerRecord {
            kills: 7,
            deaths: 5,
            rounds: 10,
            hs_rate: 48.0,
            mvps: 3,
            bombs_planted: 2,
            bombs_defused: 1,
            money_earned: 30_000,
            ..PlayerRecord::new("p")
        };
        let m = calculate_metrics(&p);

        let radar = radar_points(&p, &m);
        let values: Vec<f64> = radar.iter().map(|r| r.value).collect();

        assert_eq!(radar[0].axis, "Aim");
        assert_eq!(values, vec![48.0, 70.0, 50.0, 30.0, 30.0]);
    }

    #[test]
    fn test_radar_points_capped() {
        let p = PlayerRecord {
            kills: 30,
            rounds: 10,
            hs_rate: 120.0,
            mvps: 25,
            money_earned: 500_000,
            ..PlayerRecord::new("p")
        };
        let m = calculate_metrics(&p);

        let radar = radar_points(&p, &m);

        assert!(radar.iter().all(|r| (0.0..=100.0).contains(&r.value)));
        assert_eq!(radar[0].value, 100.0);
        assert_eq!(radar[1].value, 100.0);
        assert_eq!(radar[3].value, 100.0);
        assert_eq!(radar[4].value, 100.0);
    }

    #[test]
    fn test_weapon_breakdown_small() {
        let p = with_weapons(&[("awp", 4), ("ak47", 9), ("deagle", 4)]);

        let shares = weapon_breakdown(&p);

        assert_eq!(
            shares,
            vec![
                WeaponShare { weapon: "AK47".into(), kills: 9 },
                WeaponShare { weapon: "AWP".into(), kills: 4 },
                WeaponShare { weapon: "DEAGLE".into(), kills: 4 },
            ]
        );
    }

    #[test]
    fn test_weapon_breakdown_ties_keep_snapshot_order() {
        let p = with_weapons(&[("usp_silencer", 5), ("awp", 5), ("ak47", 5), ("deagle", 7)]);

        let order: Vec<String> = weapon_breakdown(&p).into_iter().map(|s| s.weapon).collect();

        assert_eq!(order, vec!["DEAGLE", "USP_SILENCER", "AWP", "AK47"]);
    }

    #[test]
    fn test_weapon_breakdown_six_kept_whole() {
        let p = with_weapons(&[("a", 6), ("b", 5), ("c", 4), ("d", 3), ("e", 2), ("f", 1)]);
        assert_eq!(weapon_breakdown(&p).len(), 6);
    }

    #[test]
    fn test_weapon_breakdown_folds_others() {
        let p = with_weapons(&[
            ("a", 70),
            ("b", 60),
            ("c", 50),
            ("d", 40),
            ("e", 30),
            ("f", 20),
            ("g", 10),
        ]);

        let shares = weapon_breakdown(&p);

        assert_eq!(shares.len(), 6);
        assert_eq!(shares[4].weapon, "E");
        assert_eq!(shares[5], WeaponShare { weapon: "OTHERS".into(), kills: 30 });
    }

    #[test]
    fn test_weapon_breakdown_without_weapons() {
        assert!(weapon_breakdown(&PlayerRecord::new("p")).is_empty());
    }

    #[test]
    fn test_player_profile() {
        let mut p = with_weapons(&[("awp", 3)]);
        p.kills = 10;
        p.rounds = 10;
        p.knife_kills = 1;

        let profile = player_profile(&p);

        assert_eq!(profile.player.name, "p");
        assert_eq!(profile.metrics.kpr, 1.0);
        assert_eq!(profile.radar.len(), 5);
        assert_eq!(labels(&profile.badges), vec!["Ninja"]);
        assert_eq!(profile.weapons.len(), 1);
    }
}
