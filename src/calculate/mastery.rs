//! Equipment mastery: the best (player, weapon) pair per weapon class.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::PlayerRecord;

/// A weapon class and the weapon ids that belong to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentCategory {
    pub id: String,
    pub label: String,
    pub weapons: Vec<String>,
}

impl EquipmentCategory {
    pub fn new(id: &str, label: &str, weapons: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            weapons: weapons.iter().map(|w| w.to_string()).collect(),
        }
    }
}

/// The weapon classes shown on the home page.
pub fn default_categories() -> Vec<EquipmentCategory> {
    vec![
        EquipmentCategory::new(
            "rifle",
            "Assault",
            &["ak47", "m4a1", "galilar", "famas", "aug", "sg556"],
        ),
        EquipmentCategory::new("sniper", "Sniper", &["awp", "ssg08", "scar20", "g3sg1"]),
        EquipmentCategory::new("smg", "SMG", &["mp9", "mac10", "mp7", "p90", "bizon", "ump45"]),
        EquipmentCategory::new(
            "pistol",
            "Pistol",
            &["glock", "hkp2000", "deagle", "p250", "elite", "fiveseven", "tec9"],
        ),
    ]
}

/// Winner of one weapon class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MasteryEntry<'a> {
    pub player: &'a PlayerRecord,
    pub weapon: &'a str,
    pub kills: i64,
}

/// Find the master of one category.
///
/// Scans players in order and, per player, the category's weapons in order.
/// A candidate replaces the current best only with strictly more kills, so
/// on ties the first pair encountered wins. Players without a weapon
/// breakdown are skipped; if every count is zero the first scanned pair is
/// reported with zero kills.
pub fn category_master<'a>(
    players: &'a [PlayerRecord],
    category: &'a EquipmentCategory,
) -> Option<MasteryEntry<'a>> {
    let mut best: Option<MasteryEntry<'a>> = None;

    for player in players {
        let Some(weapons) = &player.weapons else {
            continue;
        };

        for weapon in &category.weapons {
            let kills = weapons.get(weapon).copied().unwrap_or(0);
            let best_kills = best.as_ref().map_or(-1, |b| b.kills);
            if kills > best_kills {
                best = Some(MasteryEntry {
                    player,
                    weapon: weapon.as_str(),
                    kills,
                });
            }
        }
    }

    best
}

/// Masters of every category, keyed by category id. Categories nobody
/// qualifies for are absent.
pub fn equipment_masters<'a>(
    players: &'a [PlayerRecord],
    categories: &'a [EquipmentCategory],
) -> BTreeMap<&'a str, MasteryEntry<'a>> {
    categories
        .iter()
        .filter_map(|cat| category_master(players, cat).map(|m| (cat.id.as_str(), m)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeaponKills;

    fn player(name: &str, weapons: &[(&str, i64)]) -> PlayerRecord {
        let kills: WeaponKills = weapons.iter().map(|(w, k)| (w.to_string(), *k)).collect();
        PlayerRecord {
            weapons: Some(kills),
            ..PlayerRecord::new(name)
        }
    }

    fn sniper() -> EquipmentCategory {
        EquipmentCategory::new("sniper", "Sniper", &["awp", "ssg08"])
    }

    #[test]
    fn test_first_encountered_wins_ties() {
        let players = vec![
            player("A", &[("awp", 10)]),
            player("B", &[("awp", 10), ("ssg08", 5)]),
        ];
        let category = sniper();

        let master = category_master(&players, &category).unwrap();

        assert_eq!(master.player.name, "A");
        assert_eq!(master.weapon, "awp");
        assert_eq!(master.kills, 10);
    }

    #[test]
    fn test_strictly_greater_replaces() {
        let players = vec![
            player("A", &[("awp", 10)]),
            player("B", &[("awp", 3), ("ssg08", 11)]),
        ];
        let category = sniper();

        let master = category_master(&players, &category).unwrap();

        assert_eq!(master.player.name, "B");
        assert_eq!(master.weapon, "ssg08");
        assert_eq!(master.kills, 11);
    }

    #[test]
    fn test_weapon_order_within_player() {
        // ssg08 comes after awp in the category, so awp wins the tie
        let players = vec![player("A", &[("ssg08", 4), ("awp", 4)])];
        let category = sniper();

        let master = category_master(&players, &category).unwrap();

        assert_eq!(master.weapon, "awp");
    }

    #[test]
    fn test_players_without_breakdown_skipped() {
        let players = vec![PlayerRecord::new("bare"), player("B", &[("awp", 1)])];
        let category = sniper();

        let master = category_master(&players, &category).unwrap();

        assert_eq!(master.player.name, "B");
    }

    #[test]
    fn test_all_zero_returns_first_pair() {
        let players = vec![player("A", &[("ak47", 9)]), player("B", &[])];
        let category = sniper();

        let master = category_master(&players, &category).unwrap();

        assert_eq!(master.player.name, "A");
        assert_eq!(master.weapon, "awp");
        assert_eq!(master.kills, 0);
    }

    #[test]
    fn test_no_candidates() {
        let players = vec![PlayerRecord::new("bare")];
        let category = sniper();

        assert!(category_master(&players, &category).is_none());
        assert!(category_master(&[], &category).is_none());
    }

    #[test]
    fn test_equipment_masters_table() {
        let players = vec![
            player("rifler", &[("ak47", 120), ("m4a1", 80), ("awp", 2)]),
            player("sniper", &[("awp", 90), ("deagle", 15)]),
            player("eco", &[("glock", 40), ("mp9", 12)]),
        ];
        let categories = default_categories();

        let masters = equipment_masters(&players, &categories);

        assert_eq!(masters["rifle"].player.name, "rifler");
        assert_eq!(masters["rifle"].weapon, "ak47");
        assert_eq!(masters["sniper"].player.name, "sniper");
        assert_eq!(masters["smg"].player.name, "eco");
        assert_eq!(masters["smg"].weapon, "mp9");
        assert_eq!(masters["pistol"].player.name, "eco");
        assert_eq!(masters["pistol"].kills, 40);
    }

    #[test]
    fn test_equipment_masters_empty_roster() {
        let categories = default_categories();
        assert!(equipment_masters(&[], &categories).is_empty());
    }

    #[test]
    fn test_default_categories() {
        let categories = default_categories();
        let ids: Vec<&str> = categories.iter().map(|c| c.id.as_str()).collect();

        assert_eq!(ids, vec!["rifle", "sniper", "smg", "pistol"]);
        assert!(categories[1].weapons.contains(&"g3sg1".to_string()));
    }
}
