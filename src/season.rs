//! Season snapshot builder.
//!
//! Turns lifetime stat counters into season numbers by subtracting a
//! per-player baseline captured when the season started, then derives the
//! display fields (favourite weapon and map, KDA, headshot rate, score)
//! and writes a ranked [`Snapshot`].

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::calculate::{round_to, SortKey};
use crate::models::{PlayerRecord, Snapshot, SnapshotMeta, WeaponKills};
use crate::storage::{read_json, read_json_or_default, write_json, StorageConfig, StorageError};

/// Weapons tracked per player, in tie-break order.
pub const WEAPONS: [&str; 33] = [
    "knife", "hegrenade", "glock", "deagle", "elite", "fiveseven", "xm1014", "mac10", "ump45",
    "p90", "awp", "ak47", "aug", "famas", "g3sg1", "m249", "hkp2000", "p250", "sg556", "scar20",
    "ssg08", "mp7", "mp9", "nova", "negev", "sawedoff", "bizon", "tec9", "mag7", "m4a1",
    "galilar", "molotov", "taser",
];

/// Maps with a win counter, in tie-break order.
pub const MAPS: [&str; 8] = [
    "de_dust2", "mirage", "inferno", "nuke", "vertigo", "ancient", "anubis", "overpass",
];

/// Scalar counters copied into each season record.
pub const TRACKED_STATS: [&str; 15] = [
    "total_kills",
    "total_deaths",
    "total_matches_won",
    "total_mvps",
    "total_damage_done",
    "total_kills_headshot",
    "total_shots_fired",
    "total_shots_hit",
    "total_rounds_played",
    "total_planted_bombs",
    "total_defused_bombs",
    "total_kills_knife",
    "total_kills_enemy_blinded",
    "total_money_earned",
    "total_broken_windows",
];

/// Fewer rounds than this and the score is 0.
const MIN_SCORED_ROUNDS: i64 = 5;

/// Placeholder for a favourite that does not exist.
const NO_FAVOURITE: &str = "-";

/// Errors from building a season.
#[derive(Debug, Error)]
pub enum SeasonError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Duplicate steam id in input: {0}")]
    DuplicateSteamId(String),

    #[error("Duplicate player name in input: {0}")]
    DuplicateName(String),
}

/// Lifetime counters for one player, as fetched from the game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LifetimeInput {
    pub nickname: String,
    pub steam_id: String,

    /// Profile name; falls back to the nickname
    #[serde(default)]
    pub display_name: Option<String>,

    #[serde(default)]
    pub avatar: Option<String>,

    /// Counter name to value. Missing counters read as 0.
    #[serde(default)]
    pub stats: BTreeMap<String, i64>,
}

impl LifetimeInput {
    pub fn stat(&self, name: &str) -> i64 {
        self.stats.get(name).copied().unwrap_or(0)
    }

    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.nickname)
    }

    /// Scalar and per-map counters.
    fn counters(&self) -> BTreeMap<String, i64> {
        TRACKED_STATS
            .iter()
            .map(|s| s.to_string())
            .chain(MAPS.iter().map(|m| map_stat(m)))
            .map(|name| {
                let value = self.stat(&name);
                (name, value)
            })
            .collect()
    }

    /// Per-weapon kill counters keyed by weapon id.
    fn weapon_counters(&self) -> WeaponKills {
        WEAPONS
            .iter()
            .map(|w| (w.to_string(), self.stat(&weapon_stat(w))))
            .collect()
    }
}

fn map_stat(map: &str) -> String {
    format!("total_wins_map_{map}")
}

fn weapon_stat(weapon: &str) -> String {
    format!("total_kills_{weapon}")
}

/// Counters captured at season start for one player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    #[serde(default)]
    pub stats: BTreeMap<String, i64>,

    /// Absent in baselines written before weapons were tracked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weapons: Option<WeaponKills>,
}

/// Baselines keyed by steam id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeasonBaselines {
    entries: BTreeMap<String, Baseline>,
}

impl SeasonBaselines {
    pub fn get(&self, steam_id: &str) -> Option<&Baseline> {
        self.entries.get(steam_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Make sure `input` has a complete baseline. Returns true if anything
    /// was written.
    ///
    /// A player without a baseline, or with one that predates weapon
    /// tracking, gets the current counters. Counters added since the
    /// baseline was taken are patched in with their current value.
    fn ensure(&mut self, input: &LifetimeInput) -> bool {
        let counters = input.counters();
        let needs_fresh = self
            .entries
            .get(&input.steam_id)
            .map_or(true, |b| b.weapons.is_none());

        if needs_fresh {
            debug!("New baseline for {}", input.nickname);
            self.entries.insert(
                input.steam_id.clone(),
                Baseline {
                    stats: counters,
                    weapons: Some(input.weapon_counters()),
                },
            );
            return true;
        }

        let Some(existing) = self.entries.get_mut(&input.steam_id) else {
            return false;
        };
        let mut patched = false;
        for (name, value) in counters {
            if !existing.stats.contains_key(&name) {
                debug!("Patching baseline counter {} for {}", name, input.nickname);
                existing.stats.insert(name, value);
                patched = true;
            }
        }
        patched
    }
}

/// Result of one season build.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonBuild {
    pub snapshot: Snapshot,
    pub baselines: SeasonBaselines,
    /// Baselines must be written back
    pub baseline_updated: bool,
}

/// Season score: efficiency per round, scaled to 100 rounds.
///
/// Players with fewer than five rounds score 0; a negative result is
/// floored to 0.1 so active players never show as zero.
pub fn calculate_score(player: &PlayerRecord) -> f64 {
    if player.rounds < MIN_SCORED_ROUNDS {
        return 0.0;
    }
    let raw = player.mvps as f64 * 3.0 + player.damage / 100.0 + player.headshots as f64 * 0.2
        - player.deaths as f64;
    let normalized = raw / player.rounds as f64 * 100.0;
    if normalized < 0.0 {
        0.1
    } else {
        round_to(normalized, 1)
    }
}

/// `kills / deaths` to two decimals, or plain kills without deaths.
pub fn season_kda(kills: i64, deaths: i64) -> f64 {
    if deaths > 0 {
        round_to(kills as f64 / deaths as f64, 2)
    } else {
        kills as f64
    }
}

/// Share of kills that were headshots, one decimal.
pub fn season_hs_rate(headshots: i64, kills: i64) -> f64 {
    if kills > 0 {
        round_to(headshots as f64 / kills as f64 * 100.0, 1)
    } else {
        0.0
    }
}

/// `de_dust2` becomes `Dust2`, `mirage` becomes `Mirage`.
pub fn map_display_name(map: &str) -> String {
    let bare = map.strip_prefix("de_").unwrap_or(map);
    let mut chars = bare.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Most used weapon this season as `(display name, kills)`.
///
/// Strict `>` over [`WEAPONS`] order starting from -1; the name is `-`
/// when the best count is not positive.
fn favourite_weapon(season: &WeaponKills) -> (String, i64) {
    let mut best: Option<&str> = None;
    let mut best_kills = -1;
    for weapon in WEAPONS {
        let kills = season.get(weapon).copied().unwrap_or(0);
        if kills > best_kills {
            best_kills = kills;
            best = Some(weapon);
        }
    }
    match best {
        Some(weapon) if best_kills > 0 => (weapon.to_uppercase(), best_kills),
        _ => (NO_FAVOURITE.to_string(), best_kills),
    }
}

/// Map with the most wins this season, among maps with at least one.
fn favourite_map(current: &BTreeMap<String, i64>, base: &BTreeMap<String, i64>) -> String {
    let mut best: Option<&str> = None;
    let mut best_wins = 0;
    for map in MAPS {
        let key = map_stat(map);
        let wins = current.get(&key).copied().unwrap_or(0) - base.get(&key).copied().unwrap_or(0);
        if wins > best_wins {
            best_wins = wins;
            best = Some(map);
        }
    }
    best.map_or_else(|| NO_FAVOURITE.to_string(), map_display_name)
}

fn season_record(input: &LifetimeInput, baseline: &Baseline) -> PlayerRecord {
    let current = input.counters();
    let delta = |name: &str| {
        let now = current.get(name).copied().unwrap_or(0);
        let then = baseline.stats.get(name).copied().unwrap_or(0);
        (now - then).max(0)
    };

    let base_weapons = baseline.weapons.clone().unwrap_or_default();
    let season_weapons: WeaponKills = input
        .weapon_counters()
        .into_iter()
        .map(|(weapon, kills)| {
            let then = base_weapons.get(&weapon).copied().unwrap_or(0);
            (weapon, kills - then)
        })
        .collect();
    let (fav_weapon, fav_weapon_kills) = favourite_weapon(&season_weapons);

    let kills = delta("total_kills");
    let deaths = delta("total_deaths");
    let headshots = delta("total_kills_headshot");

    let mut record = PlayerRecord {
        nickname: Some(input.nickname.clone()),
        steam_id: Some(input.steam_id.clone()),
        avatar: input.avatar.clone(),
        kills,
        deaths,
        wins: delta("total_matches_won"),
        mvps: delta("total_mvps"),
        damage: delta("total_damage_done") as f64,
        headshots,
        shots_fired: delta("total_shots_fired"),
        shots_hit: delta("total_shots_hit"),
        rounds: delta("total_rounds_played"),
        bombs_planted: delta("total_planted_bombs"),
        bombs_defused: delta("total_defused_bombs"),
        knife_kills: delta("total_kills_knife"),
        blind_kills: delta("total_kills_enemy_blinded"),
        money_earned: delta("total_money_earned"),
        broken_windows: delta("total_broken_windows"),
        kda: season_kda(kills, deaths),
        hs_rate: season_hs_rate(headshots, kills),
        fav_weapon,
        fav_weapon_kills: Some(fav_weapon_kills),
        fav_map: Some(favourite_map(&current, &baseline.stats)),
        weapons: Some(
            season_weapons
                .into_iter()
                .map(|(weapon, kills)| (weapon, kills.max(0)))
                .collect(),
        ),
        ..PlayerRecord::new(input.name())
    };
    record.score = calculate_score(&record);
    record
}

/// Build the season snapshot for `inputs`.
///
/// With `reset` every existing baseline is discarded first, which starts a
/// new season at the current counters.
pub fn build_season(
    inputs: &[LifetimeInput],
    mut baselines: SeasonBaselines,
    reset: bool,
    now: DateTime<Local>,
) -> Result<SeasonBuild, SeasonError> {
    let mut steam_ids = HashSet::new();
    let mut names = HashSet::new();
    for input in inputs {
        if !steam_ids.insert(input.steam_id.as_str()) {
            return Err(SeasonError::DuplicateSteamId(input.steam_id.clone()));
        }
        if !names.insert(input.name()) {
            return Err(SeasonError::DuplicateName(input.name().to_string()));
        }
    }

    if reset {
        warn!("Resetting season: discarding {} baselines", baselines.len());
        baselines = SeasonBaselines::default();
    }

    let mut baseline_updated = reset;
    let mut players = Vec::with_capacity(inputs.len());
    for input in inputs {
        baseline_updated |= baselines.ensure(input);
        if let Some(baseline) = baselines.get(&input.steam_id) {
            players.push(season_record(input, baseline));
        }
    }

    players.sort_by(|a, b| SortKey::Score.compare(b, a));

    let snapshot = Snapshot::new(
        SnapshotMeta {
            last_updated: now.format("%d.%m.%Y %H:%M").to_string(),
            season_active: Some(!reset),
        },
        players,
    );

    Ok(SeasonBuild {
        snapshot,
        baselines,
        baseline_updated,
    })
}

/// Read inputs and baselines, build the season and write the results.
///
/// With `dry_run` nothing is written. Returns the build either way.
pub fn run_season_build(
    storage: &StorageConfig,
    input_path: &Path,
    reset: bool,
    dry_run: bool,
) -> Result<SeasonBuild, SeasonError> {
    let inputs: Vec<LifetimeInput> = read_json(input_path)?;
    let baselines: SeasonBaselines = read_json_or_default(&storage.baseline_path())?;
    info!(
        "Building season for {} players ({} baselines)",
        inputs.len(),
        baselines.len()
    );

    let build = build_season(&inputs, baselines, reset, Local::now())?;

    if dry_run {
        info!("Dry run: not writing snapshot or baselines");
        return Ok(build);
    }

    if build.baseline_updated {
        write_json(&storage.baseline_path(), &build.baselines)?;
        info!("Baselines updated at {:?}", storage.baseline_path());
    }
    write_json(&storage.snapshot_path(), &build.snapshot)?;
    info!(
        "Wrote {} players to {:?} ({})",
        build.snapshot.players.len(),
        storage.snapshot_path(),
        build.snapshot.meta.last_updated
    );

    Ok(build)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn input(nickname: &str, steam_id: &str, stats: &[(&str, i64)]) -> LifetimeInput {
        LifetimeInput {
            nickname: nickname.to_string(),
            steam_id: steam_id.to_string(),
            stats: stats.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            ..LifetimeInput::default()
        }
    }

    fn at_noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 7, 12, 5, 0).unwrap()
    }

    /// Baseline everyone at the first set of counters, then build with the second.
    fn two_step(before: &[LifetimeInput], after: &[LifetimeInput]) -> SeasonBuild {
        let first = build_season(before, SeasonBaselines::default(), false, at_noon()).unwrap();
        build_season(after, first.baselines, false, at_noon()).unwrap()
    }

    #[test]
    fn test_calculate_score() {
        let mut p = PlayerRecord {
            rounds: 10,
            mvps: 2,
            damage: 1500.0,
            headshots: 5,
            deaths: 4,
            ..PlayerRecord::new("p")
        };
        assert_eq!(calculate_score(&p), 180.0);

        p.rounds = 4;
        assert_eq!(calculate_score(&p), 0.0);

        let negative = PlayerRecord {
            rounds: 10,
            deaths: 20,
            ..PlayerRecord::new("n")
        };
        assert_eq!(calculate_score(&negative), 0.1);
    }

    #[test]
    fn test_kda_and_hs_rate() {
        assert_eq!(season_kda(7, 3), 2.33);
        assert_eq!(season_kda(9, 0), 9.0);
        assert_eq!(season_hs_rate(5, 10), 50.0);
        assert_eq!(season_hs_rate(5, 0), 0.0);
    }

    #[test]
    fn test_map_display_name() {
        assert_eq!(map_display_name("de_dust2"), "Dust2");
        assert_eq!(map_display_name("mirage"), "Mirage");
        assert_eq!(map_display_name(""), "");
    }

    #[test]
    fn test_first_build_is_all_zero() {
        let inputs = vec![input("ace", "1", &[("total_kills", 500), ("total_kills_awp", 40)])];

        let build = build_season(&inputs, SeasonBaselines::default(), false, at_noon()).unwrap();

        let p = &build.snapshot.players[0];
        assert!(build.baseline_updated);
        assert_eq!(p.kills, 0);
        assert_eq!(p.fav_weapon, "-");
        assert_eq!(p.fav_weapon_kills, Some(0));
        assert_eq!(p.fav_map.as_deref(), Some("-"));
        assert_eq!(build.snapshot.meta.last_updated, "07.03.2025 12:05");
        assert_eq!(build.snapshot.meta.season_active, Some(true));
    }

    #[test]
    fn test_season_deltas() {
        let before = vec![input(
            "ace",
            "1",
            &[
                ("total_kills", 100),
                ("total_deaths", 50),
                ("total_kills_headshot", 40),
                ("total_rounds_played", 200),
                ("total_kills_awp", 10),
                ("total_kills_ak47", 30),
                ("total_wins_map_de_dust2", 3),
            ],
        )];
        let after = vec![input(
            "ace",
            "1",
            &[
                ("total_kills", 120),
                ("total_deaths", 58),
                ("total_kills_headshot", 50),
                ("total_rounds_played", 230),
                ("total_kills_awp", 22),
                ("total_kills_ak47", 38),
                ("total_wins_map_de_dust2", 5),
                ("total_wins_map_nuke", 1),
            ],
        )];

        let build = two_step(&before, &after);
        let p = &build.snapshot.players[0];

        assert!(!build.baseline_updated);
        assert_eq!(p.kills, 20);
        assert_eq!(p.deaths, 8);
        assert_eq!(p.rounds, 30);
        assert_eq!(p.kda, 2.5);
        assert_eq!(p.hs_rate, 50.0);
        assert_eq!(p.fav_weapon, "AWP");
        assert_eq!(p.fav_weapon_kills, Some(12));
        assert_eq!(p.fav_map.as_deref(), Some("Dust2"));
        assert_eq!(p.weapon_kills("ak47"), 8);
    }

    #[test]
    fn test_negative_deltas_clamped() {
        let before = vec![input("ace", "1", &[("total_kills", 100), ("total_kills_awp", 10)])];
        let after = vec![input("ace", "1", &[("total_kills", 90), ("total_kills_awp", 4)])];

        let build = two_step(&before, &after);
        let p = &build.snapshot.players[0];

        assert_eq!(p.kills, 0);
        assert_eq!(p.weapon_kills("awp"), 0);
        assert_eq!(p.fav_weapon, "-");
    }

    #[test]
    fn test_weapon_ties_follow_list_order() {
        let before = vec![input("ace", "1", &[])];
        // awp comes before ak47 in the weapon list
        let after = vec![input("ace", "1", &[("total_kills_ak47", 5), ("total_kills_awp", 5)])];

        let build = two_step(&before, &after);

        assert_eq!(build.snapshot.players[0].fav_weapon, "AWP");
    }

    #[test]
    fn test_baseline_patched_with_new_counter() {
        let mut baselines = SeasonBaselines::default();
        baselines.entries.insert(
            "1".to_string(),
            Baseline {
                stats: [("total_kills".to_string(), 10)].into_iter().collect(),
                weapons: Some(WeaponKills::new()),
            },
        );
        let inputs = vec![input("ace", "1", &[("total_kills", 15), ("total_mvps", 9)])];

        let build = build_season(&inputs, baselines, false, at_noon()).unwrap();
        let p = &build.snapshot.players[0];

        assert!(build.baseline_updated);
        assert_eq!(p.kills, 5);
        // patched at the current value, so no season MVPs yet
        assert_eq!(p.mvps, 0);
        assert_eq!(build.baselines.get("1").unwrap().stats["total_mvps"], 9);
    }

    #[test]
    fn test_baseline_without_weapons_is_replaced() {
        let mut baselines = SeasonBaselines::default();
        baselines.entries.insert(
            "1".to_string(),
            Baseline {
                stats: [("total_kills".to_string(), 10)].into_iter().collect(),
                weapons: None,
            },
        );
        let inputs = vec![input("ace", "1", &[("total_kills", 15)])];

        let build = build_season(&inputs, baselines, false, at_noon()).unwrap();

        assert!(build.baseline_updated);
        assert_eq!(build.snapshot.players[0].kills, 0);
    }

    #[test]
    fn test_reset_discards_baselines() {
        let before = vec![input("ace", "1", &[("total_kills", 100)])];
        let first = build_season(&before, SeasonBaselines::default(), false, at_noon()).unwrap();
        let after = vec![input("ace", "1", &[("total_kills", 150)])];

        let build = build_season(&after, first.baselines, true, at_noon()).unwrap();

        assert_eq!(build.snapshot.players[0].kills, 0);
        assert_eq!(build.snapshot.meta.season_active, Some(false));
        assert_eq!(build.baselines.get("1").unwrap().stats["total_kills"], 150);
    }

    #[test]
    fn test_players_sorted_by_score() {
        let before = vec![input("low", "1", &[]), input("high", "2", &[])];
        let after = vec![
            input("low", "1", &[("total_rounds_played", 10), ("total_mvps", 1)]),
            input("high", "2", &[("total_rounds_played", 10), ("total_mvps", 4)]),
        ];

        let build = two_step(&before, &after);
        let names: Vec<&str> = build.snapshot.players.iter().map(|p| p.name.as_str()).collect();

        assert_eq!(names, vec!["high", "low"]);
        assert_eq!(build.snapshot.players[0].score, 120.0);
    }

    #[test]
    fn test_display_name_and_profile() {
        let mut i = input("ace", "76561198000000001", &[]);
        i.display_name = Some("Ace of Spades".to_string());
        i.avatar = Some("https://example.invalid/a.png".to_string());

        let build = build_season(&[i], SeasonBaselines::default(), false, at_noon()).unwrap();
        let p = &build.snapshot.players[0];

        assert_eq!(p.name, "Ace of Spades");
        assert_eq!(p.nickname.as_deref(), Some("ace"));
        assert_eq!(p.steam_id.as_deref(), Some("76561198000000001"));
        assert!(p.avatar.is_some());
    }

    #[test]
    fn test_duplicates_rejected() {
        let same_id = vec![input("a", "1", &[]), input("b", "1", &[])];
        assert!(matches!(
            build_season(&same_id, SeasonBaselines::default(), false, at_noon()),
            Err(SeasonError::DuplicateSteamId(_))
        ));

        let same_name = vec![input("a", "1", &[]), input("a", "2", &[])];
        assert!(matches!(
            build_season(&same_name, SeasonBaselines::default(), false, at_noon()),
            Err(SeasonError::DuplicateName(_))
        ));
    }

    #[test]
    fn test_run_season_build_writes_files() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = StorageConfig::new(tmp.path().to_path_buf());
        let input_path = tmp.path().join("lifetime.json");
        write_json(&input_path, &vec![input("ace", "1", &[("total_kills", 10)])]).unwrap();

        run_season_build(&storage, &input_path, false, true).unwrap();
        assert!(!storage.snapshot_path().exists());

        run_season_build(&storage, &input_path, false, false).unwrap();
        let snapshot = crate::storage::load_snapshot(&storage.snapshot_path()).unwrap();
        let baselines: SeasonBaselines = read_json(&storage.baseline_path()).unwrap();

        assert_eq!(snapshot.players[0].name, "ace");
        assert_eq!(baselines.get("1").unwrap().stats["total_kills"], 10);
    }
}
