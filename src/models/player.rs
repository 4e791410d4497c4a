//! Per-player season statistics.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Kill counts keyed by weapon id (`"ak47"`, `"awp"`, ...), in the order
/// the snapshot lists them.
pub type WeaponKills = IndexMap<String, i64>;

/// One player's statistics for a season snapshot.
///
/// Numeric fields accept integers, floats and `null`. Floats are truncated
/// into the integer counters and anything that is not a number reads as
/// zero, so one odd row never fails the whole snapshot. Negative values
/// flow through the formulas unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Display name, unique within a snapshot
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,

    #[serde(deserialize_with = "lenient_f64")]
    pub score: f64,
    #[serde(deserialize_with = "lenient_i64")]
    pub kills: i64,
    #[serde(deserialize_with = "lenient_i64")]
    pub deaths: i64,
    #[serde(deserialize_with = "lenient_f64")]
    pub damage: f64,

    /// Headshot percentage (0-100)
    #[serde(deserialize_with = "lenient_f64")]
    pub hs_rate: f64,

    #[serde(deserialize_with = "lenient_i64")]
    pub wins: i64,
    #[serde(deserialize_with = "lenient_i64")]
    pub mvps: i64,
    #[serde(deserialize_with = "lenient_i64")]
    pub rounds: i64,

    /// Kill/death ratio as computed upstream
    #[serde(deserialize_with = "lenient_f64")]
    pub kda: f64,

    #[serde(default)]
    pub fav_weapon: String,

    #[serde(
        default,
        deserialize_with = "lenient_opt_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub fav_weapon_kills: Option<i64>,

    /// Per-weapon kills; `None` when the snapshot carries no breakdown
    #[serde(
        default,
        deserialize_with = "lenient_weapons",
        skip_serializing_if = "Option::is_none"
    )]
    pub weapons: Option<WeaponKills>,

    #[serde(default, deserialize_with = "lenient_i64")]
    pub headshots: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub shots_fired: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub shots_hit: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub money_earned: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub knife_kills: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub blind_kills: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub bombs_defused: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub bombs_planted: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub broken_windows: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fav_map: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    #[serde(
        default,
        rename = "steamId",
        skip_serializing_if = "Option::is_none"
    )]
    pub steam_id: Option<String>,
}

/// Integer counter from any JSON value; floats truncate toward zero.
fn count_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f as i64),
        _ => None,
    }
}

fn real_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(count_from_value(&value).unwrap_or_default())
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(real_from_value(&value)
        .filter(|f| f.is_finite())
        .unwrap_or_default())
}

fn lenient_opt_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(count_from_value(&value))
}

/// Weapon breakdown as sent upstream; anything but an object is ignored.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawWeapons {
    Map(IndexMap<String, Value>),
    Other(Value),
}

fn lenient_weapons<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<WeaponKills>, D::Error> {
    match RawWeapons::deserialize(deserializer)? {
        RawWeapons::Map(map) => Ok(Some(
            map.into_iter()
                .map(|(weapon, kills)| (weapon, count_from_value(&kills).unwrap_or_default()))
                .collect(),
        )),
        RawWeapons::Other(_) => Ok(None),
    }
}

impl PlayerRecord {
    /// Create a record with the given name and all counters zeroed.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Kills with a given weapon. Missing entries count as zero.
    pub fn weapon_kills(&self, weapon_id: &str) -> i64 {
        self.weapons
            .as_ref()
            .and_then(|w| w.get(weapon_id))
            .copied()
            .unwrap_or(0)
    }

    /// Name shown in compact views; falls back to `name`.
    pub fn display_name(&self) -> &str {
        self.nickname
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.name)
    }
}
