//! Versus mode: pick two players for a head-to-head comparison.

use serde::Serialize;

use crate::calculate::{compare, Comparison};
use crate::models::PlayerRecord;

/// Players picked so far, by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "players", rename_all = "snake_case")]
pub enum Selection {
    #[default]
    Idle,
    OneSelected(String),
    TwoSelected(String, String),
}

impl Selection {
    /// Select or deselect a player.
    ///
    /// Picking an already selected player removes it. A third distinct pick
    /// while two are selected is ignored.
    pub fn toggle(&mut self, name: &str) {
        let next = match std::mem::take(self) {
            Selection::Idle => Selection::OneSelected(name.to_string()),
            Selection::OneSelected(a) if a == name => Selection::Idle,
            Selection::OneSelected(a) => Selection::TwoSelected(a, name.to_string()),
            Selection::TwoSelected(a, b) if a == name => Selection::OneSelected(b),
            Selection::TwoSelected(a, b) if b == name => Selection::OneSelected(a),
            full @ Selection::TwoSelected(..) => full,
        };
        *self = next;
    }

    pub fn clear(&mut self) {
        *self = Selection::Idle;
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names().contains(&name)
    }

    /// Selected names in pick order.
    pub fn names(&self) -> Vec<&str> {
        match self {
            Selection::Idle => vec![],
            Selection::OneSelected(a) => vec![a.as_str()],
            Selection::TwoSelected(a, b) => vec![a.as_str(), b.as_str()],
        }
    }

    pub fn len(&self) -> usize {
        self.names().len()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Selection::Idle)
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Selection::TwoSelected(..))
    }
}

/// Versus mode toggle plus its selection, bound to one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VersusSession {
    active: bool,
    selection: Selection,
    generation: u64,
}

impl VersusSession {
    /// Start a session for the snapshot with the given generation.
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            ..Self::default()
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Turn versus mode on or off. Either way the selection is discarded.
    pub fn toggle_mode(&mut self) {
        self.active = !self.active;
        self.selection.clear();
    }

    /// Pick a player. Ignored while versus mode is off.
    pub fn select(&mut self, name: &str) {
        if self.active {
            self.selection.toggle(name);
        }
    }

    /// Close the comparison: clears the selection and leaves versus mode.
    pub fn reset(&mut self) {
        self.selection.clear();
        self.active = false;
    }

    /// Drop the selection if the snapshot has been replaced.
    pub fn observe_generation(&mut self, generation: u64) {
        if generation != self.generation {
            self.generation = generation;
            self.selection.clear();
        }
    }

    /// Comparison of the two selected players, once both are picked and
    /// present in `players`.
    pub fn comparison<'a>(&self, players: &'a [PlayerRecord]) -> Option<Comparison<'a>> {
        let Selection::TwoSelected(a, b) = &self.selection else {
            return None;
        };
        let first = players.iter().find(|p| p.name == *a)?;
        let second = players.iter().find(|p| p.name == *b)?;
        Some(compare(first, second))
    }
}
