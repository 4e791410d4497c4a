//! Core data models for the leaderboard.

mod hall_of_fame;
mod player;
mod snapshot;
mod stats;

pub use hall_of_fame::*;
pub use player::*;
pub use snapshot::*;
pub use stats::*;
