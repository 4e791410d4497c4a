//! # Frag Board
//!
//! Season leaderboard engine for a community game server.
//!
//! ## Architecture
//!
//! - **models**: Snapshot, player records and derived stat types
//! - **calculate**: Pure engine (metrics, ranking, leaders, mastery, comparison)
//! - **versus**: Two-player selection for head-to-head mode
//! - **season**: Builds a season snapshot from lifetime counters and baselines
//! - **storage**: JSON files in the data directory and the live snapshot store
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod models;
pub mod season;
pub mod storage;
pub mod versus;

pub use models::*;
