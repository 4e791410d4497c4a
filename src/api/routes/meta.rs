use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::summarize;
use crate::models::{SeasonArchive, ServerSummary};
use crate::storage::load_hall_of_fame;

#[derive(Debug, Serialize)]
pub struct MetaResponse {
    pub last_updated: String,
    pub season_active: Option<bool>,
    pub generation: u64,
    pub player_count: usize,
    pub loaded_at: DateTime<Utc>,
}

pub async fn meta(State(state): State<AppState>) -> Result<Json<MetaResponse>, ApiError> {
    let store = state.store.read().await;
    let snapshot = store.snapshot();

    Ok(Json(MetaResponse {
        last_updated: snapshot.meta.last_updated.clone(),
        season_active: snapshot.meta.season_active,
        generation: store.generation(),
        player_count: snapshot.players.len(),
        loaded_at: store.loaded_at(),
    }))
}

pub async fn summary(State(state): State<AppState>) -> Result<Json<ServerSummary>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(summarize(store.players())))
}

pub async fn hall_of_fame(
    State(state): State<AppState>,
) -> Result<Json<Vec<SeasonArchive>>, ApiError> {
    let seasons = load_hall_of_fame(&state.storage.hall_of_fame_path())?;
    Ok(Json(seasons))
}

/// Re-read the snapshot from disk and swap it in.
pub async fn reload(State(state): State<AppState>) -> Result<Json<MetaResponse>, ApiError> {
    let mut store = state.store.write().await;
    let generation = store
        .reload()
        .map_err(|e| ApiError::Internal(format!("reload failed: {}", e)))?;
    state.ranking_cache.lock().await.invalidate();
    tracing::info!("Snapshot reloaded via API (generation {})", generation);

    let snapshot = store.snapshot();
    Ok(Json(MetaResponse {
        last_updated: snapshot.meta.last_updated.clone(),
        season_active: snapshot.meta.season_active,
        generation,
        player_count: snapshot.players.len(),
        loaded_at: store.loaded_at(),
    }))
}
