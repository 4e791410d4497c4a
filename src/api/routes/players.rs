use std::str::FromStr;

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{
    filter_options, player_profile, CategoryFilter, RankingQuery, SortConfig, SortDirection,
    SortKey,
};
use crate::models::PlayerRecord;

#[derive(Debug, Default, Deserialize)]
pub struct PlayersParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
}

impl PlayersParams {
    fn to_query(&self) -> Result<RankingQuery, ApiError> {
        let defaults = SortConfig::default();
        let key = match self.sort.as_deref() {
            Some(s) => SortKey::from_str(s).map_err(|e| ApiError::BadRequest(e.to_string()))?,
            None => defaults.key,
        };
        let direction = match self.direction.as_deref() {
            Some(d) => {
                SortDirection::from_str(d).map_err(|e| ApiError::BadRequest(e.to_string()))?
            }
            None => defaults.direction,
        };

        Ok(RankingQuery {
            search: self.search.clone().unwrap_or_default(),
            category: CategoryFilter::from(self.category.as_deref().unwrap_or_default()),
            sort: SortConfig::new(key, direction),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct PlayersResponse {
    pub generation: u64,
    pub sort: SortConfig,
    pub total: usize,
    pub players: Vec<PlayerRecord>,
}

#[derive(Debug, Serialize)]
pub struct FiltersResponse {
    pub categories: Vec<String>,
    pub sort_keys: Vec<SortKey>,
}

/// Filtered and sorted player table.
pub async fn list_players(
    State(state): State<AppState>,
    Query(params): Query<PlayersParams>,
) -> Result<Json<PlayersResponse>, ApiError> {
    let query = params.to_query()?;
    let store = state.store.read().await;

    let players: Vec<PlayerRecord> = {
        let mut cache = state.ranking_cache.lock().await;
        cache
            .rank(store.generation(), store.players(), &query)
            .into_iter()
            .cloned()
            .collect()
    };

    Ok(Json(PlayersResponse {
        generation: store.generation(),
        sort: query.sort,
        total: store.players().len(),
        players,
    }))
}

/// Player card: record, metrics, radar, badges and weapon distribution.
pub async fn player_detail(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    let store = state.store.read().await;
    let snapshot = store.snapshot();
    let player = snapshot
        .player(&name)
        .ok_or_else(|| ApiError::NotFound(format!("player {}", name)))?;

    Ok(Json(player_profile(player)).into_response())
}

pub async fn filters(State(state): State<AppState>) -> Result<Json<FiltersResponse>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(FiltersResponse {
        categories: filter_options(store.players()),
        sort_keys: SortKey::ALL.to_vec(),
    }))
}
