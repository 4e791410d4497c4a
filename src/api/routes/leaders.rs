use std::str::FromStr;

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{
    self, category_leaders, default_categories, equipment_masters, leader_entries, LeaderEntry,
    MasteryEntry, SortKey,
};
use crate::models::PlayerRecord;

#[derive(Debug, Deserialize)]
pub struct LeadersParams {
    pub stat: Option<String>,
    /// Kept as text so a bad value gets the JSON error body
    pub k: Option<String>,
}

impl LeadersParams {
    fn k(&self) -> Result<Option<usize>, ApiError> {
        self.k
            .as_deref()
            .map(|s| {
                s.parse::<usize>()
                    .map_err(|_| ApiError::BadRequest(format!("invalid k: {}", s)))
            })
            .transpose()
    }
}

#[derive(Debug, Serialize)]
struct LeadersResponse<'a> {
    stat: SortKey,
    entries: Vec<LeaderEntry<'a>>,
}

#[derive(Debug, Serialize)]
struct PodiumResponse<'a> {
    podium: Option<[&'a PlayerRecord; calculate::leaders::PODIUM_SIZE]>,
}

#[derive(Debug, Serialize)]
struct EquipmentRow<'a> {
    id: &'a str,
    label: &'a str,
    master: Option<MasteryEntry<'a>>,
}

/// Top-K by one stat. Defaults to score and the configured K.
pub async fn leaders(
    State(state): State<AppState>,
    Query(params): Query<LeadersParams>,
) -> Result<Response, ApiError> {
    let stat = match params.stat.as_deref() {
        Some(s) => SortKey::from_str(s).map_err(|e| ApiError::BadRequest(e.to_string()))?,
        None => SortKey::Score,
    };
    if stat == SortKey::Name {
        return Err(ApiError::BadRequest("name is not a ranking stat".to_string()));
    }
    let k = params.k()?.unwrap_or_else(|| state.top_k());

    let store = state.store.read().await;
    let response = LeadersResponse {
        stat,
        entries: leader_entries(store.players(), stat, k),
    };
    Ok(Json(response).into_response())
}

/// The preset boards shown next to the podium.
pub async fn category_boards(State(state): State<AppState>) -> Result<Response, ApiError> {
    let store = state.store.read().await;
    Ok(Json(category_leaders(store.players(), state.top_k())).into_response())
}

pub async fn podium(State(state): State<AppState>) -> Result<Response, ApiError> {
    let store = state.store.read().await;
    let response = PodiumResponse {
        podium: calculate::podium(store.players()),
    };
    Ok(Json(response).into_response())
}

/// Master of each weapon class, in category order. Classes nobody
/// qualifies for have a null master.
pub async fn equipment(State(state): State<AppState>) -> Result<Response, ApiError> {
    let store = state.store.read().await;
    let categories = default_categories();
    let masters = equipment_masters(store.players(), &categories);

    let rows: Vec<EquipmentRow<'_>> = categories
        .iter()
        .map(|cat| EquipmentRow {
            id: &cat.id,
            label: &cat.label,
            master: masters.get(cat.id.as_str()).cloned(),
        })
        .collect();
    Ok(Json(rows).into_response())
}
