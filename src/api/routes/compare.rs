use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{self, Comparison};

#[derive(Debug, Deserialize)]
pub struct CompareParams {
    pub a: Option<String>,
    pub b: Option<String>,
}

#[derive(Debug, Serialize)]
struct CompareResponse<'a> {
    #[serde(flatten)]
    comparison: Comparison<'a>,
    /// Rows won as `[first, second]`
    tally: (usize, usize),
}

/// Head-to-head comparison of two distinct players.
pub async fn compare(
    State(state): State<AppState>,
    Query(params): Query<CompareParams>,
) -> Result<Response, ApiError> {
    let (Some(a), Some(b)) = (params.a, params.b) else {
        return Err(ApiError::BadRequest(
            "two players are required (a and b)".to_string(),
        ));
    };
    if a == b {
        return Err(ApiError::BadRequest(format!(
            "cannot compare {} with itself",
            a
        )));
    }

    let store = state.store.read().await;
    let snapshot = store.snapshot();
    let first = snapshot
        .player(&a)
        .ok_or_else(|| ApiError::NotFound(format!("player {}", a)))?;
    let second = snapshot
        .player(&b)
        .ok_or_else(|| ApiError::NotFound(format!("player {}", b)))?;

    let comparison = calculate::compare(first, second);
    let tally = comparison.tally();
    Ok(Json(CompareResponse { comparison, tally }).into_response())
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::test_support::*;
    use axum::http::StatusCode;

    fn roster() -> Vec<crate::models::PlayerRecord> {
        let mut b = player("b", 150.0, 30, "AK47");
        b.mvps = 3;
        vec![player("a", 100.0, 20, "AWP"), b]
    }

    #[tokio::test]
    async fn test_compare() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_test_state(tmp.path(), &snapshot(roster()));

        let (status, json) = get_json(build_router(state), "/api/compare?a=a&b=b").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["first"]["name"], "a");
        assert_eq!(json["second"]["name"], "b");
        assert_eq!(json["rows"].as_array().unwrap().len(), 8);
        assert_eq!(json["rows"][0]["label"], "Score");
        assert_eq!(json["rows"][0]["winner"], "second");
        assert_eq!(json["radar"][0]["axis"], "Aggression");
        // a: kpr 1.0 -> 50, b: kpr 1.5 -> 75
        assert_eq!(json["radar"][0]["first"], 50.0);
        assert_eq!(json["radar"][0]["second"], 75.0);
        assert_eq!(json["tally"][0], 0);
    }

    #[tokio::test]
    async fn test_compare_requires_two_players() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_test_state(tmp.path(), &snapshot(roster()));
        let app = build_router(state);

        let (status, _) = get_json(app.clone(), "/api/compare?a=a").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get_json(app, "/api/compare?a=a&b=a").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_compare_unknown_player() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_test_state(tmp.path(), &snapshot(roster()));

        let (status, json) = get_json(build_router(state), "/api/compare?a=a&b=zed").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["error"]["message"].as_str().unwrap().contains("zed"));
    }
}
