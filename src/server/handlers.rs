//! Request handlers.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use super::AppState;

/// Results returned when the request names no limit.
pub const DEFAULT_LIMIT: usize = 50;

/// Query string of `/search_movies/`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub search_type: Option<String>,
    pub query: Option<String>,
    pub limit: Option<usize>,
}

/// Run one movie search in a fresh browser session.
pub async fn search_movies(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    let search_type = params.search_type.unwrap_or_default();
    let query = params.query.unwrap_or_default();
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);

    match state.search.search(&search_type, &query, limit).await {
        Ok(response) => (
            StatusCode::OK,
            Json(serde_json::json!({ "response": response })),
        ),
        Err(e) => {
            tracing::error!(
                "Search {:?} for {:?} failed: {}",
                search_type,
                query,
                e
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
        }
    }
}

/// Health check endpoint for container orchestration.
pub async fn health() -> impl IntoResponse {
    StatusCode::OK
}
