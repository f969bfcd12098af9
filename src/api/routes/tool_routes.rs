use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::post};

use crate::{
    auth::CurrentUser,
    dto::{SearchRequest, SearchResponse},
    errors::{ApiError, ErrorResponse},
    search::run_search_tool,
    state::AppState,
};

pub fn tool_routes() -> Router<Arc<AppState>> {
    Router::new().route("/search", post(search_handler))
}

/// Runs a web search. Backend failures are reported inside `result`.
#[utoipa::path(
    post,
    path = "/api/v1/tools/search",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Formatted search results", body = SearchResponse),
        (status = 400, description = "Empty query", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "Tools"
)]
#[axum::debug_handler]
pub async fn search_handler(
    State(app_state): State<Arc<AppState>>,
    _current_user: CurrentUser,
    Json(payload): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    payload.validate()?;
    let max_results = payload
        .max_results
        .filter(|n| *n > 0)
        .unwrap_or_else(|| app_state.search_max_results());
    let result = run_search_tool(app_state.search.as_deref(), &payload.query, max_results).await;
    Ok(Json(SearchResponse { result }))
}
