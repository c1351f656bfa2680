use super::common::{map_service_error, success_response};
use crate::{auth::AuthenticatedUser, errors::ApiError, handlers::AppState};
use axum::{
    extract::{Query, State},
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
pub struct GlobalSearchParams {
    pub q: String,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    10
}

/// Global search over parts, requests, work logs and clubs
#[utoipa::path(
    get,
    path = "/api/v1/search",
    params(GlobalSearchParams),
    responses(
        (status = 200, description = "Search results"),
        (status = 400, description = "Empty query", body = crate::errors::ErrorResponse)
    ),
    tag = "search"
)]
pub async fn global_search(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(params): Query<GlobalSearchParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let results = state
        .services
        .search
        .search(&params.q, params.limit, &user)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(results))
}

pub fn search_routes() -> Router<AppState> {
    Router::new().route("/", get(global_search))
}
