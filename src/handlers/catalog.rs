use super::common::{
    created_response, map_service_error, success_response, validate_input, PaginatedResponse,
    PaginationParams,
};
use crate::{errors::ApiError, handlers::AppState, services::catalog::CreateCatalogEntry};
use axum::{
    extract::{Json, Path, Query, State},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCatalogEntryRequest {
    #[validate(length(min = 1))]
    pub catalog_number: String,
    pub official_name: Option<String>,
    pub common_name: Option<String>,
    pub description: Option<String>,
    pub unit: Option<String>,
    #[serde(default)]
    pub is_unique: bool,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct CatalogSearchParams {
    pub q: String,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    20
}

/// Create a catalog entry
#[utoipa::path(
    post,
    path = "/api/v1/catalog",
    request_body = CreateCatalogEntryRequest,
    responses(
        (status = 201, description = "Catalog entry created"),
        (status = 409, description = "Catalog number already exists", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn create_entry(
    State(state): State<AppState>,
    Json(payload): Json<CreateCatalogEntryRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;
    let entry = state
        .services
        .catalog
        .create_entry(CreateCatalogEntry {
            catalog_number: payload.catalog_number,
            official_name: payload.official_name,
            common_name: payload.common_name,
            description: payload.description,
            unit: payload.unit,
            is_unique: payload.is_unique,
        })
        .await
        .map_err(map_service_error)?;
    Ok(created_response(entry))
}

/// Get a catalog entry by id
#[utoipa::path(
    get,
    path = "/api/v1/catalog/{id}",
    params(("id" = i64, Path, description = "Catalog id")),
    responses(
        (status = 200, description = "Catalog entry fetched"),
        (status = 404, description = "Catalog entry not found", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn get_entry(
    State(state): State<AppState>,
    Path(catalog_id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let entry = state
        .services
        .catalog
        .get_entry(catalog_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(entry))
}

/// List catalog entries
#[utoipa::path(
    get,
    path = "/api/v1/catalog",
    params(PaginationParams),
    responses((status = 200, description = "Catalog listed")),
    tag = "catalog"
)]
pub async fn list_entries(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (entries, total) = state
        .services
        .catalog
        .list(pagination.page, pagination.per_page)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(PaginatedResponse::new(
        entries,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

/// Substring search over catalog numbers and names
#[utoipa::path(
    get,
    path = "/api/v1/catalog/search",
    params(CatalogSearchParams),
    responses((status = 200, description = "Matching catalog entries")),
    tag = "catalog"
)]
pub async fn search_entries(
    State(state): State<AppState>,
    Query(params): Query<CatalogSearchParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let entries = state
        .services
        .catalog
        .search(&params.q, params.limit)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(entries))
}

pub fn catalog_read_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_entries))
        .route("/search", get(search_entries))
        .route("/{id}", get(get_entry))
}

pub fn catalog_manage_routes() -> Router<AppState> {
    Router::new().route("/", post(create_entry))
}
