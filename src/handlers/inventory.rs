use super::common::{map_service_error, success_response, validate_input};
use crate::{
    auth::AuthenticatedUser,
    errors::ApiError,
    handlers::AppState,
    services::inventory::{AvailabilityFilter, Placement},
};
use axum::{
    extract::{Json, Query, State},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Deserialize, IntoParams)]
pub struct InventorySearchParams {
    pub warehouse_id: Option<i64>,
    pub q: Option<String>,
    pub availability: Option<AvailabilityFilter>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct StoreStockRequest {
    pub warehouse_id: i64,
    pub catalog_id: i64,
    #[validate(range(min = 1))]
    pub quantity: i32,
    pub storage_location: Option<String>,
    pub shelf_code: Option<String>,
    pub cell_code: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct StockMovementRequest {
    pub catalog_id: i64,
    #[validate(range(min = 1))]
    pub quantity: i32,
    pub request_id: Option<i64>,
}

/// Search warehouse stock
#[utoipa::path(
    get,
    path = "/api/v1/inventory",
    params(InventorySearchParams),
    responses((status = 200, description = "Stock rows matching the filters")),
    tag = "inventory"
)]
pub async fn search_inventory(
    State(state): State<AppState>,
    Query(params): Query<InventorySearchParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let items = state
        .services
        .inventory
        .search(params.warehouse_id, params.q.as_deref(), params.availability)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(items))
}

/// Store stock into a warehouse, creating or topping up the row
#[utoipa::path(
    post,
    path = "/api/v1/inventory",
    request_body = StoreStockRequest,
    responses(
        (status = 200, description = "Stock stored"),
        (status = 400, description = "Invalid quantity", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn store_stock(
    State(state): State<AppState>,
    Json(payload): Json<StoreStockRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;
    let row = state
        .services
        .inventory
        .store_stock(
            payload.warehouse_id,
            payload.catalog_id,
            payload.quantity,
            Placement {
                storage_location: payload.storage_location,
                shelf_code: payload.shelf_code,
                cell_code: payload.cell_code,
                notes: payload.notes,
            },
        )
        .await
        .map_err(map_service_error)?;
    info!(
        warehouse_id = payload.warehouse_id,
        catalog_id = payload.catalog_id,
        "stock stored via API"
    );
    Ok(success_response(row))
}

/// Write stock off for a catalog item
#[utoipa::path(
    post,
    path = "/api/v1/inventory/reserve",
    request_body = StockMovementRequest,
    responses(
        (status = 200, description = "Stock reserved"),
        (status = 422, description = "Not enough stock", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn reserve_stock(
    State(state): State<AppState>,
    Json(payload): Json<StockMovementRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;
    let row = state
        .services
        .inventory
        .reserve_part(payload.catalog_id, payload.quantity, payload.request_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(row))
}

/// Return previously written-off stock
#[utoipa::path(
    post,
    path = "/api/v1/inventory/release",
    request_body = StockMovementRequest,
    responses((status = 200, description = "Stock released")),
    tag = "inventory"
)]
pub async fn release_stock(
    State(state): State<AppState>,
    Json(payload): Json<StockMovementRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;
    let row = state
        .services
        .inventory
        .release_part(payload.catalog_id, payload.quantity)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(row))
}

/// Stock rows at or below the low-stock threshold
#[utoipa::path(
    get,
    path = "/api/v1/inventory/low-stock",
    responses((status = 200, description = "Low stock rows")),
    tag = "inventory"
)]
pub async fn low_stock(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let items = state
        .services
        .inventory
        .low_stock()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(items))
}

/// Warehouses the current user may see
#[utoipa::path(
    get,
    path = "/api/v1/inventory/warehouses",
    responses((status = 200, description = "Accessible warehouses")),
    tag = "inventory"
)]
pub async fn accessible_warehouses(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let warehouses = state
        .services
        .inventory
        .accessible_warehouses(user.user_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(warehouses))
}

pub fn inventory_read_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(search_inventory))
        .route("/low-stock", get(low_stock))
        .route("/warehouses", get(accessible_warehouses))
}

pub fn inventory_mutate_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(store_stock))
        .route("/reserve", post(reserve_stock))
        .route("/release", post(release_stock))
}
