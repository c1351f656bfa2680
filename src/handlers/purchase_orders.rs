use super::common::{map_service_error, success_response, validate_input};
use crate::{
    auth::AuthenticatedUser,
    errors::ApiError,
    handlers::AppState,
    services::purchase_orders::{
        AcceptOrderInput, ComplaintInput, ComplaintStatusUpdate, OrderListFilter, PartAcceptance,
        SupplierUpsert,
    },
};
use axum::{
    extract::{Json, Path, Query, State},
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Deserialize, IntoParams)]
pub struct OrderListParams {
    pub club_id: Option<i64>,
    pub status: Option<String>,
    #[serde(default)]
    pub archived: bool,
    pub has_review: Option<bool>,
    pub has_complaint: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct AcceptOrderRequest {
    pub supplier: Option<SupplierRequest>,
    #[validate(length(min = 1))]
    pub parts: Vec<PartAcceptanceRequest>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct SupplierRequest {
    #[validate(length(min = 1))]
    pub inn: String,
    pub legal_name: Option<String>,
    pub contact_person: Option<String>,
    pub contact_phone: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
    pub verified: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PartAcceptanceRequest {
    pub part_id: i64,
    /// ACCEPTED, PARTIALLY_ACCEPTED or REJECTED.
    pub status: String,
    pub accepted_quantity: Option<i32>,
    pub comment: Option<String>,
    pub storage_location: Option<String>,
    pub shelf_code: Option<String>,
    pub cell_code: Option<String>,
    pub placement_notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct SupplierReviewRequest {
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct ComplaintRequest {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct ComplaintStatusRequest {
    pub status: Option<String>,
    pub resolved: Option<bool>,
    pub resolution_notes: Option<String>,
}

/// List purchase orders
#[utoipa::path(
    get,
    path = "/api/v1/purchase-orders",
    params(OrderListParams),
    responses((status = 200, description = "Purchase orders listed")),
    tag = "purchase-orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(params): Query<OrderListParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let orders = state
        .services
        .procurement
        .list_orders(OrderListFilter {
            club_id: params.club_id,
            status: params.status,
            archived: params.archived,
            has_review: params.has_review,
            has_complaint: params.has_complaint,
        })
        .await
        .map_err(map_service_error)?;
    Ok(success_response(orders))
}

/// Get one purchase order with parts, reviews and complaints
#[utoipa::path(
    get,
    path = "/api/v1/purchase-orders/{id}",
    params(("id" = i64, Path, description = "Order id")),
    responses(
        (status = 200, description = "Purchase order fetched"),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let order = state
        .services
        .procurement
        .order_detail(order_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(order))
}

/// Mark a pending order as confirmed by the supplier
#[utoipa::path(
    post,
    path = "/api/v1/purchase-orders/{id}/confirm",
    params(("id" = i64, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order confirmed"),
        (status = 400, description = "Order is not pending", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn confirm_order(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let order = state
        .services
        .procurement
        .confirm_order(order_id)
        .await
        .map_err(map_service_error)?;
    info!(order_id, "purchase order confirmed");
    Ok(success_response(order))
}

/// Cancel an open order
#[utoipa::path(
    post,
    path = "/api/v1/purchase-orders/{id}/cancel",
    params(("id" = i64, Path, description = "Order id")),
    responses((status = 200, description = "Order canceled")),
    tag = "purchase-orders"
)]
pub async fn cancel_order(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let order = state
        .services
        .procurement
        .cancel_order(order_id)
        .await
        .map_err(map_service_error)?;
    info!(order_id, "purchase order canceled");
    Ok(success_response(order))
}

/// Accept delivered goods position by position
#[utoipa::path(
    post,
    path = "/api/v1/purchase-orders/{id}/accept",
    request_body = AcceptOrderRequest,
    params(("id" = i64, Path, description = "Order id")),
    responses(
        (status = 200, description = "Acceptance recorded"),
        (status = 400, description = "Payload does not match order parts", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn accept_order(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
    Json(payload): Json<AcceptOrderRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;
    let order = state
        .services
        .procurement
        .accept_order(
            order_id,
            AcceptOrderInput {
                supplier: payload.supplier.map(|s| SupplierUpsert {
                    inn: s.inn,
                    legal_name: s.legal_name,
                    contact_person: s.contact_person,
                    contact_phone: s.contact_phone,
                    contact_email: s.contact_email,
                    verified: s.verified,
                }),
                parts: payload
                    .parts
                    .into_iter()
                    .map(|p| PartAcceptance {
                        part_id: p.part_id,
                        status: p.status,
                        accepted_quantity: p.accepted_quantity,
                        comment: p.comment,
                        storage_location: p.storage_location,
                        shelf_code: p.shelf_code,
                        cell_code: p.cell_code,
                        placement_notes: p.placement_notes,
                    })
                    .collect(),
            },
        )
        .await
        .map_err(map_service_error)?;
    info!(order_id, "purchase order acceptance recorded");
    Ok(success_response(order))
}

/// Leave a supplier review on an order
#[utoipa::path(
    post,
    path = "/api/v1/purchase-orders/{id}/reviews",
    request_body = SupplierReviewRequest,
    params(("id" = i64, Path, description = "Order id")),
    responses((status = 200, description = "Review recorded")),
    tag = "purchase-orders"
)]
pub async fn leave_review(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(order_id): Path<i64>,
    Json(payload): Json<SupplierReviewRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;
    let order = state
        .services
        .procurement
        .leave_review(order_id, payload.rating, payload.comment, Some(user.user_id))
        .await
        .map_err(map_service_error)?;
    Ok(success_response(order))
}

/// File a complaint against the supplier of an order
#[utoipa::path(
    post,
    path = "/api/v1/purchase-orders/{id}/complaints",
    request_body = ComplaintRequest,
    params(("id" = i64, Path, description = "Order id")),
    responses((status = 200, description = "Complaint recorded")),
    tag = "purchase-orders"
)]
pub async fn submit_complaint(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(order_id): Path<i64>,
    Json(payload): Json<ComplaintRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;
    let order = state
        .services
        .procurement
        .submit_complaint(
            order_id,
            ComplaintInput {
                title: payload.title,
                description: payload.description,
                status: payload.status,
            },
            Some(user.user_id),
        )
        .await
        .map_err(map_service_error)?;
    Ok(success_response(order))
}

/// Update the status of a complaint
#[utoipa::path(
    put,
    path = "/api/v1/purchase-orders/{id}/complaints/{review_id}",
    request_body = ComplaintStatusRequest,
    params(
        ("id" = i64, Path, description = "Order id"),
        ("review_id" = i64, Path, description = "Complaint review id")
    ),
    responses(
        (status = 200, description = "Complaint updated"),
        (status = 400, description = "Review is not a complaint", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn update_complaint(
    State(state): State<AppState>,
    Path((order_id, review_id)): Path<(i64, i64)>,
    Json(payload): Json<ComplaintStatusRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let order = state
        .services
        .procurement
        .update_complaint_status(
            order_id,
            review_id,
            ComplaintStatusUpdate {
                status: payload.status,
                resolved: payload.resolved,
                resolution_notes: payload.resolution_notes,
            },
        )
        .await
        .map_err(map_service_error)?;
    Ok(success_response(order))
}

pub fn order_read_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders))
        .route("/{id}", get(get_order))
}

pub fn order_manage_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}/confirm", post(confirm_order))
        .route("/{id}/cancel", post(cancel_order))
        .route("/{id}/accept", post(accept_order))
        .route("/{id}/reviews", post(leave_review))
        .route("/{id}/complaints", post(submit_complaint))
        .route("/{id}/complaints/{review_id}", put(update_complaint))
}
