use super::common::{created_response, map_service_error, success_response, validate_input};
use crate::{
    auth::AuthenticatedUser,
    errors::ApiError,
    handlers::AppState,
    services::maintenance::{
        CreateRequestInput, HelpDecision, OrderPartItem, PartAvailabilityUpdate,
        RequestedPartInput, StockIssueDecision,
    },
};
use axum::{
    extract::{Json, Path, Query, State},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

// Request DTOs

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateRequestRequest {
    pub mechanic_id: i64,
    pub club_id: i64,
    #[validate(range(min = 1))]
    pub lane_number: Option<i32>,
    #[validate(length(min = 1))]
    pub reason: String,
    #[validate(length(min = 1))]
    pub requested_parts: Vec<RequestedPartRequest>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RequestedPartRequest {
    pub part_name: Option<String>,
    pub catalog_number: Option<String>,
    #[validate(range(min = 1))]
    pub quantity: i32,
    pub catalog_id: Option<i64>,
    pub inventory_id: Option<i64>,
    pub warehouse_id: Option<i64>,
    pub location: Option<String>,
    #[serde(default)]
    pub help_requested: bool,
}

impl From<RequestedPartRequest> for RequestedPartInput {
    fn from(value: RequestedPartRequest) -> Self {
        Self {
            part_name: value.part_name,
            catalog_number: value.catalog_number,
            quantity: value.quantity,
            catalog_id: value.catalog_id,
            inventory_id: value.inventory_id,
            warehouse_id: value.warehouse_id,
            location: value.location,
            help_requested: value.help_requested,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RequestListParams {
    pub status: Option<String>,
    pub mechanic_id: Option<i64>,
    pub club_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct AddPartsRequest {
    #[validate(length(min = 1))]
    pub parts: Vec<RequestedPartRequest>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct ApproveRequestRequest {
    pub manager_notes: Option<String>,
    #[serde(default)]
    pub availability: Vec<PartAvailabilityRequest>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PartAvailabilityRequest {
    pub part_id: i64,
    pub available: bool,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RejectRequestRequest {
    #[validate(length(min = 1, message = "Rejection reason is required"))]
    pub reason: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct StockIssueRequest {
    pub manager_notes: Option<String>,
    #[validate(length(min = 1))]
    pub part_decisions: Vec<PartDecisionRequest>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PartDecisionRequest {
    pub part_id: i64,
    pub approved_quantity: i32,
    pub manager_comment: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct OrderPartsRequest {
    #[validate(length(min = 1))]
    pub items: Vec<OrderPartItemRequest>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderPartItemRequest {
    pub part_id: i64,
    pub supplier_id: i64,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct PartIdsRequest {
    #[validate(length(min = 1))]
    pub part_ids: Vec<i64>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UnrepairableRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct HelpRequestRequest {
    #[validate(length(min = 1))]
    pub part_ids: Vec<i64>,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct HelpResolveRequest {
    #[validate(length(min = 1))]
    pub part_ids: Vec<i64>,
    pub decision: HelpDecisionRequest,
    pub comment: Option<String>,
    pub reassigned_mechanic_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HelpDecisionRequest {
    Approved,
    Declined,
    Reassigned,
}

impl From<HelpDecisionRequest> for HelpDecision {
    fn from(value: HelpDecisionRequest) -> Self {
        match value {
            HelpDecisionRequest::Approved => HelpDecision::Approved,
            HelpDecisionRequest::Declined => HelpDecision::Declined,
            HelpDecisionRequest::Reassigned => HelpDecision::Reassigned,
        }
    }
}

// Handlers

/// Create a maintenance request with its part lines
#[utoipa::path(
    post,
    path = "/api/v1/maintenance-requests",
    request_body = CreateRequestRequest,
    responses(
        (status = 201, description = "Request created"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 403, description = "Mechanic has no access to the club", body = crate::errors::ErrorResponse)
    ),
    tag = "maintenance-requests"
)]
pub async fn create_request(
    State(state): State<AppState>,
    Json(payload): Json<CreateRequestRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;
    let view = state
        .services
        .maintenance
        .create_request(CreateRequestInput {
            mechanic_id: payload.mechanic_id,
            club_id: payload.club_id,
            lane_number: payload.lane_number,
            reason: payload.reason,
            parts: payload.requested_parts.into_iter().map(Into::into).collect(),
        })
        .await
        .map_err(map_service_error)?;
    info!(request_id = view.request_id, "maintenance request created");
    Ok(created_response(view))
}

/// List maintenance requests, optionally filtered
#[utoipa::path(
    get,
    path = "/api/v1/maintenance-requests",
    params(RequestListParams),
    responses((status = 200, description = "Requests listed")),
    tag = "maintenance-requests"
)]
pub async fn list_requests(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(params): Query<RequestListParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let service = &state.services.maintenance;
    let views = if let Some(status) = params.status {
        service.list_by_status(&status).await
    } else if let Some(mechanic_id) = params.mechanic_id {
        service.list_by_mechanic(mechanic_id).await
    } else if let Some(club_id) = params.club_id {
        service.list_by_club(club_id, Some(user.user_id)).await
    } else {
        service.list_all().await
    }
    .map_err(map_service_error)?;
    Ok(success_response(views))
}

/// Get one maintenance request
#[utoipa::path(
    get,
    path = "/api/v1/maintenance-requests/{id}",
    params(("id" = i64, Path, description = "Request id")),
    responses(
        (status = 200, description = "Request fetched"),
        (status = 404, description = "Request not found", body = crate::errors::ErrorResponse)
    ),
    tag = "maintenance-requests"
)]
pub async fn get_request(
    State(state): State<AppState>,
    Path(request_id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let view = state
        .services
        .maintenance
        .request_view(request_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(view))
}

/// Add parts to an open request
#[utoipa::path(
    post,
    path = "/api/v1/maintenance-requests/{id}/parts",
    request_body = AddPartsRequest,
    params(("id" = i64, Path, description = "Request id")),
    responses(
        (status = 200, description = "Parts added"),
        (status = 400, description = "Request is closed or payload invalid", body = crate::errors::ErrorResponse)
    ),
    tag = "maintenance-requests"
)]
pub async fn add_parts(
    State(state): State<AppState>,
    Path(request_id): Path<i64>,
    Json(payload): Json<AddPartsRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;
    let view = state
        .services
        .maintenance
        .add_parts(
            request_id,
            payload.parts.into_iter().map(Into::into).collect(),
        )
        .await
        .map_err(map_service_error)?;
    Ok(success_response(view))
}

/// Approve a request
#[utoipa::path(
    post,
    path = "/api/v1/maintenance-requests/{id}/approve",
    request_body = ApproveRequestRequest,
    params(("id" = i64, Path, description = "Request id")),
    responses((status = 200, description = "Request approved")),
    tag = "maintenance-requests"
)]
pub async fn approve_request(
    State(state): State<AppState>,
    Path(request_id): Path<i64>,
    Json(payload): Json<ApproveRequestRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let view = state
        .services
        .maintenance
        .approve_request(
            request_id,
            payload.manager_notes,
            payload
                .availability
                .into_iter()
                .map(|a| PartAvailabilityUpdate {
                    part_id: a.part_id,
                    available: a.available,
                })
                .collect(),
        )
        .await
        .map_err(map_service_error)?;
    info!(request_id, "maintenance request approved");
    Ok(success_response(view))
}

/// Reject a request; all its parts are rejected with the reason
#[utoipa::path(
    post,
    path = "/api/v1/maintenance-requests/{id}/reject",
    request_body = RejectRequestRequest,
    params(("id" = i64, Path, description = "Request id")),
    responses((status = 200, description = "Request rejected")),
    tag = "maintenance-requests"
)]
pub async fn reject_request(
    State(state): State<AppState>,
    Path(request_id): Path<i64>,
    Json(payload): Json<RejectRequestRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;
    let view = state
        .services
        .maintenance
        .reject_request(request_id, payload.reason)
        .await
        .map_err(map_service_error)?;
    info!(request_id, "maintenance request rejected");
    Ok(success_response(view))
}

/// Decide per-part stock issue quantities
#[utoipa::path(
    post,
    path = "/api/v1/maintenance-requests/{id}/issue",
    request_body = StockIssueRequest,
    params(("id" = i64, Path, description = "Request id")),
    responses(
        (status = 200, description = "Stock issue decisions applied"),
        (status = 400, description = "Quantities out of range", body = crate::errors::ErrorResponse)
    ),
    tag = "maintenance-requests"
)]
pub async fn issue_from_stock(
    State(state): State<AppState>,
    Path(request_id): Path<i64>,
    Json(payload): Json<StockIssueRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;
    let view = state
        .services
        .maintenance
        .issue_from_stock(
            request_id,
            payload.manager_notes,
            payload
                .part_decisions
                .into_iter()
                .map(|d| StockIssueDecision {
                    part_id: d.part_id,
                    approved_quantity: d.approved_quantity,
                    manager_comment: d.manager_comment,
                })
                .collect(),
        )
        .await
        .map_err(map_service_error)?;
    Ok(success_response(view))
}

/// Order parts from suppliers; opens one purchase order per supplier
#[utoipa::path(
    post,
    path = "/api/v1/maintenance-requests/{id}/order",
    request_body = OrderPartsRequest,
    params(("id" = i64, Path, description = "Request id")),
    responses((status = 200, description = "Purchase orders created")),
    tag = "maintenance-requests"
)]
pub async fn order_parts(
    State(state): State<AppState>,
    Path(request_id): Path<i64>,
    Json(payload): Json<OrderPartsRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;
    let view = state
        .services
        .maintenance
        .order_parts(
            request_id,
            payload
                .items
                .into_iter()
                .map(|i| OrderPartItem {
                    part_id: i.part_id,
                    supplier_id: i.supplier_id,
                })
                .collect(),
        )
        .await
        .map_err(map_service_error)?;
    info!(request_id, "parts ordered");
    Ok(success_response(view))
}

/// Mark listed parts as delivered
#[utoipa::path(
    post,
    path = "/api/v1/maintenance-requests/{id}/delivered",
    request_body = PartIdsRequest,
    params(("id" = i64, Path, description = "Request id")),
    responses((status = 200, description = "Parts marked delivered")),
    tag = "maintenance-requests"
)]
pub async fn mark_delivered(
    State(state): State<AppState>,
    Path(request_id): Path<i64>,
    Json(payload): Json<PartIdsRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;
    let view = state
        .services
        .maintenance
        .mark_delivered(request_id, payload.part_ids)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(view))
}

/// Mark listed parts as installed and write them off stock
#[utoipa::path(
    post,
    path = "/api/v1/maintenance-requests/{id}/issued",
    request_body = PartIdsRequest,
    params(("id" = i64, Path, description = "Request id")),
    responses((status = 200, description = "Parts installed")),
    tag = "maintenance-requests"
)]
pub async fn mark_issued(
    State(state): State<AppState>,
    Path(request_id): Path<i64>,
    Json(payload): Json<PartIdsRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;
    let view = state
        .services
        .maintenance
        .mark_issued(request_id, payload.part_ids)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(view))
}

/// Complete an approved or in-progress request
#[utoipa::path(
    post,
    path = "/api/v1/maintenance-requests/{id}/complete",
    params(("id" = i64, Path, description = "Request id")),
    responses(
        (status = 200, description = "Request completed"),
        (status = 400, description = "Request is not in a completable state", body = crate::errors::ErrorResponse)
    ),
    tag = "maintenance-requests"
)]
pub async fn complete_request(
    State(state): State<AppState>,
    Path(request_id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let view = state
        .services
        .maintenance
        .complete_request(request_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(view))
}

/// Close a request
#[utoipa::path(
    post,
    path = "/api/v1/maintenance-requests/{id}/close",
    params(("id" = i64, Path, description = "Request id")),
    responses((status = 200, description = "Request closed")),
    tag = "maintenance-requests"
)]
pub async fn close_request(
    State(state): State<AppState>,
    Path(request_id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let view = state
        .services
        .maintenance
        .close_request(request_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(view))
}

/// Mark the equipment unrepairable
#[utoipa::path(
    post,
    path = "/api/v1/maintenance-requests/{id}/unrepairable",
    request_body = UnrepairableRequest,
    params(("id" = i64, Path, description = "Request id")),
    responses((status = 200, description = "Request marked unrepairable")),
    tag = "maintenance-requests"
)]
pub async fn mark_unrepairable(
    State(state): State<AppState>,
    Path(request_id): Path<i64>,
    Json(payload): Json<UnrepairableRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let view = state
        .services
        .maintenance
        .mark_unrepairable(request_id, payload.reason)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(view))
}

/// Publish a NEW request to the open pool
#[utoipa::path(
    post,
    path = "/api/v1/maintenance-requests/{id}/publish",
    params(("id" = i64, Path, description = "Request id")),
    responses((status = 200, description = "Request published")),
    tag = "maintenance-requests"
)]
pub async fn publish_request(
    State(state): State<AppState>,
    Path(request_id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let view = state
        .services
        .maintenance
        .publish_request(request_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(view))
}

/// Flag parts for managerial help
#[utoipa::path(
    post,
    path = "/api/v1/maintenance-requests/{id}/help",
    request_body = HelpRequestRequest,
    params(("id" = i64, Path, description = "Request id")),
    responses((status = 200, description = "Help requested")),
    tag = "maintenance-requests"
)]
pub async fn request_help(
    State(state): State<AppState>,
    Path(request_id): Path<i64>,
    Json(payload): Json<HelpRequestRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;
    let view = state
        .services
        .maintenance
        .request_help(request_id, payload.part_ids, payload.reason)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(view))
}

/// Reply to a help request
#[utoipa::path(
    post,
    path = "/api/v1/maintenance-requests/{id}/help/resolve",
    request_body = HelpResolveRequest,
    params(("id" = i64, Path, description = "Request id")),
    responses((status = 200, description = "Help request resolved")),
    tag = "maintenance-requests"
)]
pub async fn resolve_help(
    State(state): State<AppState>,
    Path(request_id): Path<i64>,
    Json(payload): Json<HelpResolveRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;
    let view = state
        .services
        .maintenance
        .resolve_help(
            request_id,
            payload.part_ids,
            payload.decision.into(),
            payload.comment,
            payload.reassigned_mechanic_id,
        )
        .await
        .map_err(map_service_error)?;
    Ok(success_response(view))
}

pub fn request_read_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_requests))
        .route("/{id}", get(get_request))
}

pub fn request_create_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_request))
        .route("/{id}/parts", post(add_parts))
        .route("/{id}/help", post(request_help))
}

pub fn request_decide_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}/approve", post(approve_request))
        .route("/{id}/reject", post(reject_request))
        .route("/{id}/issue", post(issue_from_stock))
        .route("/{id}/order", post(order_parts))
        .route("/{id}/delivered", post(mark_delivered))
        .route("/{id}/issued", post(mark_issued))
        .route("/{id}/complete", post(complete_request))
        .route("/{id}/close", post(close_request))
        .route("/{id}/unrepairable", post(mark_unrepairable))
        .route("/{id}/publish", post(publish_request))
        .route("/{id}/help/resolve", post(resolve_help))
}
