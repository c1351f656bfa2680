use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    PaginatedResponse, PaginationParams,
};
use crate::{
    auth::AuthenticatedUser,
    errors::ApiError,
    handlers::AppState,
    services::work_logs::{CreateWorkLogInput, WorkLogSearch},
};
use axum::{
    extract::{Json, Path, Query, State},
    routing::{delete, get, post, put},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateWorkLogRequest {
    pub club_id: Option<i64>,
    #[validate(range(min = 1))]
    pub lane_number: Option<i32>,
    pub mechanic_id: Option<i64>,
    #[validate(length(min = 1))]
    pub work_type: String,
    pub problem_description: Option<String>,
    #[validate(range(min = 0.0))]
    pub estimated_hours: Option<f64>,
    #[validate(range(min = 1, max = 5))]
    pub priority: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateStatusRequest {
    #[validate(length(min = 1))]
    pub status: String,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AssignMechanicRequest {
    pub mechanic_id: i64,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateDetailsRequest {
    pub work_performed: Option<String>,
    pub solution_description: Option<String>,
    #[validate(range(min = 0.0))]
    pub actual_hours: Option<f64>,
    #[validate(range(min = 0.0))]
    pub labor_cost: Option<f64>,
    #[validate(range(min = 0.0))]
    pub parts_cost: Option<f64>,
    #[validate(range(min = 1, max = 10))]
    pub quality_rating: Option<i32>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct WorkLogSearchParams {
    pub club_id: Option<i64>,
    pub lane_number: Option<i32>,
    pub mechanic_id: Option<i64>,
    pub status: Option<String>,
    pub work_type: Option<String>,
    pub keyword: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub active_only: bool,
}

/// Create a work log manually
#[utoipa::path(
    post,
    path = "/api/v1/work-logs",
    request_body = CreateWorkLogRequest,
    responses(
        (status = 201, description = "Work log created"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "work-logs"
)]
pub async fn create_work_log(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateWorkLogRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;
    let log = state
        .services
        .work_logs
        .create_manual(
            CreateWorkLogInput {
                club_id: payload.club_id,
                lane_number: payload.lane_number,
                mechanic_id: payload.mechanic_id,
                work_type: payload.work_type,
                problem_description: payload.problem_description,
                estimated_hours: payload.estimated_hours,
                priority: payload.priority,
            },
            user.user_id,
        )
        .await
        .map_err(map_service_error)?;
    info!(log_id = log.log_id, "work log created via API");
    Ok(created_response(log))
}

/// Open a work log from a maintenance request
#[utoipa::path(
    post,
    path = "/api/v1/work-logs/from-request/{request_id}",
    params(("request_id" = i64, Path, description = "Maintenance request id")),
    responses(
        (status = 201, description = "Work log created"),
        (status = 404, description = "Request not found", body = crate::errors::ErrorResponse)
    ),
    tag = "work-logs"
)]
pub async fn create_from_request(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(request_id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let log = state
        .services
        .work_logs
        .create_from_request(request_id, user.user_id)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(log))
}

/// Search work logs
#[utoipa::path(
    get,
    path = "/api/v1/work-logs",
    params(WorkLogSearchParams, PaginationParams),
    responses((status = 200, description = "Work logs listed")),
    tag = "work-logs"
)]
pub async fn search_work_logs(
    State(state): State<AppState>,
    Query(params): Query<WorkLogSearchParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (logs, total) = state
        .services
        .work_logs
        .search(WorkLogSearch {
            club_id: params.club_id,
            lane_number: params.lane_number,
            mechanic_id: params.mechanic_id,
            status: params.status,
            work_type: params.work_type,
            keyword: params.keyword,
            start_date: params.start_date,
            end_date: params.end_date,
            active_only: params.active_only,
            page: pagination.page,
            per_page: pagination.per_page,
        })
        .await
        .map_err(map_service_error)?;
    Ok(success_response(PaginatedResponse::new(
        logs,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

/// Get a work log
#[utoipa::path(
    get,
    path = "/api/v1/work-logs/{id}",
    params(("id" = i64, Path, description = "Work log id")),
    responses(
        (status = 200, description = "Work log fetched"),
        (status = 404, description = "Work log not found", body = crate::errors::ErrorResponse)
    ),
    tag = "work-logs"
)]
pub async fn get_work_log(
    State(state): State<AppState>,
    Path(log_id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let log = state
        .services
        .work_logs
        .get(log_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(log))
}

/// Status history of a work log
#[utoipa::path(
    get,
    path = "/api/v1/work-logs/{id}/history",
    params(("id" = i64, Path, description = "Work log id")),
    responses((status = 200, description = "Status history")),
    tag = "work-logs"
)]
pub async fn work_log_history(
    State(state): State<AppState>,
    Path(log_id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let history = state
        .services
        .work_logs
        .history_of(log_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(history))
}

/// Update the status of a work log
#[utoipa::path(
    put,
    path = "/api/v1/work-logs/{id}/status",
    request_body = UpdateStatusRequest,
    params(("id" = i64, Path, description = "Work log id")),
    responses((status = 200, description = "Status updated")),
    tag = "work-logs"
)]
pub async fn update_status(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(log_id): Path<i64>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;
    let log = state
        .services
        .work_logs
        .update_status(log_id, &payload.status, payload.reason, user.user_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(log))
}

/// Assign a mechanic to a work log
#[utoipa::path(
    post,
    path = "/api/v1/work-logs/{id}/assign",
    request_body = AssignMechanicRequest,
    params(("id" = i64, Path, description = "Work log id")),
    responses((status = 200, description = "Mechanic assigned")),
    tag = "work-logs"
)]
pub async fn assign_mechanic(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(log_id): Path<i64>,
    Json(payload): Json<AssignMechanicRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let log = state
        .services
        .work_logs
        .assign_mechanic(log_id, payload.mechanic_id, user.user_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(log))
}

/// Record work outcome and costs
#[utoipa::path(
    put,
    path = "/api/v1/work-logs/{id}/details",
    request_body = UpdateDetailsRequest,
    params(("id" = i64, Path, description = "Work log id")),
    responses((status = 200, description = "Details updated")),
    tag = "work-logs"
)]
pub async fn update_details(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(log_id): Path<i64>,
    Json(payload): Json<UpdateDetailsRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;
    let log = state
        .services
        .work_logs
        .update_details(
            log_id,
            payload.work_performed,
            payload.solution_description,
            payload.actual_hours,
            payload.labor_cost,
            payload.parts_cost,
            payload.quality_rating,
            user.user_id,
        )
        .await
        .map_err(map_service_error)?;
    Ok(success_response(log))
}

/// Active work logs (created, assigned or in progress)
#[utoipa::path(
    get,
    path = "/api/v1/work-logs/active",
    responses((status = 200, description = "Active work logs")),
    tag = "work-logs"
)]
pub async fn active_work_logs(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let logs = state
        .services
        .work_logs
        .active_logs()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(logs))
}

/// High-priority work logs
#[utoipa::path(
    get,
    path = "/api/v1/work-logs/high-priority",
    responses((status = 200, description = "High-priority work logs")),
    tag = "work-logs"
)]
pub async fn high_priority_work_logs(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let logs = state
        .services
        .work_logs
        .high_priority_logs()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(logs))
}

/// Completed work logs, newest completion first
#[utoipa::path(
    get,
    path = "/api/v1/work-logs/completed",
    responses((status = 200, description = "Completed work logs")),
    tag = "work-logs"
)]
pub async fn completed_work_logs(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let logs = state
        .services
        .work_logs
        .completed_logs()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(logs))
}

/// Work logs that have not been completed yet
#[utoipa::path(
    get,
    path = "/api/v1/work-logs/pending",
    responses((status = 200, description = "Pending work logs")),
    tag = "work-logs"
)]
pub async fn pending_work_logs(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let logs = state
        .services
        .work_logs
        .pending_logs()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(logs))
}

/// Work logs of one mechanic
#[utoipa::path(
    get,
    path = "/api/v1/work-logs/mechanic/{mechanic_id}",
    params(("mechanic_id" = i64, Path, description = "Mechanic profile id")),
    responses((status = 200, description = "Mechanic's work logs")),
    tag = "work-logs"
)]
pub async fn work_logs_by_mechanic(
    State(state): State<AppState>,
    Path(mechanic_id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let logs = state
        .services
        .work_logs
        .logs_by_mechanic(mechanic_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(logs))
}

/// Delete a work log and its history
#[utoipa::path(
    delete,
    path = "/api/v1/work-logs/{id}",
    params(("id" = i64, Path, description = "Work log id")),
    responses((status = 204, description = "Work log deleted")),
    tag = "work-logs"
)]
pub async fn delete_work_log(
    State(state): State<AppState>,
    Path(log_id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state
        .services
        .work_logs
        .delete(log_id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

pub fn work_log_read_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(search_work_logs))
        .route("/active", get(active_work_logs))
        .route("/high-priority", get(high_priority_work_logs))
        .route("/completed", get(completed_work_logs))
        .route("/pending", get(pending_work_logs))
        .route("/mechanic/{mechanic_id}", get(work_logs_by_mechanic))
        .route("/{id}", get(get_work_log))
        .route("/{id}/history", get(work_log_history))
}

pub fn work_log_manage_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_work_log))
        .route("/from-request/{request_id}", post(create_from_request))
        .route("/{id}/status", put(update_status))
        .route("/{id}/assign", post(assign_mechanic))
        .route("/{id}/details", put(update_details))
        .route("/{id}", delete(delete_work_log))
}
