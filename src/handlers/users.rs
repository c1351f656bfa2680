use super::common::{map_service_error, success_response, PaginatedResponse, PaginationParams};
use crate::{errors::ApiError, handlers::AppState};
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tracing::info;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
pub struct UserListParams {
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

/// Administrator directory of user accounts
#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    params(UserListParams, PaginationParams),
    responses(
        (status = 200, description = "Users listed"),
        (status = 403, description = "Not an administrator", body = crate::errors::ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(filter): Query<UserListParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (users, total) = state
        .services
        .accounts
        .list_users(
            filter.role,
            filter.is_active,
            pagination.page,
            pagination.per_page,
        )
        .await
        .map_err(map_service_error)?;
    Ok(success_response(PaginatedResponse::new(
        users,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

/// Activate a user account
#[utoipa::path(
    post,
    path = "/api/v1/admin/users/{id}/activate",
    params(("id" = i64, Path, description = "User id")),
    responses((status = 200, description = "User activated")),
    tag = "admin"
)]
pub async fn activate_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let account = state
        .services
        .accounts
        .set_active(user_id, true)
        .await
        .map_err(map_service_error)?;
    info!(user_id, "user activated");
    Ok(success_response(account))
}

/// Deactivate a user account
#[utoipa::path(
    post,
    path = "/api/v1/admin/users/{id}/deactivate",
    params(("id" = i64, Path, description = "User id")),
    responses((status = 200, description = "User deactivated")),
    tag = "admin"
)]
pub async fn deactivate_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let account = state
        .services
        .accounts
        .set_active(user_id, false)
        .await
        .map_err(map_service_error)?;
    info!(user_id, "user deactivated");
    Ok(success_response(account))
}

/// Mark a user and their role profile as verified
#[utoipa::path(
    post,
    path = "/api/v1/admin/users/{id}/verify",
    params(("id" = i64, Path, description = "User id")),
    responses((status = 200, description = "User verified")),
    tag = "admin"
)]
pub async fn verify_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let account = state
        .services
        .accounts
        .verify_user(user_id)
        .await
        .map_err(map_service_error)?;
    info!(user_id, "user verified");
    Ok(success_response(account))
}

pub fn admin_user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/{id}/activate", post(activate_user))
        .route("/{id}/deactivate", post(deactivate_user))
        .route("/{id}/verify", post(verify_user))
}
