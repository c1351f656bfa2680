use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    PaginatedResponse, PaginationParams,
};
use crate::{
    auth::AuthenticatedUser,
    errors::ApiError,
    handlers::AppState,
    services::clubs::{CreateClubInput, UpdateClubInput},
};
use axum::{
    extract::{Json, Path, Query, State},
    routing::{delete, get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateClubRequest {
    pub owner_id: Option<i64>,
    #[validate(length(min = 1))]
    pub name: String,
    pub address: Option<String>,
    #[validate(range(min = 0))]
    pub lanes_count: i32,
    pub contact_phone: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateClubRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    #[validate(range(min = 0))]
    pub lanes_count: Option<i32>,
    pub contact_phone: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct AssignStaffRequest {
    pub user_id: i64,
    #[validate(length(min = 1))]
    pub role: String,
}

/// Public directory of active verified clubs
#[utoipa::path(
    get,
    path = "/api/v1/public/clubs",
    responses((status = 200, description = "Public clubs listed")),
    tag = "clubs"
)]
pub async fn public_clubs(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let clubs = state
        .services
        .clubs
        .public_clubs()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(clubs))
}

/// List clubs
#[utoipa::path(
    get,
    path = "/api/v1/clubs",
    params(PaginationParams),
    responses((status = 200, description = "Clubs listed")),
    tag = "clubs"
)]
pub async fn list_clubs(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (clubs, total) = state
        .services
        .clubs
        .list_clubs(pagination.page, pagination.per_page)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(PaginatedResponse::new(
        clubs,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

/// Get a club by id
#[utoipa::path(
    get,
    path = "/api/v1/clubs/{id}",
    params(("id" = i64, Path, description = "Club id")),
    responses(
        (status = 200, description = "Club fetched"),
        (status = 404, description = "Club not found", body = crate::errors::ErrorResponse)
    ),
    tag = "clubs"
)]
pub async fn get_club(
    State(state): State<AppState>,
    Path(club_id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let club = state
        .services
        .clubs
        .get_club(club_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(club))
}

/// Create a club
#[utoipa::path(
    post,
    path = "/api/v1/clubs",
    request_body = CreateClubRequest,
    responses(
        (status = 201, description = "Club created"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "clubs"
)]
pub async fn create_club(
    State(state): State<AppState>,
    Json(payload): Json<CreateClubRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;
    let club = state
        .services
        .clubs
        .create_club(CreateClubInput {
            owner_id: payload.owner_id,
            name: payload.name,
            address: payload.address,
            lanes_count: payload.lanes_count,
            contact_phone: payload.contact_phone,
            contact_email: payload.contact_email,
        })
        .await
        .map_err(map_service_error)?;
    info!(club_id = club.club_id, "club created via API");
    Ok(created_response(club))
}

/// Update a club
#[utoipa::path(
    put,
    path = "/api/v1/clubs/{id}",
    request_body = UpdateClubRequest,
    params(("id" = i64, Path, description = "Club id")),
    responses(
        (status = 200, description = "Club updated"),
        (status = 404, description = "Club not found", body = crate::errors::ErrorResponse)
    ),
    tag = "clubs"
)]
pub async fn update_club(
    State(state): State<AppState>,
    Path(club_id): Path<i64>,
    Json(payload): Json<UpdateClubRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;
    let club = state
        .services
        .clubs
        .update_club(
            club_id,
            UpdateClubInput {
                name: payload.name,
                address: payload.address,
                lanes_count: payload.lanes_count,
                contact_phone: payload.contact_phone,
                contact_email: payload.contact_email,
                is_active: payload.is_active,
            },
        )
        .await
        .map_err(map_service_error)?;
    Ok(success_response(club))
}

/// List active staff of a club
#[utoipa::path(
    get,
    path = "/api/v1/clubs/{id}/staff",
    params(("id" = i64, Path, description = "Club id")),
    responses((status = 200, description = "Staff listed")),
    tag = "clubs"
)]
pub async fn club_staff(
    State(state): State<AppState>,
    Path(club_id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let staff = state
        .services
        .clubs
        .staff_of(club_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(staff))
}

/// Assign a user to club staff
#[utoipa::path(
    post,
    path = "/api/v1/clubs/{id}/staff",
    request_body = AssignStaffRequest,
    params(("id" = i64, Path, description = "Club id")),
    responses(
        (status = 201, description = "Staff member assigned"),
        (status = 409, description = "Already an active member", body = crate::errors::ErrorResponse)
    ),
    tag = "clubs"
)]
pub async fn assign_staff(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(club_id): Path<i64>,
    Json(payload): Json<AssignStaffRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;
    let record = state
        .services
        .clubs
        .assign_staff(club_id, payload.user_id, &payload.role, Some(user.user_id))
        .await
        .map_err(map_service_error)?;
    Ok(created_response(record))
}

/// Deactivate a staff membership
#[utoipa::path(
    delete,
    path = "/api/v1/clubs/{id}/staff/{user_id}",
    params(
        ("id" = i64, Path, description = "Club id"),
        ("user_id" = i64, Path, description = "User id")
    ),
    responses(
        (status = 204, description = "Staff member removed"),
        (status = 404, description = "Not an active member", body = crate::errors::ErrorResponse)
    ),
    tag = "clubs"
)]
pub async fn remove_staff(
    State(state): State<AppState>,
    Path((club_id, user_id)): Path<(i64, i64)>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state
        .services
        .clubs
        .remove_staff(club_id, user_id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

pub fn club_read_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_clubs))
        .route("/{id}", get(get_club))
        .route("/{id}/staff", get(club_staff))
}

pub fn club_manage_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_club))
        .route("/{id}", put(update_club))
        .route("/{id}/staff", post(assign_staff))
        .route("/{id}/staff/{user_id}", delete(remove_staff))
}
