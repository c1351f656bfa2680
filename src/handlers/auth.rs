use super::common::{created_response, map_service_error, success_response, validate_input};
use crate::{
    auth::AuthenticatedUser,
    errors::ApiError,
    handlers::AppState,
    services::accounts::{
        ClubInput, ManagerProfileInput, MechanicProfileInput, OwnerProfileInput, RegisterInput,
    },
};
use axum::{
    extract::{Json, State},
    http::header,
    http::HeaderMap,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 5))]
    pub phone: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(length(min = 1))]
    pub role: String,
    #[validate(length(min = 1))]
    pub account_type: String,
    pub mechanic_profile: Option<MechanicProfileRequest>,
    pub owner_profile: Option<OwnerProfileRequest>,
    pub manager_profile: Option<ManagerProfileRequest>,
    pub club: Option<ClubRequest>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct MechanicProfileRequest {
    #[validate(length(min = 1))]
    pub full_name: String,
    pub total_experience_years: Option<i32>,
    pub bowling_experience_years: Option<i32>,
    pub skills: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct OwnerProfileRequest {
    pub inn: Option<String>,
    pub legal_name: Option<String>,
    pub contact_person: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct ManagerProfileRequest {
    #[validate(length(min = 1))]
    pub full_name: String,
    pub club_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct ClubRequest {
    #[validate(length(min = 1))]
    pub name: String,
    pub address: Option<String>,
    #[validate(range(min = 0))]
    pub lanes_count: i32,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 5))]
    pub phone: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1))]
    pub old_password: String,
    #[validate(length(min = 8))]
    pub new_password: String,
}

/// Register a new user account with its role profile
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered"),
        (status = 400, description = "Invalid registration data", body = crate::errors::ErrorResponse),
        (status = 409, description = "Phone already registered", body = crate::errors::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let input = RegisterInput {
        phone: payload.phone,
        email: payload.email,
        password: payload.password,
        role: payload.role,
        account_type: payload.account_type,
        mechanic: payload.mechanic_profile.map(|m| MechanicProfileInput {
            full_name: m.full_name,
            total_experience_years: m.total_experience_years,
            bowling_experience_years: m.bowling_experience_years,
            skills: m.skills,
        }),
        owner: payload.owner_profile.map(|o| OwnerProfileInput {
            inn: o.inn,
            legal_name: o.legal_name,
            contact_person: o.contact_person,
        }),
        manager: payload.manager_profile.map(|m| ManagerProfileInput {
            full_name: m.full_name,
            club_id: m.club_id,
        }),
        club: payload.club.map(|c| ClubInput {
            name: c.name,
            address: c.address,
            lanes_count: c.lanes_count,
        }),
    };

    let account = state
        .services
        .accounts
        .register(input)
        .await
        .map_err(map_service_error)?;

    info!(user_id = account.user_id, "user registered via API");
    Ok(created_response(serde_json::json!({
        "user_id": account.user_id,
        "phone": account.phone,
        "message": "User registered successfully"
    })))
}

/// Log in with phone and password
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token pair issued"),
        (status = 401, description = "Invalid credentials", body = crate::errors::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let (account, tokens) = state
        .services
        .accounts
        .login(&payload.phone, &payload.password)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(serde_json::json!({
        "user_id": account.user_id,
        "role": account.role,
        "access_token": tokens.access_token,
        "refresh_token": tokens.refresh_token,
        "token_type": tokens.token_type,
        "expires_in": tokens.expires_in,
    })))
}

/// Exchange a refresh token for a new token pair
#[utoipa::path(
    post,
    path = "/auth/refresh",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Token pair rotated"),
        (status = 401, description = "Invalid refresh token", body = crate::errors::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;
    let tokens = state
        .services
        .auth
        .refresh_token(&payload.refresh_token)
        .await
        .map_err(|e| ApiError::Unauthorized(e.to_string()))?;
    Ok(success_response(tokens))
}

/// Revoke the current access token
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logged out"),
        (status = 401, description = "Not authenticated", body = crate::errors::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    headers: HeaderMap,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or_else(|| ApiError::Unauthorized("No bearer token provided".to_string()))?;

    state
        .services
        .auth
        .revoke_token(token)
        .await
        .map_err(|e| ApiError::Unauthorized(e.to_string()))?;
    state
        .services
        .auth
        .revoke_all_refresh_tokens(user.user_id)
        .await
        .map_err(|e| ApiError::Unauthorized(e.to_string()))?;
    Ok(success_response(serde_json::json!({
        "message": "Successfully logged out"
    })))
}

/// Current user info with profile summary
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current user info"),
        (status = 401, description = "Not authenticated", body = crate::errors::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let info = state
        .services
        .accounts
        .user_info(user.user_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(info))
}

/// Change the current user's password
#[utoipa::path(
    post,
    path = "/auth/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 401, description = "Old password does not match", body = crate::errors::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn change_password(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;
    state
        .services
        .accounts
        .change_password(user.user_id, &payload.old_password, &payload.new_password)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(serde_json::json!({
        "message": "Password changed successfully"
    })))
}

/// Routes that require a valid token.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route("/change-password", post(change_password))
}

/// Routes open to anonymous callers.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
}
