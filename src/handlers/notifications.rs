use super::common::success_response;
use crate::{auth::AuthenticatedUser, errors::ApiError, handlers::AppState};
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

#[derive(Debug, Deserialize, IntoParams)]
pub struct NotificationListParams {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

/// The current user's notifications, newest first
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    params(NotificationListParams),
    responses((status = 200, description = "Notifications listed")),
    tag = "notifications"
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(params): Query<NotificationListParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let notifications = state
        .services
        .notifications
        .list_for_user(user.user_id, params.limit)
        .await;
    Ok(success_response(notifications))
}

/// Mark one of the current user's notifications as read
#[utoipa::path(
    post,
    path = "/api/v1/notifications/{id}/read",
    params(("id" = Uuid, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Notification marked read"),
        (status = 404, description = "Notification not found", body = crate::errors::ErrorResponse)
    ),
    tag = "notifications"
)]
pub async fn mark_read(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(notification_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let updated = state
        .services
        .notifications
        .mark_read(user.user_id, notification_id)
        .await;
    if !updated {
        return Err(ApiError::NotFound(format!(
            "Notification {} not found",
            notification_id
        )));
    }
    Ok(success_response(serde_json::json!({
        "message": "Notification marked as read"
    })))
}

pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/{id}/read", post(mark_read))
}
