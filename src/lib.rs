//! LaneOps API Library
//!
//! Backend for bowling-club operations: maintenance requests, parts
//! inventory, purchase orders, work logs and club staff management.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod services;

use axum::{extract::State, response::Json, routing::get, Router};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::auth::consts as perm;
use crate::auth::AuthRouterExt;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

/// Full v1 API with authentication and permission gating.
pub fn api_v1_routes() -> Router<AppState> {
    let auth = handlers::auth::public_routes()
        .merge(handlers::auth::protected_routes().with_auth());

    let clubs = handlers::clubs::club_read_routes()
        .with_permission(perm::CLUBS_READ)
        .merge(handlers::clubs::club_manage_routes().with_permission(perm::CLUBS_MANAGE));

    let catalog = handlers::catalog::catalog_read_routes()
        .with_permission(perm::CATALOG_READ)
        .merge(handlers::catalog::catalog_manage_routes().with_permission(perm::CATALOG_MANAGE));

    let inventory = handlers::inventory::inventory_read_routes()
        .with_permission(perm::INVENTORY_READ)
        .merge(
            handlers::inventory::inventory_mutate_routes()
                .with_permission(perm::INVENTORY_ADJUST),
        );

    let requests = handlers::maintenance_requests::request_read_routes()
        .with_permission(perm::REQUESTS_READ)
        .merge(
            handlers::maintenance_requests::request_create_routes()
                .with_permission(perm::REQUESTS_CREATE),
        )
        .merge(
            handlers::maintenance_requests::request_decide_routes()
                .with_permission(perm::REQUESTS_DECIDE),
        );

    let purchase_orders = handlers::purchase_orders::order_read_routes()
        .with_permission(perm::ORDERS_READ)
        .merge(
            handlers::purchase_orders::order_manage_routes().with_permission(perm::ORDERS_MANAGE),
        );

    let work_logs = handlers::work_logs::work_log_read_routes()
        .with_permission(perm::WORKLOGS_READ)
        .merge(
            handlers::work_logs::work_log_manage_routes().with_permission(perm::WORKLOGS_MANAGE),
        );

    let admin_users =
        handlers::users::admin_user_routes().with_permission(perm::ADMIN_USERS);

    Router::new()
        .route("/status", get(api_status))
        .route("/health", get(health_check))
        // Anonymous public club directory.
        .route(
            "/public/clubs",
            get(handlers::clubs::public_clubs),
        )
        .nest("/auth", auth)
        .nest("/clubs", clubs)
        .nest("/catalog", catalog)
        .nest("/inventory", inventory)
        .nest("/maintenance-requests", requests)
        .nest("/purchase-orders", purchase_orders)
        .nest("/work-logs", work_logs)
        .nest(
            "/notifications",
            handlers::notifications::notification_routes().with_auth(),
        )
        .nest("/search", handlers::search::search_routes().with_auth())
        .nest("/admin/users", admin_users)
}

async fn api_status() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");
    Json(json!({
        "status": "ok",
        "service": "laneops-api",
        "version": version,
        "environment": std::env::var("RUN_ENV").unwrap_or_else(|_| "development".to_string()),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let db_status = match state.db.ping().await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };
    Json(json!({
        "status": db_status,
        "checks": {
            "database": db_status,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
