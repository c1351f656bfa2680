use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    routing::get,
    Router,
};
use http_body_util::BodyExt;
use sea_orm::ConnectOptions;
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;

use laneops_api::{
    auth::{AuthConfig, AuthService},
    config::AppConfig,
    db,
    entities::enums::{AccountType, Role},
    events::{self, EventSender},
    handlers::AppServices,
    services::accounts::{MechanicProfileInput, OwnerProfileInput, RegisterInput},
    AppState,
};

/// Test harness: the full router backed by an in-memory SQLite database.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    pub async fn new() -> Self {
        let cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "test_secret_key_for_testing_purposes_only_32chars".to_string(),
            "127.0.0.1".to_string(),
            18_080,
        );

        // A single connection keeps the in-memory database alive and shared.
        let mut opt = ConnectOptions::new(cfg.database_url.clone());
        opt.max_connections(1)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(5))
            .sqlx_logging(false);
        let pool = sea_orm::Database::connect(opt)
            .await
            .expect("failed to open test database");
        db::run_migrations(&pool).await.expect("migrations failed");
        let db_arc = Arc::new(pool);

        let (event_tx, event_rx) = mpsc::channel(64);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let auth_service = Arc::new(AuthService::new(
            AuthConfig::new(
                cfg.jwt_secret.clone(),
                Duration::from_secs(cfg.jwt_expiration),
                Duration::from_secs(cfg.refresh_token_expiration),
            ),
            db_arc.clone(),
        ));
        let services = AppServices::new(db_arc.clone(), event_sender.clone(), auth_service.clone());

        let state = AppState {
            db: db_arc,
            config: cfg,
            event_sender,
            services,
        };

        let router = Router::new()
            .route("/", get(|| async { "laneops-api up" }))
            .nest("/api/v1", laneops_api::api_v1_routes())
            .layer(axum::middleware::from_fn_with_state(
                auth_service,
                |axum::extract::State(auth): axum::extract::State<Arc<AuthService>>,
                 mut req: axum::http::Request<axum::body::Body>,
                 next: axum::middleware::Next| async move {
                    req.extensions_mut().insert(auth);
                    next.run(req).await
                },
            ))
            .with_state(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
        }
    }

    /// Registers a mechanic with an INDIVIDUAL account; returns the user id.
    pub async fn register_mechanic(&self, phone: &str, name: &str) -> i64 {
        let account = self
            .state
            .services
            .accounts
            .register(RegisterInput {
                phone: phone.to_string(),
                email: None,
                password: "mechanic-pass".to_string(),
                role: Role::Mechanic.to_string(),
                account_type: AccountType::Individual.to_string(),
                mechanic: Some(MechanicProfileInput {
                    full_name: name.to_string(),
                    total_experience_years: Some(5),
                    bowling_experience_years: Some(3),
                    skills: None,
                }),
                owner: None,
                manager: None,
                club: None,
            })
            .await
            .expect("mechanic registration failed");
        account.user_id
    }

    /// Registers a club owner together with their club; returns the user id.
    pub async fn register_owner(&self, phone: &str) -> i64 {
        let account = self
            .state
            .services
            .accounts
            .register(RegisterInput {
                phone: phone.to_string(),
                email: None,
                password: "owner-pass".to_string(),
                role: Role::ClubOwner.to_string(),
                account_type: AccountType::ClubOwner.to_string(),
                mechanic: None,
                owner: Some(OwnerProfileInput {
                    inn: Some("7701234567".to_string()),
                    legal_name: Some("Strike LLC".to_string()),
                    contact_person: Some("Owner".to_string()),
                }),
                manager: None,
                club: None,
            })
            .await
            .expect("owner registration failed");
        account.user_id
    }

    /// Issues an access token for an already-registered user.
    pub async fn token_for(&self, phone: &str, password: &str) -> String {
        let (_, pair) = self
            .state
            .services
            .accounts
            .login(phone, password)
            .await
            .expect("login failed");
        pair.access_token
    }

    /// Sends a JSON request through the router and returns (status, body).
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("failed to read body")
            .to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }
}
