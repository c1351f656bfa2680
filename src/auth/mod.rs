//! Authentication and authorization.
//!
//! JWT access/refresh token pairs (HS256) with argon2 password hashing.
//! Refresh tokens are persisted by jti; revoked access tokens go to an
//! in-memory blacklist. Route gating is expressed through [`AuthRouterExt`].

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::enums::Role;
use crate::entities::{refresh_token, user};

mod permissions;

pub use permissions::{consts, permissions_for_role};

/// Claim structure for JWT tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id).
    pub sub: String,
    /// Login phone.
    pub phone: Option<String>,
    pub role: Option<String>,
    pub permissions: Vec<String>,
    /// Unique identifier of this token.
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
    pub nbf: i64,
    pub iss: String,
    pub aud: String,
}

/// Authenticated principal extracted from a validated token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: i64,
    pub phone: Option<String>,
    pub role: Option<Role>,
    pub permissions: Vec<String>,
    pub token_id: String,
}

impl AuthUser {
    pub fn has_role(&self, role: Role) -> bool {
        self.role == Some(role)
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}

/// Type alias used by handlers as an extractor.
pub type AuthenticatedUser = AuthUser;

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AuthError::MissingAuth)
    }
}

/// Authentication configuration.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub access_token_expiration: Duration,
    pub refresh_token_expiration: Duration,
}

impl AuthConfig {
    pub fn new(
        jwt_secret: String,
        access_token_expiration: Duration,
        refresh_token_expiration: Duration,
    ) -> Self {
        Self {
            jwt_secret,
            jwt_issuer: "laneops-auth".to_string(),
            jwt_audience: "laneops-api".to_string(),
            access_token_expiration,
            refresh_token_expiration,
        }
    }
}

/// Token pair response.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub refresh_expires_in: i64,
}

/// Token blacklist entry.
#[derive(Clone, Debug)]
struct BlacklistedToken {
    jti: String,
    expiry: DateTime<Utc>,
}

/// Handles password hashing, token issuance and validation.
#[derive(Debug, Clone)]
pub struct AuthService {
    pub config: AuthConfig,
    pub db: Arc<DbPool>,
    blacklisted_tokens: Arc<RwLock<Vec<BlacklistedToken>>>,
}

impl AuthService {
    pub fn new(config: AuthConfig, db: Arc<DbPool>) -> Self {
        Self {
            config,
            db,
            blacklisted_tokens: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::InternalError(format!("password hashing failed: {}", e)))
    }

    pub fn verify_password(&self, password: &str, password_hash: &str) -> Result<(), AuthError> {
        let parsed = PasswordHash::new(password_hash)
            .map_err(|_| AuthError::InternalError("stored password hash is invalid".to_string()))?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| AuthError::InvalidCredentials)
    }

    /// Looks the user up by phone and checks the password.
    pub async fn authenticate(&self, phone: &str, password: &str) -> Result<user::Model, AuthError> {
        let account = user::Entity::find()
            .filter(user::Column::Phone.eq(phone))
            .one(&*self.db)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?
            .ok_or(AuthError::InvalidCredentials)?;

        if !account.is_active {
            return Err(AuthError::InvalidCredentials);
        }
        self.verify_password(password, &account.password_hash)?;
        Ok(account)
    }

    /// Generates an access/refresh token pair for a user.
    pub async fn generate_token(&self, account: &user::Model) -> Result<TokenPair, AuthError> {
        let now = Utc::now();
        let access_exp = now
            + ChronoDuration::from_std(self.config.access_token_expiration)
                .map_err(|_| AuthError::InternalError("Invalid token duration".to_string()))?;
        let refresh_exp = now
            + ChronoDuration::from_std(self.config.refresh_token_expiration)
                .map_err(|_| AuthError::InternalError("Invalid token duration".to_string()))?;

        let access_jti = Uuid::new_v4().to_string();
        let refresh_jti = Uuid::new_v4().to_string();

        let role = Role::from_str(&account.role).ok();
        let permissions = role.map(permissions_for_role).unwrap_or_default();

        let access_claims = Claims {
            sub: account.user_id.to_string(),
            phone: Some(account.phone.clone()),
            role: role.map(|r| r.to_string()),
            permissions,
            jti: access_jti,
            iat: now.timestamp(),
            exp: access_exp.timestamp(),
            nbf: now.timestamp(),
            iss: self.config.jwt_issuer.clone(),
            aud: self.config.jwt_audience.clone(),
        };

        // Refresh token carries no role data on purpose.
        let refresh_claims = Claims {
            sub: account.user_id.to_string(),
            phone: None,
            role: None,
            permissions: vec![],
            jti: refresh_jti.clone(),
            iat: now.timestamp(),
            exp: refresh_exp.timestamp(),
            nbf: now.timestamp(),
            iss: self.config.jwt_issuer.clone(),
            aud: self.config.jwt_audience.clone(),
        };

        let key = EncodingKey::from_secret(self.config.jwt_secret.as_bytes());
        let access_token = encode(&Header::new(Algorithm::HS256), &access_claims, &key)
            .map_err(|e| AuthError::TokenCreation(e.to_string()))?;
        let refresh_token = encode(&Header::new(Algorithm::HS256), &refresh_claims, &key)
            .map_err(|e| AuthError::TokenCreation(e.to_string()))?;

        self.store_refresh_token(account.user_id, &refresh_jti, refresh_exp)
            .await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.config.access_token_expiration.as_secs() as i64,
            refresh_expires_in: self.config.refresh_token_expiration.as_secs() as i64,
        })
    }

    /// Validates a JWT token and extracts the claims.
    pub async fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.jwt_audience]);
        validation.set_issuer(&[&self.config.jwt_issuer]);

        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })?
        .claims;

        if self.is_token_blacklisted(&claims.jti).await {
            return Err(AuthError::RevokedToken);
        }
        Ok(claims)
    }

    /// Exchanges a refresh token for a fresh pair; the old jti is revoked.
    pub async fn refresh_token(&self, token: &str) -> Result<TokenPair, AuthError> {
        let claims = self.validate_token(token).await?;
        let user_id: i64 = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;

        if !self.verify_refresh_token(user_id, &claims.jti).await? {
            return Err(AuthError::InvalidToken);
        }

        let account = user::Entity::find_by_id(user_id)
            .one(&*self.db)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?
            .ok_or(AuthError::UserNotFound)?;

        let pair = self.generate_token(&account).await?;
        self.revoke_refresh_token(user_id, &claims.jti).await?;
        Ok(pair)
    }

    /// Revokes an access token by blacklisting its jti.
    pub async fn revoke_token(&self, token: &str) -> Result<(), AuthError> {
        let claims = self.validate_token(token).await?;
        let expiry = DateTime::<Utc>::from_timestamp(claims.exp, 0).unwrap_or_else(Utc::now);

        let mut blacklist = self.blacklisted_tokens.write().await;
        blacklist.push(BlacklistedToken {
            jti: claims.jti,
            expiry,
        });
        let now = Utc::now();
        blacklist.retain(|t| t.expiry > now);
        Ok(())
    }

    async fn is_token_blacklisted(&self, jti: &str) -> bool {
        let blacklist = self.blacklisted_tokens.read().await;
        blacklist.iter().any(|t| t.jti == jti)
    }

    async fn store_refresh_token(
        &self,
        user_id: i64,
        jti: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        let record = refresh_token::ActiveModel {
            user_id: Set(user_id),
            jti: Set(jti.to_string()),
            expires_at: Set(expires_at),
            revoked: Set(false),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        record
            .insert(&*self.db)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;
        debug!(user_id, jti, "stored refresh token");
        Ok(())
    }

    async fn verify_refresh_token(&self, user_id: i64, jti: &str) -> Result<bool, AuthError> {
        let record = refresh_token::Entity::find()
            .filter(refresh_token::Column::UserId.eq(user_id))
            .filter(refresh_token::Column::Jti.eq(jti))
            .filter(refresh_token::Column::Revoked.eq(false))
            .one(&*self.db)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;
        Ok(record.map(|r| r.expires_at > Utc::now()).unwrap_or(false))
    }

    /// Revokes every outstanding refresh token of a user (logout).
    pub async fn revoke_all_refresh_tokens(&self, user_id: i64) -> Result<(), AuthError> {
        refresh_token::Entity::update_many()
            .col_expr(
                refresh_token::Column::Revoked,
                sea_orm::sea_query::Expr::value(true),
            )
            .filter(refresh_token::Column::UserId.eq(user_id))
            .filter(refresh_token::Column::Revoked.eq(false))
            .exec(&*self.db)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    pub async fn revoke_refresh_token(&self, user_id: i64, jti: &str) -> Result<(), AuthError> {
        let record = refresh_token::Entity::find()
            .filter(refresh_token::Column::UserId.eq(user_id))
            .filter(refresh_token::Column::Jti.eq(jti))
            .one(&*self.db)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;
        if let Some(record) = record {
            let mut active: refresh_token::ActiveModel = record.into();
            active.revoked = Set(true);
            active
                .update(&*self.db)
                .await
                .map_err(|e| AuthError::DatabaseError(e.to_string()))?;
        }
        Ok(())
    }
}

/// Authentication error types.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authentication")]
    MissingAuth,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Token has been revoked")]
    RevokedToken,

    #[error("Token creation failed: {0}")]
    TokenCreation(String),

    #[error("User not found")]
    UserNotFound,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            Self::MissingAuth => (StatusCode::UNAUTHORIZED, "AUTH_MISSING"),
            Self::InvalidCredentials => (StatusCode::UNAUTHORIZED, "AUTH_INVALID_CREDENTIALS"),
            Self::InvalidToken => (StatusCode::UNAUTHORIZED, "AUTH_INVALID_TOKEN"),
            Self::TokenExpired => (StatusCode::UNAUTHORIZED, "AUTH_TOKEN_EXPIRED"),
            Self::RevokedToken => (StatusCode::UNAUTHORIZED, "AUTH_TOKEN_REVOKED"),
            Self::UserNotFound => (StatusCode::UNAUTHORIZED, "AUTH_USER_NOT_FOUND"),
            Self::InsufficientPermissions => (StatusCode::FORBIDDEN, "AUTH_FORBIDDEN"),
            Self::TokenCreation(_) | Self::DatabaseError(_) | Self::InternalError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "AUTH_INTERNAL")
            }
        };
        let body = serde_json::json!({
            "error": code,
            "message": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

/// Extracts and validates the bearer token, inserting [`AuthUser`] into
/// request extensions.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let headers = request.headers().clone();

    let auth_service = match request.extensions().get::<Arc<AuthService>>() {
        Some(service) => service.clone(),
        None => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Authentication service not available",
            )
                .into_response();
        }
    };

    match extract_auth_from_headers(&headers, &auth_service).await {
        Ok(auth_user) => {
            request.extensions_mut().insert(auth_user);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

async fn extract_auth_from_headers(
    headers: &HeaderMap,
    auth_service: &AuthService,
) -> Result<AuthUser, AuthError> {
    let Some(auth_header) = headers.get(header::AUTHORIZATION) else {
        return Err(AuthError::MissingAuth);
    };
    let auth_value = auth_header.to_str().map_err(|_| AuthError::InvalidToken)?;
    if !auth_value.starts_with("Bearer ") {
        return Err(AuthError::MissingAuth);
    }
    let token = auth_value.trim_start_matches("Bearer ").trim();
    let claims = auth_service.validate_token(token).await?;

    Ok(AuthUser {
        user_id: claims.sub.parse().map_err(|_| AuthError::InvalidToken)?,
        phone: claims.phone,
        role: claims.role.as_deref().and_then(|r| Role::from_str(r).ok()),
        permissions: claims.permissions,
        token_id: claims.jti,
    })
}

/// Checks the required permission; admins pass every check.
pub async fn permission_middleware(
    State(required_permission): State<String>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_user = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or(AuthError::MissingAuth)?;

    if auth_user.is_admin() || auth_user.has_permission(&required_permission) {
        return Ok(next.run(request).await);
    }
    Err(AuthError::InsufficientPermissions)
}

/// Checks the required role.
pub async fn role_middleware(
    State(required_role): State<String>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_user = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or(AuthError::MissingAuth)?;

    let required = Role::from_str(&required_role).map_err(|_| AuthError::InsufficientPermissions)?;
    if auth_user.has_role(required) {
        return Ok(next.run(request).await);
    }
    Err(AuthError::InsufficientPermissions)
}

/// Extension methods for `Router` to add auth middleware.
pub trait AuthRouterExt {
    fn with_auth(self) -> Self;
    fn with_permission(self, permission: &str) -> Self;
    fn with_role(self, role: &str) -> Self;
}

impl<S> AuthRouterExt for axum::Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_auth(self) -> Self {
        self.layer(axum::middleware::from_fn(auth_middleware))
    }

    fn with_permission(self, permission: &str) -> Self {
        self.layer(axum::middleware::from_fn_with_state(
            permission.to_string(),
            permission_middleware,
        ))
        .with_auth()
    }

    fn with_role(self, role: &str) -> Self {
        self.layer(axum::middleware::from_fn_with_state(
            role.to_string(),
            role_middleware,
        ))
        .with_auth()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_user(role: Role, perms: &[&str]) -> AuthUser {
        AuthUser {
            user_id: 1,
            phone: Some("+79990000001".into()),
            role: Some(role),
            permissions: perms.iter().map(|p| p.to_string()).collect(),
            token_id: "jti".into(),
        }
    }

    #[test]
    fn permission_checks() {
        let mechanic = auth_user(Role::Mechanic, &[consts::REQUESTS_CREATE]);
        assert!(mechanic.has_permission(consts::REQUESTS_CREATE));
        assert!(!mechanic.has_permission(consts::REQUESTS_DECIDE));
        assert!(!mechanic.is_admin());

        let admin = auth_user(Role::Admin, &[]);
        assert!(admin.is_admin());
    }

    #[test]
    fn password_hash_round_trip() {
        let service = AuthService::new(
            AuthConfig::new(
                "unit-test-secret-material-0123456789abcdef".into(),
                Duration::from_secs(60),
                Duration::from_secs(120),
            ),
            Arc::new(DbPool::Disconnected),
        );
        let hash = service.hash_password("swordfish").unwrap();
        assert!(service.verify_password("swordfish", &hash).is_ok());
        assert!(matches!(
            service.verify_password("not-it", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
