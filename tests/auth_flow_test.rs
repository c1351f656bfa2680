mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn register_login_and_me_round_trip() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({
                "phone": "8 (999) 111-22-33",
                "password": "mechanic-pass",
                "role": "MECHANIC",
                "account_type": "INDIVIDUAL",
                "mechanic_profile": { "full_name": "Ivan Petrov" }
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    assert_eq!(body["phone"], "+79991112233");

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "phone": "+79991112233", "password": "mechanic-pass" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["access_token"].as_str().unwrap().to_string();

    let (status, body) = app
        .request(Method::GET, "/api/v1/auth/me", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "MECHANIC");
    assert_eq!(body["full_name"], "Ivan Petrov");
}

#[tokio::test]
async fn duplicate_phone_is_rejected() {
    let app = TestApp::new().await;
    app.register_mechanic("+79991112244", "First").await;

    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({
                "phone": "89991112244",
                "password": "another-pass",
                "role": "MECHANIC",
                "account_type": "INDIVIDUAL",
                "mechanic_profile": { "full_name": "Second" }
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn incoherent_role_account_type_is_rejected() {
    let app = TestApp::new().await;
    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({
                "phone": "+79991112255",
                "password": "some-password",
                "role": "MECHANIC",
                "account_type": "MAIN_ADMIN",
                "mechanic_profile": { "full_name": "Wannabe Admin" }
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "unexpected: {body}");
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = TestApp::new().await;
    app.register_mechanic("+79991112266", "Mechanic").await;

    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "phone": "+79991112266", "password": "not-the-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_requires_a_token() {
    let app = TestApp::new().await;
    let (status, _) = app.request(Method::GET, "/api/v1/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_rotates_the_token_pair() {
    let app = TestApp::new().await;
    app.register_mechanic("+79991112277", "Mechanic").await;

    let (_, body) = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "phone": "+79991112277", "password": "mechanic-pass" })),
        )
        .await;
    let refresh = body["refresh_token"].as_str().unwrap().to_string();

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/auth/refresh",
            None,
            Some(json!({ "refresh_token": refresh.clone() })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["access_token"].as_str().is_some());

    // The old refresh token is revoked after rotation.
    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/auth/refresh",
            None,
            Some(json!({ "refresh_token": refresh })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_revokes_both_tokens() {
    let app = TestApp::new().await;
    app.register_mechanic("+79991112299", "Mechanic").await;

    let (_, body) = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "phone": "+79991112299", "password": "mechanic-pass" })),
        )
        .await;
    let access = body["access_token"].as_str().unwrap().to_string();
    let refresh = body["refresh_token"].as_str().unwrap().to_string();

    let (status, _) = app
        .request(Method::POST, "/api/v1/auth/logout", Some(&access), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    // The blacklisted access token no longer works.
    let (status, _) = app
        .request(Method::GET, "/api/v1/auth/me", Some(&access), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // The refresh token was revoked too.
    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/auth/refresh",
            None,
            Some(json!({ "refresh_token": refresh })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn change_password_requires_matching_old_password() {
    let app = TestApp::new().await;
    app.register_mechanic("+79991112288", "Mechanic").await;
    let token = app.token_for("+79991112288", "mechanic-pass").await;

    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/auth/change-password",
            Some(&token),
            Some(json!({ "old_password": "wrong", "new_password": "a-new-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/auth/change-password",
            Some(&token),
            Some(json!({ "old_password": "mechanic-pass", "new_password": "a-new-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "phone": "+79991112288", "password": "a-new-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}
