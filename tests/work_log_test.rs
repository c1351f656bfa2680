mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use laneops_api::services::clubs::CreateClubInput;
use serde_json::json;

struct Logs {
    app: TestApp,
    club_id: i64,
    mechanic_profile_id: i64,
    owner_token: String,
    mechanic_token: String,
}

async fn setup() -> Logs {
    let app = TestApp::new().await;

    let owner_user = app.register_owner("+79992000001").await;
    let owner_info = app
        .state
        .services
        .accounts
        .user_info(owner_user)
        .await
        .unwrap();
    let club = app
        .state
        .services
        .clubs
        .create_club(CreateClubInput {
            owner_id: owner_info.owner_profile_id,
            name: "Split Alley".to_string(),
            address: None,
            lanes_count: 6,
            contact_phone: None,
            contact_email: None,
        })
        .await
        .unwrap();

    let mechanic_user = app.register_mechanic("+79992000002", "Vera Gutterova").await;
    let mechanic_info = app
        .state
        .services
        .accounts
        .user_info(mechanic_user)
        .await
        .unwrap();
    app.state
        .services
        .clubs
        .assign_staff(club.club_id, mechanic_user, "MECHANIC", Some(owner_user))
        .await
        .unwrap();

    let owner_token = app.token_for("+79992000001", "owner-pass").await;
    let mechanic_token = app.token_for("+79992000002", "mechanic-pass").await;

    Logs {
        app,
        club_id: club.club_id,
        mechanic_profile_id: mechanic_info.mechanic_profile_id.unwrap(),
        owner_token,
        mechanic_token,
    }
}

async fn create_log(l: &Logs, priority: i32) -> i64 {
    let (status, body) = l
        .app
        .request(
            Method::POST,
            "/api/v1/work-logs",
            Some(&l.owner_token),
            Some(json!({
                "club_id": l.club_id,
                "lane_number": 3,
                "work_type": "INSPECTION",
                "problem_description": "Lane 3 pinsetter jams intermittently",
                "priority": priority
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    body["log_id"].as_i64().unwrap()
}

#[tokio::test]
async fn status_transitions_stamp_dates_and_history() {
    let l = setup().await;
    let log_id = create_log(&l, 3).await;

    // Assign, start, complete.
    let (status, body) = l
        .app
        .request(
            Method::POST,
            &format!("/api/v1/work-logs/{log_id}/assign"),
            Some(&l.owner_token),
            Some(json!({ "mechanic_id": l.mechanic_profile_id })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ASSIGNED");
    assert_eq!(body["mechanic_id"], l.mechanic_profile_id);

    let (_, body) = l
        .app
        .request(
            Method::PUT,
            &format!("/api/v1/work-logs/{log_id}/status"),
            Some(&l.mechanic_token),
            Some(json!({ "status": "IN_PROGRESS" })),
        )
        .await;
    assert_eq!(body["status"], "IN_PROGRESS");
    assert!(body["started_date"].is_string());

    let (_, body) = l
        .app
        .request(
            Method::PUT,
            &format!("/api/v1/work-logs/{log_id}/status"),
            Some(&l.mechanic_token),
            Some(json!({ "status": "COMPLETED", "reason": "Sensor bracket replaced" })),
        )
        .await;
    assert_eq!(body["status"], "COMPLETED");
    assert!(body["completed_date"].is_string());

    // Creation, assignment and two explicit changes.
    let (status, body) = l
        .app
        .request(
            Method::GET,
            &format!("/api/v1/work-logs/{log_id}/history"),
            Some(&l.owner_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let history = body.as_array().unwrap();
    assert_eq!(history.len(), 4);
    assert_eq!(history[0]["new_status"], "CREATED");
    assert_eq!(history[3]["new_status"], "COMPLETED");
    assert_eq!(history[3]["reason"], "Sensor bracket replaced");
}

#[tokio::test]
async fn details_update_recomputes_total_cost() {
    let l = setup().await;
    let log_id = create_log(&l, 3).await;

    let (status, body) = l
        .app
        .request(
            Method::PUT,
            &format!("/api/v1/work-logs/{log_id}/details"),
            Some(&l.mechanic_token),
            Some(json!({
                "work_performed": "Replaced the jam sensor bracket",
                "actual_hours": 2.5,
                "labor_cost": 3000.0,
                "parts_cost": 1250.0,
                "quality_rating": 9
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "details failed: {body}");
    assert_eq!(body["total_cost"], 4250.0);
    assert_eq!(body["quality_rating"], 9);
}

#[tokio::test]
async fn unknown_status_is_rejected() {
    let l = setup().await;
    let log_id = create_log(&l, 3).await;

    let (status, _) = l
        .app
        .request(
            Method::PUT,
            &format!("/api/v1/work-logs/{log_id}/status"),
            Some(&l.owner_token),
            Some(json!({ "status": "PAUSED_FOR_LUNCH" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn active_and_high_priority_listings() {
    let l = setup().await;
    let urgent = create_log(&l, 1).await;
    let routine = create_log(&l, 4).await;

    // Close the routine one; only the urgent log stays active.
    l.app
        .request(
            Method::PUT,
            &format!("/api/v1/work-logs/{routine}/status"),
            Some(&l.owner_token),
            Some(json!({ "status": "CLOSED" })),
        )
        .await;

    let (_, body) = l
        .app
        .request(
            Method::GET,
            "/api/v1/work-logs/active",
            Some(&l.owner_token),
            None,
        )
        .await;
    let active = body.as_array().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["log_id"], urgent);

    let (_, body) = l
        .app
        .request(
            Method::GET,
            "/api/v1/work-logs/high-priority",
            Some(&l.owner_token),
            None,
        )
        .await;
    let high = body.as_array().unwrap();
    assert_eq!(high.len(), 1);
    assert_eq!(high[0]["log_id"], urgent);
}

#[tokio::test]
async fn keyword_search_scans_description_fields() {
    let l = setup().await;
    create_log(&l, 3).await;

    let (status, body) = l
        .app
        .request(
            Method::GET,
            "/api/v1/work-logs?keyword=pinsetter",
            Some(&l.owner_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 1);

    let (_, body) = l
        .app
        .request(
            Method::GET,
            "/api/v1/work-logs?keyword=nothing-matches-this",
            Some(&l.owner_token),
            None,
        )
        .await;
    assert_eq!(body["pagination"]["total"], 0);
}

#[tokio::test]
async fn delete_removes_the_log_and_its_history() {
    let l = setup().await;
    let log_id = create_log(&l, 3).await;

    let (status, _) = l
        .app
        .request(
            Method::DELETE,
            &format!("/api/v1/work-logs/{log_id}"),
            Some(&l.owner_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = l
        .app
        .request(
            Method::GET,
            &format!("/api/v1/work-logs/{log_id}"),
            Some(&l.owner_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
