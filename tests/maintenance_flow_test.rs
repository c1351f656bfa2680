mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use laneops_api::services::catalog::CreateCatalogEntry;
use laneops_api::services::clubs::CreateClubInput;
use laneops_api::services::inventory::Placement;
use serde_json::json;

struct Workshop {
    app: TestApp,
    club_id: i64,
    mechanic_profile_id: i64,
    catalog_id: i64,
    owner_token: String,
    mechanic_token: String,
}

/// One club with an owner, a staffed mechanic, a catalog entry and stock.
async fn setup() -> Workshop {
    let app = TestApp::new().await;

    let owner_user = app.register_owner("+79990000001").await;
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
            name: "Galaxy Bowl".to_string(),
            address: Some("Moscow".to_string()),
            lanes_count: 12,
            contact_phone: None,
            contact_email: None,
        })
        .await
        .unwrap();

    let mechanic_user = app.register_mechanic("+79990000002", "Petr Keglin").await;
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

    let catalog = app
        .state
        .services
        .catalog
        .create_entry(CreateCatalogEntry {
            catalog_number: "BRU-153".to_string(),
            official_name: Some("Pin distributor belt".to_string()),
            common_name: None,
            description: None,
            unit: Some("pcs".to_string()),
            is_unique: false,
        })
        .await
        .unwrap();
    app.state
        .services
        .inventory
        .store_stock(
            club.club_id,
            catalog.catalog_id,
            10,
            Placement {
                shelf_code: Some("A1".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let owner_token = app.token_for("+79990000001", "owner-pass").await;
    let mechanic_token = app.token_for("+79990000002", "mechanic-pass").await;

    Workshop {
        app,
        club_id: club.club_id,
        mechanic_profile_id: mechanic_info.mechanic_profile_id.unwrap(),
        catalog_id: catalog.catalog_id,
        owner_token,
        mechanic_token,
    }
}

fn create_request_body(ws: &Workshop, quantity: i32) -> serde_json::Value {
    json!({
        "mechanic_id": ws.mechanic_profile_id,
        "club_id": ws.club_id,
        "lane_number": 4,
        "reason": "Distributor belt is slipping",
        "requested_parts": [
            {
                "part_name": "Pin distributor belt",
                "catalog_number": "BRU-153",
                "quantity": quantity
            }
        ]
    })
}

#[tokio::test]
async fn created_request_probes_stock_availability() {
    let ws = setup().await;

    let (status, body) = ws
        .app
        .request(
            Method::POST,
            "/api/v1/maintenance-requests",
            Some(&ws.mechanic_token),
            Some(create_request_body(&ws, 2)),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    assert_eq!(body["status"], "UNDER_REVIEW");

    let part = &body["parts"][0];
    assert_eq!(part["status"], "APPROVED_FOR_ISSUE");
    assert_eq!(part["available"], true);
    assert_eq!(part["warehouse_id"], ws.club_id);
    assert_eq!(part["catalog_id"], ws.catalog_id);
}

#[tokio::test]
async fn stock_issue_decisions_drive_request_status_and_inventory() {
    let ws = setup().await;
    let (_, body) = ws
        .app
        .request(
            Method::POST,
            "/api/v1/maintenance-requests",
            Some(&ws.mechanic_token),
            Some(create_request_body(&ws, 4)),
        )
        .await;
    let request_id = body["request_id"].as_i64().unwrap();
    let part_id = body["parts"][0]["part_id"].as_i64().unwrap();

    // Partial approval: 3 of the requested 4.
    let (status, body) = ws
        .app
        .request(
            Method::POST,
            &format!("/api/v1/maintenance-requests/{request_id}/issue"),
            Some(&ws.owner_token),
            Some(json!({
                "manager_notes": "One unit kept as reserve",
                "part_decisions": [
                    { "part_id": part_id, "approved_quantity": 3 }
                ]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "issue failed: {body}");
    assert_eq!(body["status"], "PARTIALLY_APPROVED");
    assert_eq!(body["parts"][0]["status"], "PARTIALLY_ACCEPTED");
    assert_eq!(body["parts"][0]["accepted_quantity"], 3);

    // The approved quantity was written off the club warehouse.
    let stock = ws
        .app
        .state
        .services
        .inventory
        .find_stock(ws.club_id, ws.catalog_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stock.quantity, 7);
}

#[tokio::test]
async fn issue_rejects_quantities_over_the_requested_amount() {
    let ws = setup().await;
    let (_, body) = ws
        .app
        .request(
            Method::POST,
            "/api/v1/maintenance-requests",
            Some(&ws.mechanic_token),
            Some(create_request_body(&ws, 2)),
        )
        .await;
    let request_id = body["request_id"].as_i64().unwrap();
    let part_id = body["parts"][0]["part_id"].as_i64().unwrap();

    let (status, _) = ws
        .app
        .request(
            Method::POST,
            &format!("/api/v1/maintenance-requests/{request_id}/issue"),
            Some(&ws.owner_token),
            Some(json!({
                "part_decisions": [
                    { "part_id": part_id, "approved_quantity": 5 }
                ]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn rejection_closes_the_request_and_marks_parts() {
    let ws = setup().await;
    let (_, body) = ws
        .app
        .request(
            Method::POST,
            "/api/v1/maintenance-requests",
            Some(&ws.mechanic_token),
            Some(create_request_body(&ws, 1)),
        )
        .await;
    let request_id = body["request_id"].as_i64().unwrap();

    let (status, body) = ws
        .app
        .request(
            Method::POST,
            &format!("/api/v1/maintenance-requests/{request_id}/reject"),
            Some(&ws.owner_token),
            Some(json!({ "reason": "Belt was replaced last week" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "CLOSED");
    assert_eq!(body["parts"][0]["status"], "REJECTED");
    assert_eq!(body["parts"][0]["rejection_reason"], "Belt was replaced last week");

    // No parts can be added to a closed request.
    let (status, _) = ws
        .app
        .request(
            Method::POST,
            &format!("/api/v1/maintenance-requests/{request_id}/parts"),
            Some(&ws.mechanic_token),
            Some(json!({
                "parts": [
                    { "part_name": "Belt", "catalog_number": "BRU-153", "quantity": 1 }
                ]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn mechanics_cannot_take_manager_decisions() {
    let ws = setup().await;
    let (_, body) = ws
        .app
        .request(
            Method::POST,
            "/api/v1/maintenance-requests",
            Some(&ws.mechanic_token),
            Some(create_request_body(&ws, 1)),
        )
        .await;
    let request_id = body["request_id"].as_i64().unwrap();

    let (status, _) = ws
        .app
        .request(
            Method::POST,
            &format!("/api/v1/maintenance-requests/{request_id}/approve"),
            Some(&ws.mechanic_token),
            Some(json!({ "manager_notes": "self-approval" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn completion_requires_an_actionable_status() {
    let ws = setup().await;
    let (_, body) = ws
        .app
        .request(
            Method::POST,
            "/api/v1/maintenance-requests",
            Some(&ws.mechanic_token),
            Some(create_request_body(&ws, 1)),
        )
        .await;
    let request_id = body["request_id"].as_i64().unwrap();

    // UNDER_REVIEW cannot complete.
    let (status, _) = ws
        .app
        .request(
            Method::POST,
            &format!("/api/v1/maintenance-requests/{request_id}/complete"),
            Some(&ws.owner_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Approve, then completion works.
    ws.app
        .request(
            Method::POST,
            &format!("/api/v1/maintenance-requests/{request_id}/approve"),
            Some(&ws.owner_token),
            Some(json!({ "manager_notes": "go ahead" })),
        )
        .await;
    let (status, body) = ws
        .app
        .request(
            Method::POST,
            &format!("/api/v1/maintenance-requests/{request_id}/complete"),
            Some(&ws.owner_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "DONE");

    // Completing twice is an error.
    let (status, _) = ws
        .app
        .request(
            Method::POST,
            &format!("/api/v1/maintenance-requests/{request_id}/complete"),
            Some(&ws.owner_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn club_team_is_notified_about_new_requests() {
    let ws = setup().await;
    ws.app
        .request(
            Method::POST,
            "/api/v1/maintenance-requests",
            Some(&ws.mechanic_token),
            Some(create_request_body(&ws, 1)),
        )
        .await;

    let (status, body) = ws
        .app
        .request(
            Method::GET,
            "/api/v1/notifications",
            Some(&ws.owner_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let notifications = body.as_array().unwrap();
    assert!(!notifications.is_empty());
    assert_eq!(notifications[0]["kind"], "request_created");
}

#[tokio::test]
async fn help_flow_flags_and_clears_parts() {
    let ws = setup().await;
    let (_, body) = ws
        .app
        .request(
            Method::POST,
            "/api/v1/maintenance-requests",
            Some(&ws.mechanic_token),
            Some(create_request_body(&ws, 1)),
        )
        .await;
    let request_id = body["request_id"].as_i64().unwrap();
    let part_id = body["parts"][0]["part_id"].as_i64().unwrap();

    let (status, body) = ws
        .app
        .request(
            Method::POST,
            &format!("/api/v1/maintenance-requests/{request_id}/help"),
            Some(&ws.mechanic_token),
            Some(json!({ "part_ids": [part_id], "reason": "Unsure about the belt model" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["parts"][0]["help_requested"], true);

    let (status, body) = ws
        .app
        .request(
            Method::POST,
            &format!("/api/v1/maintenance-requests/{request_id}/help/resolve"),
            Some(&ws.owner_token),
            Some(json!({
                "part_ids": [part_id],
                "decision": "APPROVED",
                "comment": "Model confirmed"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["parts"][0]["help_requested"], false);
}

#[tokio::test]
async fn global_search_finds_requests_and_stock() {
    let ws = setup().await;
    ws.app
        .request(
            Method::POST,
            "/api/v1/maintenance-requests",
            Some(&ws.mechanic_token),
            Some(create_request_body(&ws, 1)),
        )
        .await;

    let (status, body) = ws
        .app
        .request(
            Method::GET,
            "/api/v1/search?q=belt",
            Some(&ws.owner_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "search failed: {body}");
    assert!(!body["requests"].as_array().unwrap().is_empty());
    assert!(!body["parts"].as_array().unwrap().is_empty());
}
