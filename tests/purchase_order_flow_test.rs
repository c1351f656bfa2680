mod common;

use axum::http::{Method, StatusCode};
use chrono::Utc;
use common::TestApp;
use laneops_api::entities::supplier;
use laneops_api::services::catalog::CreateCatalogEntry;
use laneops_api::services::clubs::CreateClubInput;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde_json::json;

struct Procurement {
    app: TestApp,
    club_id: i64,
    mechanic_profile_id: i64,
    catalog_id: i64,
    supplier_id: i64,
    owner_token: String,
    mechanic_token: String,
}

async fn setup() -> Procurement {
    let app = TestApp::new().await;

    let owner_user = app.register_owner("+79991000001").await;
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
            name: "Cosmic Bowl".to_string(),
            address: None,
            lanes_count: 8,
            contact_phone: None,
            contact_email: None,
        })
        .await
        .unwrap();

    let mechanic_user = app.register_mechanic("+79991000002", "Oleg Pinov").await;
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
            catalog_number: "KGB-47".to_string(),
            official_name: Some("Kickback plate".to_string()),
            common_name: None,
            description: None,
            unit: Some("pcs".to_string()),
            is_unique: false,
        })
        .await
        .unwrap();

    let supplier_row = supplier::ActiveModel {
        inn: Set("7812345678".to_string()),
        legal_name: Set(Some("PinParts Ltd".to_string())),
        is_verified: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&*app.state.db)
    .await
    .unwrap();

    let owner_token = app.token_for("+79991000001", "owner-pass").await;
    let mechanic_token = app.token_for("+79991000002", "mechanic-pass").await;

    Procurement {
        app,
        club_id: club.club_id,
        mechanic_profile_id: mechanic_info.mechanic_profile_id.unwrap(),
        catalog_id: catalog.catalog_id,
        supplier_id: supplier_row.supplier_id,
        owner_token,
        mechanic_token,
    }
}

/// Creates a request with two part lines and orders both from the supplier.
/// Returns (request_id, order_id, part ids).
async fn ordered_request(p: &Procurement) -> (i64, i64, Vec<i64>) {
    let (status, body) = p
        .app
        .request(
            Method::POST,
            "/api/v1/maintenance-requests",
            Some(&p.mechanic_token),
            Some(json!({
                "mechanic_id": p.mechanic_profile_id,
                "club_id": p.club_id,
                "lane_number": 2,
                "reason": "Kickback plates cracked on both sides",
                "requested_parts": [
                    { "part_name": "Kickback plate left", "catalog_number": "KGB-47", "quantity": 2 },
                    { "part_name": "Kickback plate right", "catalog_number": "KGB-47", "quantity": 1 }
                ]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    let request_id = body["request_id"].as_i64().unwrap();
    let part_ids: Vec<i64> = body["parts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["part_id"].as_i64().unwrap())
        .collect();

    let (status, body) = p
        .app
        .request(
            Method::POST,
            &format!("/api/v1/maintenance-requests/{request_id}/order"),
            Some(&p.owner_token),
            Some(json!({
                "items": part_ids
                    .iter()
                    .map(|id| json!({ "part_id": id, "supplier_id": p.supplier_id }))
                    .collect::<Vec<_>>()
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "order failed: {body}");
    assert_eq!(body["status"], "IN_PROGRESS");
    let order_id = body["parts"][0]["purchase_order_id"].as_i64().unwrap();
    (request_id, order_id, part_ids)
}

#[tokio::test]
async fn ordering_parts_opens_a_pending_order_per_supplier() {
    let p = setup().await;
    let (_, order_id, _) = ordered_request(&p).await;

    let (status, body) = p
        .app
        .request(
            Method::GET,
            "/api/v1/purchase-orders",
            Some(&p.owner_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let orders = body.as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["order_id"], order_id);
    assert_eq!(orders[0]["status"], "PENDING");
    assert_eq!(orders[0]["total_positions"], 2);
    assert_eq!(orders[0]["supplier_inn"], "7812345678");
}

#[tokio::test]
async fn mixed_acceptance_partially_completes_the_order() {
    let p = setup().await;
    let (_, order_id, part_ids) = ordered_request(&p).await;

    p.app
        .request(
            Method::POST,
            &format!("/api/v1/purchase-orders/{order_id}/confirm"),
            Some(&p.owner_token),
            None,
        )
        .await;

    let (status, body) = p
        .app
        .request(
            Method::POST,
            &format!("/api/v1/purchase-orders/{order_id}/accept"),
            Some(&p.owner_token),
            Some(json!({
                "parts": [
                    {
                        "part_id": part_ids[0],
                        "status": "ACCEPTED",
                        "shelf_code": "B3"
                    },
                    {
                        "part_id": part_ids[1],
                        "status": "REJECTED",
                        "comment": "Arrived bent"
                    }
                ]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "accept failed: {body}");
    assert_eq!(body["status"], "PARTIALLY_COMPLETED");
    assert!(body["actual_delivery_date"].is_string());

    let accepted = &body["parts"][0];
    assert_eq!(accepted["accepted_quantity"], 2);
    assert_eq!(accepted["warehouse_id"], p.club_id);
    let rejected = &body["parts"][1];
    assert_eq!(rejected["accepted_quantity"], 0);
    assert_eq!(rejected["rejection_reason"], "Arrived bent");

    // Accepted goods landed in the club warehouse.
    let stock = p
        .app
        .state
        .services
        .inventory
        .find_stock(p.club_id, p.catalog_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stock.quantity, 2);
    assert_eq!(stock.shelf_code.as_deref(), Some("B3"));
}

#[tokio::test]
async fn full_rejection_rejects_the_order() {
    let p = setup().await;
    let (_, order_id, part_ids) = ordered_request(&p).await;

    let (status, body) = p
        .app
        .request(
            Method::POST,
            &format!("/api/v1/purchase-orders/{order_id}/accept"),
            Some(&p.owner_token),
            Some(json!({
                "parts": part_ids
                    .iter()
                    .map(|id| json!({ "part_id": id, "status": "REJECTED", "comment": "Wrong model" }))
                    .collect::<Vec<_>>()
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "accept failed: {body}");
    assert_eq!(body["status"], "REJECTED");

    // Nothing was placed into stock.
    let stock = p
        .app
        .state
        .services
        .inventory
        .find_stock(p.club_id, p.catalog_id)
        .await
        .unwrap();
    assert!(stock.is_none());
}

#[tokio::test]
async fn acceptance_with_unknown_parts_is_rejected() {
    let p = setup().await;
    let (_, order_id, _) = ordered_request(&p).await;

    let (status, _) = p
        .app
        .request(
            Method::POST,
            &format!("/api/v1/purchase-orders/{order_id}/accept"),
            Some(&p.owner_token),
            Some(json!({
                "parts": [ { "part_id": 999_999, "status": "ACCEPTED" } ]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reviews_update_the_supplier_rating() {
    let p = setup().await;
    let (_, order_id, _) = ordered_request(&p).await;

    let (status, body) = p
        .app
        .request(
            Method::POST,
            &format!("/api/v1/purchase-orders/{order_id}/reviews"),
            Some(&p.owner_token),
            Some(json!({ "rating": 4, "comment": "Quick delivery" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "review failed: {body}");
    assert_eq!(body["reviews"].as_array().unwrap().len(), 1);

    let (_, body) = p
        .app
        .request(
            Method::POST,
            &format!("/api/v1/purchase-orders/{order_id}/reviews"),
            Some(&p.owner_token),
            Some(json!({ "rating": 2, "comment": "Second batch was late" })),
        )
        .await;
    assert_eq!(body["reviews"].as_array().unwrap().len(), 2);

    let supplier_row = supplier::Entity::find_by_id(p.supplier_id)
        .one(&*p.app.state.db)
        .await
        .unwrap()
        .unwrap();
    let rating: f64 = supplier_row.rating.unwrap();
    assert!((rating - 3.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn complaints_are_tracked_and_resolvable() {
    let p = setup().await;
    let (_, order_id, _) = ordered_request(&p).await;

    let (status, body) = p
        .app
        .request(
            Method::POST,
            &format!("/api/v1/purchase-orders/{order_id}/complaints"),
            Some(&p.owner_token),
            Some(json!({
                "title": "Damaged packaging",
                "description": "Both plates arrived with torn packaging"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "complaint failed: {body}");
    let complaint_id = body["complaints"][0]["review_id"].as_i64().unwrap();
    assert_eq!(body["complaints"][0]["complaint_status"], "OPEN");

    let (status, body) = p
        .app
        .request(
            Method::PUT,
            &format!("/api/v1/purchase-orders/{order_id}/complaints/{complaint_id}"),
            Some(&p.owner_token),
            Some(json!({
                "status": "RESOLVED",
                "resolved": true,
                "resolution_notes": "Supplier reshipped"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["complaints"][0]["complaint_resolved"], true);

    // Archived/active filters and the complaint flag.
    let (_, body) = p
        .app
        .request(
            Method::GET,
            "/api/v1/purchase-orders?has_complaint=true",
            Some(&p.owner_token),
            None,
        )
        .await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (_, body) = p
        .app
        .request(
            Method::GET,
            "/api/v1/purchase-orders?archived=true",
            Some(&p.owner_token),
            None,
        )
        .await;
    assert!(body.as_array().unwrap().is_empty());
}
