use axum::{
    body::{self, Body},
    http::{Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use rackledger::{create_router, ledger::InventoryService, repository::MemoryRepository};

fn app() -> Router {
    create_router(InventoryService::new(Arc::new(MemoryRepository::new())), None)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("request");

    app.clone().oneshot(request).await.expect("response")
}

async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

async fn post_ok(app: &Router, uri: &str, body: Value) -> Value {
    let response = send(app, Method::POST, uri, Some(body)).await;
    assert_eq!(response.status(), StatusCode::OK, "POST {}", uri);
    response_json(response).await
}

async fn get_json(app: &Router, uri: &str) -> Value {
    let response = send(app, Method::GET, uri, None).await;
    assert_eq!(response.status(), StatusCode::OK, "GET {}", uri);
    response_json(response).await
}

struct Seeded {
    item: String,
    l1: String,
    l2: String,
}

async fn seed(app: &Router) -> Seeded {
    let warehouse = post_ok(app, "/api/warehouses", json!({ "code": "WH-A", "name": "Warehouse A" })).await;
    let l1 = post_ok(
        app,
        "/api/locations",
        json!({ "code": "R1-A1-01", "description": "Row 1 Aisle 1 Bin 01", "warehouseId": warehouse["id"] }),
    )
    .await;
    let l2 = post_ok(app, "/api/locations", json!({ "code": "R1-A1-02", "warehouseId": warehouse["id"] })).await;
    let item = post_ok(
        app,
        "/api/items",
        json!({ "sku": "SKU-001", "name": "Sample Item 1", "barcode": "1234567890123" }),
    )
    .await;

    Seeded {
        item: item["id"].as_str().unwrap().to_string(),
        l1: l1["id"].as_str().unwrap().to_string(),
        l2: l2["id"].as_str().unwrap().to_string(),
    }
}

async fn balance(app: &Router, item: &str, location: &str) -> i64 {
    get_json(app, "/api/inventory")
        .await
        .as_array()
        .unwrap()
        .iter()
        .find(|row| row["itemId"] == item && row["locationId"] == location)
        .map_or(0, |row| row["quantity"].as_i64().unwrap())
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app();
    assert_eq!(get_json(&app, "/api/health").await, json!({ "ok": true }));
}

#[tokio::test]
async fn placement_retrieval_and_transfer_flow() {
    let app = app();
    let s = seed(&app).await;

    // Scenario A
    let placed = post_ok(&app, "/api/placement", json!({ "itemId": s.item, "locationId": s.l1, "qty": 300 })).await;
    assert_eq!(placed["quantity"], 300);
    assert_eq!(placed["itemId"], s.item.as_str());

    // Scenario B
    let retrieved = post_ok(&app, "/api/retrieval", json!({ "itemId": s.item, "locationId": s.l1, "qty": 50 })).await;
    assert_eq!(retrieved["quantity"], 250);

    // Scenario C
    let response = send(
        &app,
        Method::POST,
        "/api/retrieval",
        Some(json!({ "itemId": s.item, "locationId": s.l1, "qty": 500 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response_json(response).await, json!({ "error": "Insufficient quantity" }));
    assert_eq!(balance(&app, &s.item, &s.l1).await, 250);

    // Scenario D
    let transferred = post_ok(
        &app,
        "/api/transfer",
        json!({ "itemId": s.item, "fromLocationId": s.l1, "toLocationId": s.l2, "qty": 100 }),
    )
    .await;
    assert_eq!(transferred, json!({ "ok": true }));
    assert_eq!(balance(&app, &s.item, &s.l1).await, 150);
    assert_eq!(balance(&app, &s.item, &s.l2).await, 100);

    // Scenario E
    let response = send(
        &app,
        Method::POST,
        "/api/transfer",
        Some(json!({ "itemId": s.item, "fromLocationId": s.l1, "toLocationId": s.l1, "qty": 1 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response_json(response).await,
        json!({ "error": "Source and destination cannot be the same" })
    );

    let movements = get_json(&app, "/api/movements").await;
    let types: Vec<&str> = movements
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["type"].as_str().unwrap())
        .collect();
    assert_eq!(types, vec!["TRANSFER", "RETRIEVAL", "PLACEMENT"]);
    assert_eq!(movements[0]["fromLocationId"], s.l1.as_str());
    assert_eq!(movements[0]["toLocationId"], s.l2.as_str());
    assert_eq!(movements[1]["toLocationId"], Value::Null);
    assert_eq!(movements[2]["fromLocationId"], Value::Null);
}

#[tokio::test]
async fn malformed_bodies_are_bad_requests() {
    let app = app();
    let s = seed(&app).await;

    let cases = [
        json!({ "itemId": s.item, "locationId": s.l1 }),
        json!({ "itemId": s.item, "locationId": s.l1, "qty": 0 }),
        json!({ "itemId": s.item, "locationId": s.l1, "qty": -3 }),
        json!({ "itemId": s.item, "locationId": s.l1, "qty": 1.5 }),
        json!({ "itemId": "not-a-uuid", "locationId": s.l1, "qty": 1 }),
    ];
    for body in cases {
        let response = send(&app, Method::POST, "/api/placement", Some(body.clone())).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {}", body);
        assert!(response_json(response).await["error"].is_string());
    }

    let response = send(&app, Method::POST, "/api/items", Some(json!({ "sku": " ", "name": "Blank" }))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert!(get_json(&app, "/api/movements").await.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_references_are_not_found() {
    let app = app();
    let s = seed(&app).await;
    let missing = uuid::Uuid::new_v4().to_string();

    let response = send(
        &app,
        Method::POST,
        "/api/placement",
        Some(json!({ "itemId": missing, "locationId": s.l1, "qty": 5 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(
        &app,
        Method::POST,
        "/api/locations",
        Some(json!({ "code": "R9", "warehouseId": missing })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_sku_is_a_conflict() {
    let app = app();
    seed(&app).await;

    let response = send(&app, Method::POST, "/api/items", Some(json!({ "sku": "SKU-001", "name": "Again" }))).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        response_json(response).await,
        json!({ "error": "Item with this SKU already exists" })
    );
}

#[tokio::test]
async fn listings_embed_related_records() {
    let app = app();
    let s = seed(&app).await;
    post_ok(&app, "/api/placement", json!({ "itemId": s.item, "locationId": s.l2, "qty": 4 })).await;

    let locations = get_json(&app, "/api/locations").await;
    assert_eq!(locations.as_array().unwrap().len(), 2);
    assert_eq!(locations[0]["code"], "R1-A1-01");
    assert_eq!(locations[0]["warehouse"]["code"], "WH-A");

    let inventory = get_json(&app, "/api/inventory").await;
    assert_eq!(inventory[0]["item"]["sku"], "SKU-001");
    assert_eq!(inventory[0]["location"]["code"], "R1-A1-02");

    let dashboard = get_json(&app, "/api/dashboard").await;
    assert_eq!(dashboard, json!({ "totalSkus": 1, "totalLocations": 2, "totalQuantity": 4 }));
}

#[tokio::test]
async fn repeated_reads_are_identical() {
    let app = app();
    let s = seed(&app).await;
    post_ok(&app, "/api/placement", json!({ "itemId": s.item, "locationId": s.l1, "qty": 9 })).await;

    for uri in ["/api/warehouses", "/api/locations", "/api/items", "/api/inventory", "/api/movements"] {
        let first = get_json(&app, uri).await;
        let second = get_json(&app, uri).await;
        assert_eq!(first, second, "{}", uri);
    }
}

#[tokio::test]
async fn search_matches_sku_name_and_barcode() {
    let app = app();
    seed(&app).await;
    post_ok(&app, "/api/items", json!({ "sku": "SKU-002", "name": "Sample Item 2" })).await;

    assert_eq!(get_json(&app, "/api/search?q=sku-00").await.as_array().unwrap().len(), 2);
    let by_barcode = get_json(&app, "/api/search?q=7890").await;
    assert_eq!(by_barcode.as_array().unwrap().len(), 1);
    assert_eq!(by_barcode[0]["sku"], "SKU-001");
    assert_eq!(get_json(&app, "/api/search?q=ITEM%202").await[0]["sku"], "SKU-002");
    assert_eq!(get_json(&app, "/api/search").await, json!([]));
}
