use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use repairhub::{create_router, database::Database, utils::hash_password};

struct TestApp {
    router: Router,
    // Keeps the backing file alive for the test's duration.
    _dir: tempfile::TempDir,
}

fn app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(dir.path().join("db.json")).unwrap();
    TestApp {
        router: create_router(db),
        _dir: dir,
    }
}

async fn send(app: &TestApp, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn get(app: &TestApp, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

async fn post(app: &TestApp, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

async fn put(app: &TestApp, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::PUT, uri, Some(body)).await
}

async fn delete(app: &TestApp, uri: &str) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, None).await
}

#[tokio::test]
async fn customer_crud_round_trip() {
    let app = app();

    let (status, created) = post(
        &app,
        "/api/customers",
        json!({"name": "Ada Lovelace", "email": "ada@example.com"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Ada Lovelace");
    assert!(created["id"].is_string());
    assert!(created["createdAt"].is_string());

    let (status, listed) = get(&app, "/api/customers").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let id = created["id"].as_str().unwrap();
    let (status, _) = delete(&app, &format!("/api/customers/{}", id)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, listed) = get(&app, "/api/customers").await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn put_merges_present_fields_and_stamps_updated_at() {
    let app = app();
    let (_, created) = post(
        &app,
        "/api/customers",
        json!({"name": "Grace", "email": "grace@example.com"}),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let (status, updated) = put(
        &app,
        &format!("/api/customers/{}", id),
        json!({"phone": "555-0101"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Grace");
    assert_eq!(updated["email"], "grace@example.com");
    assert_eq!(updated["phone"], "555-0101");
    assert_eq!(updated["createdAt"], created["createdAt"]);
}

#[tokio::test]
async fn missing_records_answer_404_with_message_body() {
    let app = app();
    let (status, body) = put(&app, "/api/customers/nope", json!({"name": "x"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Customer not found");

    let (status, body) = delete(&app, "/api/tickets/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Ticket not found");
}

#[tokio::test]
async fn wrong_method_answers_405_with_allow_header() {
    let app = app();
    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/api/customers")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(response.headers().contains_key(header::ALLOW));
}

#[tokio::test]
async fn device_creation_derives_unique_id() {
    let app = app();
    let (status, device) = post(
        &app,
        "/api/devices",
        json!({
            "serialNumber": "SN123456",
            "brand": "Dell",
            "model": "Latitude",
            "customerId": "c1"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(device["uniqueId"], "DELL-LATI-SN12");
}

#[tokio::test]
async fn device_update_recomputes_and_cascades_unique_id() {
    let app = app();
    let (_, device) = post(
        &app,
        "/api/devices",
        json!({
            "serialNumber": "SN123456",
            "brand": "Dell",
            "model": "Latitude",
            "customerId": "c1"
        }),
    )
    .await;
    let device_id = device["id"].as_str().unwrap();

    let (_, ticket) = post(
        &app,
        "/api/tickets",
        json!({
            "customerId": "c1",
            "deviceId": device_id,
            "description": "will not boot"
        }),
    )
    .await;
    assert_eq!(ticket["deviceUniqueId"], "DELL-LATI-SN12");
    assert_eq!(ticket["status"], "RECEIVED");

    let (status, updated) = put(
        &app,
        &format!("/api/devices/{}", device_id),
        json!({"brand": "Asus"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["uniqueId"], "ASUS-LATI-SN12");

    let (_, tickets) = get(&app, "/api/tickets").await;
    assert_eq!(tickets[0]["deviceUniqueId"], "ASUS-LATI-SN12");
}

#[tokio::test]
async fn analyze_flags_low_stock_until_restocked() {
    let app = app();
    let (_, item) = post(
        &app,
        "/api/inventory",
        json!({"name": "Screen", "quantity": 2, "reorderLevel": 5}),
    )
    .await;
    let item_id = item["id"].as_str().unwrap();

    let (status, alerts) = get(&app, "/api/notifications/analyze").await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = alerts
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&format!("low-stock-{}", item_id).as_str()));

    put(
        &app,
        &format!("/api/inventory/{}", item_id),
        json!({"quantity": 10}),
    )
    .await;
    let (_, alerts) = get(&app, "/api/notifications/analyze").await;
    assert!(alerts
        .as_array()
        .unwrap()
        .iter()
        .all(|n| !n["id"].as_str().unwrap().starts_with("low-stock-")));
}

#[tokio::test]
async fn analyze_flags_devices_without_tickets() {
    let app = app();
    let (_, lonely) = post(
        &app,
        "/api/devices",
        json!({"serialNumber": "A1", "brand": "Acme", "model": "One", "customerId": "c1"}),
    )
    .await;
    let (_, busy) = post(
        &app,
        "/api/devices",
        json!({"serialNumber": "B2", "brand": "Acme", "model": "Two", "customerId": "c1"}),
    )
    .await;
    post(
        &app,
        "/api/tickets",
        json!({
            "customerId": "c1",
            "deviceId": busy["id"],
            "description": "cracked case"
        }),
    )
    .await;

    let (_, alerts) = get(&app, "/api/notifications/analyze").await;
    let ids: Vec<&str> = alerts
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&format!("abandoned-{}", lonely["id"].as_str().unwrap()).as_str()));
    assert!(!ids.contains(&format!("abandoned-{}", busy["id"].as_str().unwrap()).as_str()));
}

#[tokio::test]
async fn device_history_joins_names_and_totals_completed_revenue() {
    let app = app();
    let (_, customer) = post(
        &app,
        "/api/customers",
        json!({"name": "Ada Lovelace", "email": "ada@example.com"}),
    )
    .await;
    let customer_id = customer["id"].as_str().unwrap();
    let (_, device) = post(
        &app,
        "/api/devices",
        json!({
            "serialNumber": "SN999",
            "brand": "Lenovo",
            "model": "Yoga",
            "customerId": customer_id
        }),
    )
    .await;
    let device_id = device["id"].as_str().unwrap();

    let (_, done) = post(
        &app,
        "/api/tickets",
        json!({"customerId": customer_id, "deviceId": device_id, "description": "battery"}),
    )
    .await;
    put(
        &app,
        &format!("/api/tickets/{}", done["id"].as_str().unwrap()),
        json!({"status": "COMPLETED", "invoiceTotal": "120.50"}),
    )
    .await;
    post(
        &app,
        "/api/tickets",
        json!({"customerId": customer_id, "deviceId": device_id, "description": "hinge"}),
    )
    .await;

    let (status, history) = get(&app, &format!("/api/devices/{}/history", device_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history["totalRepairs"], 2);
    assert_eq!(history["totalRevenue"], "120.50");
    assert_eq!(history["customer"]["name"], "Ada Lovelace");
    let entries = history["history"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    let completed = entries
        .iter()
        .find(|e| e["status"] == "COMPLETED")
        .unwrap();
    assert_eq!(completed["customerName"], "Ada Lovelace");
    assert!(completed["completedDate"].is_string());

    let (status, _) = get(&app, "/api/devices/nope/history").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn inventory_listing_supports_grid_queries() {
    let app = app();
    for name in ["Charger", "Battery", "Adapter"] {
        post(
            &app,
            "/api/inventory",
            json!({"name": name, "quantity": 1, "reorderLevel": 0}),
        )
        .await;
    }

    // No parameters: the plain full array.
    let (_, plain) = get(&app, "/api/inventory").await;
    assert_eq!(plain.as_array().unwrap().len(), 3);

    let (status, page) = get(&app, "/api/inventory?sort=name&dir=desc&pageSize=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 3);
    assert_eq!(page["pageCount"], 2);
    let names: Vec<&str> = page["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Charger", "Battery"]);

    let (_, searched) = get(&app, "/api/inventory?q=batt&page=1").await;
    assert_eq!(searched["total"], 1);
    assert_eq!(searched["rows"][0]["name"], "Battery");
}

#[tokio::test]
async fn public_ticket_view_hides_internal_fields() {
    let app = app();
    let (_, ticket) = post(
        &app,
        "/api/tickets",
        json!({
            "customerId": "missing",
            "deviceId": "missing",
            "description": "no sound",
            "consultancyFee": "25.00"
        }),
    )
    .await;
    let (status, view) = get(
        &app,
        &format!("/api/tickets/{}/public", ticket["id"].as_str().unwrap()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["customerName"], "Unknown");
    assert_eq!(view["device"], "Unknown Device");
    assert!(view.get("consultancyFee").is_none());
    assert!(view.get("report").is_none());
}

#[tokio::test]
async fn ticket_items_resolve_name_and_price_from_inventory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("db.json");
    let now = "2026-08-01T00:00:00Z";
    let seeded = json!({
        "inventoryItems": [{
            "id": "inv1", "name": "RAM 8GB", "quantity": 9, "reorderLevel": 1,
            "price": "45.00", "createdAt": now, "updatedAt": now
        }],
        "ticketItems": [
            {"id": "ti1", "ticketId": "T1", "inventoryItemId": "inv1", "quantity": 2},
            {"id": "ti2", "ticketId": "T1", "inventoryItemId": "gone", "quantity": 1},
            {"id": "ti3", "ticketId": "T2", "inventoryItemId": "inv1", "quantity": 5}
        ]
    });
    std::fs::write(&path, seeded.to_string()).unwrap();
    let app = TestApp {
        router: create_router(Database::open(&path).unwrap()),
        _dir: dir,
    };

    let (status, items) = get(&app, "/api/tickets/T1/items").await;
    assert_eq!(status, StatusCode::OK);
    let items = items.as_array().unwrap().clone();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["name"], "RAM 8GB");
    assert_eq!(items[0]["price"], "45.00");
    assert_eq!(items[0]["quantity"], 2);
    // A dangling inventory reference resolves to a zero price, not an error.
    assert_eq!(items[1]["price"], "0");
    assert!(items[1]["name"].is_null());
}

#[tokio::test]
async fn login_round_trip_with_hashed_credentials() {
    std::env::set_var("JWT_SECRET", "test-secret");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("db.json");
    let seeded = json!({
        "users": [{
            "id": "u1",
            "name": "Desk Admin",
            "email": "admin@example.com",
            "passwordHash": hash_password("hunter2").unwrap()
        }]
    });
    std::fs::write(&path, seeded.to_string()).unwrap();
    let app = TestApp {
        router: create_router(Database::open(&path).unwrap()),
        _dir: dir,
    };

    let (status, body) = post(
        &app,
        "/api/auth/login",
        json!({"email": "admin@example.com", "password": "wrong"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({"email": "admin@example.com", "password": "hunter2"}).to_string(),
        ))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login sets a session cookie")
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with("auth_token="));
    // name=value only; the attributes stay out of the request header.
    let cookie = set_cookie.split(';').next().unwrap().to_string();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let user: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(user["email"], "admin@example.com");
    assert!(user.get("passwordHash").is_none());

    // The cookie authenticates /api/auth/me.
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/auth/me")
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, _) = get(&app, "/api/auth/me").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
