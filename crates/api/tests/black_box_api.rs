use prodtrack_api::ApiConfig;
use reqwest::StatusCode;
use serde_json::json;
use uuid::Uuid;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        Self::spawn_with(None).await
    }

    async fn spawn_with(api_token: Option<&str>) -> Self {
        // Same router as prod, bound to an ephemeral port.
        let config = ApiConfig {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            api_token: api_token.map(str::to_string),
        };
        let app = prodtrack_api::app::build_app(&config);
        let listener = tokio::net::TcpListener::bind(config.bind_addr)
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn create_item(client: &reqwest::Client, srv: &TestServer, body: serde_json::Value) -> serde_json::Value {
    let res = client
        .post(srv.url("/api/inventory/items"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

fn cart_line(item_type: &str, quantity: i64) -> serde_json::Value {
    json!({
        "id": Uuid::now_v7().to_string(),
        "itemType": item_type,
        "quantity": quantity,
        "itemName": "Hex bolt M8",
        "addedAt": "2026-01-05T09:30:00Z"
    })
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn_with(Some("s3cret")).await;
    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn api_requires_token_when_configured() {
    let srv = TestServer::spawn_with(Some("s3cret")).await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/api/inventory/1/stock")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(srv.url("/api/inventory/1/stock"))
        .bearer_auth("wrong")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(srv.url("/api/inventory/1/stock"))
        .bearer_auth("s3cret")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stock_query_returns_derived_figures() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created = create_item(
        &client,
        &srv,
        json!({
            "item_name": "Hex bolt M8",
            "part_number": "HB-M8-40",
            "current_stock_level": 10,
            "pending_orders_quantity": 3,
            "reorder_point": 8
        }),
    )
    .await;
    let id = created["inventory_item_id"].as_i64().unwrap();

    let res = client
        .get(srv.url(&format!("/api/inventory/{id}/stock")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["item_name"], "Hex bolt M8");
    assert_eq!(body["part_number"], "HB-M8-40");
    assert_eq!(body["available_quantity"], 7);
    assert_eq!(body["stock_status"], "low_stock");
    assert_eq!(body["can_order"], true);
}

#[tokio::test]
async fn unknown_and_malformed_ids_are_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/api/inventory/999/stock")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "not_found");

    let res = client.get(srv.url("/api/inventory/abc/stock")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_id");
}

#[tokio::test]
async fn reorder_and_adjustment_endpoints_update_stock() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created = create_item(&client, &srv, json!({ "item_name": "Gasket", "current_stock_level": 4 })).await;
    let id = created["inventory_item_id"].as_i64().unwrap();

    let res = client
        .post(srv.url(&format!("/api/inventory/{id}/reorders")))
        .json(&json!({ "quantity": 6 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["pending_orders_quantity"], 6);
    assert_eq!(body["available_quantity"], -2);
    assert_eq!(body["stock_status"], "out_of_stock");

    let res = client
        .post(srv.url(&format!("/api/inventory/{id}/adjustments")))
        .json(&json!({ "direction": "decrease", "quantity": 5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invariant_violation");

    let res = client
        .post(srv.url(&format!("/api/inventory/{id}/adjustments")))
        .json(&json!({ "direction": "increase", "quantity": 5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["current_stock_level"], 9);

    let res = client
        .post(srv.url(&format!("/api/inventory/{id}/reorders")))
        .json(&json!({ "quantity": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn empty_bulk_submission_is_a_validation_error() {
    let srv = TestServer::spawn().await;
    let res = reqwest::Client::new()
        .post(srv.url("/api/cart/bulk-submit"))
        .json(&json!([]))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn bulk_submission_reports_each_line() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created = create_item(&client, &srv, json!({ "item_name": "Hex bolt M8", "current_stock_level": 10 })).await;
    let id = created["inventory_item_id"].as_i64().unwrap();

    let mut reorder = cart_line("reorder", 3);
    reorder["inventoryItemId"] = json!(id);
    let mut missing = cart_line("reorder", 1);
    missing["inventoryItemId"] = json!(4242);
    let mut drain = cart_line("adjustment", 11);
    drain["inventoryItemId"] = json!(id);
    drain["adjustmentDirection"] = json!("decrease");
    let mut new_part = cart_line("new", 20);
    new_part["itemName"] = json!("Spring washer");
    new_part["unitCost"] = json!(15);

    let res = client
        .post(srv.url("/api/cart/bulk-submit"))
        .json(&json!([reorder, missing, drain, new_part]))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["successfulItems"].as_array().unwrap().len(), 2);
    assert_eq!(body["failedItems"].as_array().unwrap().len(), 2);
    assert_eq!(body["failedItems"][0]["cartItemId"], missing["id"]);
    assert_eq!(body["failedItems"][0]["error"], "not found");
    assert_eq!(body["failedItems"][1]["cartItemId"], drain["id"]);
    assert_eq!(body["message"], "2 of 4 items submitted successfully; 2 failed");

    // The reorder applied, the failed adjustment did not.
    let stock: serde_json::Value = client
        .get(srv.url(&format!("/api/inventory/{id}/stock")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stock["current_stock_level"], 10);
    assert_eq!(stock["pending_orders_quantity"], 3);

    let created_id = body["successfulItems"][1]["inventoryItemId"].as_i64().unwrap();
    let washer: serde_json::Value = client
        .get(srv.url(&format!("/api/inventory/{created_id}/stock")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(washer["item_name"], "Spring washer");
    assert_eq!(washer["current_stock_level"], 0);
    assert_eq!(washer["pending_orders_quantity"], 20);
}

#[tokio::test]
async fn malformed_line_fails_alone_in_bulk_submission() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created = create_item(&client, &srv, json!({ "item_name": "Hex bolt M8", "current_stock_level": 10 })).await;
    let id = created["inventory_item_id"].as_i64().unwrap();

    let mut good = cart_line("reorder", 4);
    good["inventoryItemId"] = json!(id);
    let mut bad = cart_line("reorder", 1);
    bad["inventoryItemId"] = json!(id);
    bad.as_object_mut().unwrap().remove("quantity");

    let res = client
        .post(srv.url("/api/cart/bulk-submit"))
        .json(&json!([bad, good]))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["successfulItems"].as_array().unwrap().len(), 1);
    assert_eq!(body["successfulItems"][0]["cartItemId"], good["id"]);
    assert_eq!(body["failedItems"].as_array().unwrap().len(), 1);
    assert_eq!(body["failedItems"][0]["cartItemId"], bad["id"]);
    assert!(body["failedItems"][0]["error"].as_str().unwrap().contains("quantity"));

    let stock: serde_json::Value = client
        .get(srv.url(&format!("/api/inventory/{id}/stock")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stock["pending_orders_quantity"], 4);
}

#[tokio::test]
async fn bulk_submission_body_must_be_an_array_of_identified_lines() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/api/cart/bulk-submit"))
        .json(&json!({ "items": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_body");

    let mut anonymous = cart_line("new", 2);
    anonymous.as_object_mut().unwrap().remove("id");
    let res = client
        .post(srv.url("/api/cart/bulk-submit"))
        .json(&json!([cart_line("new", 1), anonymous]))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
}
