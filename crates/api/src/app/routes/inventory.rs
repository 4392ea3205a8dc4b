use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use prodtrack_inventory::NewInventoryItem;

use crate::app::services::InventoryStore;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/items", post(create_item))
        .route("/:id/stock", get(get_stock))
        .route("/:id/reorders", post(place_reorder))
        .route("/:id/adjustments", post(adjust_stock))
}

pub async fn get_stock(
    Extension(store): Extension<Arc<InventoryStore>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_item_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match store.stock(id) {
        Ok(snapshot) => (StatusCode::OK, Json(dto::StockResponse::from(snapshot))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn create_item(
    Extension(store): Extension<Arc<InventoryStore>>,
    body: Result<Json<NewInventoryItem>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(v) => v,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match store.register(body) {
        Ok(snapshot) => (StatusCode::CREATED, Json(dto::StockResponse::from(snapshot))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn place_reorder(
    Extension(store): Extension<Arc<InventoryStore>>,
    Path(id): Path<String>,
    body: Result<Json<dto::ReorderRequest>, JsonRejection>,
) -> axum::response::Response {
    let id = match errors::parse_item_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Json(body) = match body {
        Ok(v) => v,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match store.place_reorder(id, body.quantity) {
        Ok(snapshot) => (StatusCode::OK, Json(dto::StockResponse::from(snapshot))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn adjust_stock(
    Extension(store): Extension<Arc<InventoryStore>>,
    Path(id): Path<String>,
    body: Result<Json<dto::AdjustmentRequest>, JsonRejection>,
) -> axum::response::Response {
    let id = match errors::parse_item_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Json(body) = match body {
        Ok(v) => v,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match store.adjust(id, body.direction, body.quantity) {
        Ok(snapshot) => (StatusCode::OK, Json(dto::StockResponse::from(snapshot))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
