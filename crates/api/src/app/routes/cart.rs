use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use crate::app::dto::parse_cart_line;
use crate::app::errors;
use crate::app::services::InventoryStore;

pub fn router() -> Router {
    Router::new().route("/bulk-submit", post(bulk_submit))
}

/// Apply every line; the response reports each line's outcome. Lines that
/// fail, including lines that do not parse, do not fail the request.
pub async fn bulk_submit(
    Extension(store): Extension<Arc<InventoryStore>>,
    body: Result<Json<Vec<serde_json::Value>>, JsonRejection>,
) -> axum::response::Response {
    let Json(lines) = match body {
        Ok(v) => v,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    if lines.is_empty() {
        return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", "no items to submit");
    }

    let parsed = match lines
        .into_iter()
        .enumerate()
        .map(|(index, value)| parse_cart_line(index, value))
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(parsed) => parsed,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let result = store.bulk_submit_lines(parsed);
    (StatusCode::OK, Json(result)).into_response()
}
