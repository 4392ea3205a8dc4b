//! Source of live stock figures.

use async_trait::async_trait;
use serde_json::Value;

use prodtrack_inventory::{InventoryItemId, StockSnapshot};

use crate::error::ClientError;
use crate::http::{ApiEndpoint, error_from_response};

/// Fetches one item's stock from the system of record.
///
/// Implementations must not cache; [`crate::StockQueryCache`] does that.
#[async_trait]
pub trait StockGateway: Send + Sync + 'static {
    async fn get_stock(&self, id: InventoryItemId) -> Result<StockSnapshot, ClientError>;
}

/// [`StockGateway`] backed by `GET /api/inventory/{id}/stock`.
#[derive(Debug, Clone)]
pub struct HttpStockGateway {
    endpoint: ApiEndpoint,
}

impl HttpStockGateway {
    pub fn new(endpoint: ApiEndpoint) -> Self {
        Self { endpoint }
    }
}

#[async_trait]
impl StockGateway for HttpStockGateway {
    async fn get_stock(&self, id: InventoryItemId) -> Result<StockSnapshot, ClientError> {
        let what = format!("inventory item {id}");
        let resp = self.endpoint.get(&format!("/api/inventory/{id}/stock")).send().await?;

        if !resp.status().is_success() {
            let err = error_from_response(resp, &what).await;
            tracing::debug!(item_id = %id, error = %err, "stock query rejected");
            return Err(err);
        }

        let body: Value = resp.json().await?;
        parse_stock_body(body)
    }
}

/// Interpret a stock response body.
///
/// A body carrying `"success": false` is a failed query even when the
/// transport reported success.
fn parse_stock_body(body: Value) -> Result<StockSnapshot, ClientError> {
    if body.get("success").and_then(Value::as_bool) == Some(false) {
        let message = body
            .get("message")
            .or_else(|| body.get("error"))
            .and_then(Value::as_str)
            .unwrap_or("stock query failed");
        return Err(ClientError::Unavailable(message.to_string()));
    }

    serde_json::from_value(body).map_err(|e| ClientError::Parse(e.to_string()))
}
