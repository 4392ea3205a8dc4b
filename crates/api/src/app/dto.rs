use serde::{Deserialize, Serialize};

use prodtrack_core::DomainError;
use prodtrack_inventory::{AdjustmentDirection, CartItem, CartItemId, FailedItem, StockSnapshot};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct AdjustmentRequest {
    pub direction: AdjustmentDirection,
    pub quantity: i64,
}

/// Parse one bulk-submission line.
///
/// A line whose `id` cannot be read has nothing to report against, so it is
/// an `Err` for the whole request. Any other defect becomes a [`FailedItem`]
/// carrying that id.
pub fn parse_cart_line(
    index: usize,
    value: serde_json::Value,
) -> Result<Result<CartItem, FailedItem>, DomainError> {
    let cart_item_id = value
        .get("id")
        .cloned()
        .ok_or_else(|| DomainError::validation(format!("line {index} has no id")))
        .and_then(|id| {
            serde_json::from_value::<CartItemId>(id)
                .map_err(|e| DomainError::invalid_id(format!("line {index}: {e}")))
        })?;

    Ok(serde_json::from_value::<CartItem>(value).map_err(|e| FailedItem {
        cart_item_id,
        error: DomainError::validation(e.to_string()).to_string(),
    }))
}

// -------------------------
// Response DTOs
// -------------------------

/// Stock snapshot as served to clients: the snapshot's fields plus `success`.
#[derive(Debug, Serialize)]
pub struct StockResponse {
    pub success: bool,
    #[serde(flatten)]
    pub snapshot: StockSnapshot,
}

impl From<StockSnapshot> for StockResponse {
    fn from(snapshot: StockSnapshot) -> Self {
        Self {
            success: true,
            snapshot,
        }
    }
}
