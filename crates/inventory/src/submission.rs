//! Bulk submission outcome: which cart lines applied and which did not.
//!
//! A submission is not all-or-nothing. Each line succeeds or fails on its own
//! and the caller inspects `failed_items` to learn what did not apply.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::cart::{CartItemId, CartItemType};
use crate::item::InventoryItemId;

/// A line that was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedItem {
    pub cart_item_id: CartItemId,
    pub item_type: CartItemType,
    /// The item the line created or changed.
    pub inventory_item_id: InventoryItemId,
}

/// A line that was not applied, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedItem {
    pub cart_item_id: CartItemId,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkSubmitResult {
    /// True only when every line applied.
    pub success: bool,
    pub successful_items: Vec<SubmittedItem>,
    pub failed_items: Vec<FailedItem>,
    pub message: String,
}

impl BulkSubmitResult {
    pub fn succeeded(&self, id: &CartItemId) -> bool {
        self.successful_items.iter().any(|s| &s.cart_item_id == id)
    }

    pub fn failure_for(&self, id: &CartItemId) -> Option<&FailedItem> {
        self.failed_items.iter().find(|f| &f.cart_item_id == id)
    }
}

/// Accumulates per-line outcomes in submission order.
#[derive(Debug, Default)]
pub struct BulkSubmitReport {
    successful: Vec<SubmittedItem>,
    failed: Vec<FailedItem>,
    seen: HashSet<CartItemId>,
}

impl BulkSubmitReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self, item: SubmittedItem) {
        self.seen.insert(item.cart_item_id);
        self.successful.push(item);
    }

    pub fn record_failure(&mut self, cart_item_id: CartItemId, error: impl Into<String>) {
        self.seen.insert(cart_item_id);
        self.failed.push(FailedItem {
            cart_item_id,
            error: error.into(),
        });
    }

    /// Whether an outcome was already recorded for `id` (duplicate lines in one batch).
    pub fn has_outcome(&self, id: &CartItemId) -> bool {
        self.seen.contains(id)
    }

    pub fn finish(self) -> BulkSubmitResult {
        let ok = self.successful.len();
        let failed = self.failed.len();
        let total = ok + failed;

        let message = if failed == 0 {
            format!("{ok} of {total} items submitted successfully")
        } else if ok == 0 {
            format!("All {total} items failed to submit")
        } else {
            format!("{ok} of {total} items submitted successfully; {failed} failed")
        };

        BulkSubmitResult {
            success: failed == 0,
            successful_items: self.successful,
            failed_items: self.failed,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stock::test_support::item_id;

    fn submitted(id: CartItemId) -> SubmittedItem {
        SubmittedItem {
            cart_item_id: id,
            item_type: CartItemType::Reorder,
            inventory_item_id: item_id(2),
        }
    }

    #[test]
    fn partial_failure_is_reported_per_line() {
        let (a, b, c) = (CartItemId::new(), CartItemId::new(), CartItemId::new());
        let mut report = BulkSubmitReport::new();
        report.record_success(submitted(a));
        report.record_failure(b, "not found");
        report.record_success(submitted(c));
        let result = report.finish();

        assert!(!result.success);
        assert_eq!(result.successful_items.len(), 2);
        assert_eq!(result.failure_for(&b).unwrap().error, "not found");
        assert!(result.succeeded(&c));
        assert!(!result.succeeded(&b));
        assert_eq!(result.message, "2 of 3 items submitted successfully; 1 failed");
    }

    #[test]
    fn all_successful_is_success() {
        let mut report = BulkSubmitReport::new();
        report.record_success(submitted(CartItemId::new()));
        let result = report.finish();
        assert!(result.success);
        assert!(result.failed_items.is_empty());
    }

    #[test]
    fn wire_shape_uses_camel_case() {
        let id = CartItemId::new();
        let mut report = BulkSubmitReport::new();
        report.record_failure(id, "stock cannot go negative");
        let v = serde_json::to_value(report.finish()).unwrap();

        assert_eq!(v["success"], false);
        assert_eq!(v["failedItems"][0]["cartItemId"], id.to_string());
        assert_eq!(v["failedItems"][0]["error"], "stock cannot go negative");
        assert!(v["successfulItems"].as_array().unwrap().is_empty());
        assert_eq!(v["message"], "All 1 items failed to submit");
    }
}
