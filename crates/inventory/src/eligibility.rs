//! Ordering eligibility: can a requested quantity be covered by available stock?

use serde::{Deserialize, Serialize};

use prodtrack_core::ValueObject;

use crate::stock::{StockReading, StockSnapshot};

/// Result of evaluating a requested quantity against a stock reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eligibility {
    pub can_order: bool,
    pub max_available: i64,
    pub message: String,
}

impl ValueObject for Eligibility {}

/// Classify `requested` against `reading`.
///
/// Rules apply in order:
/// 1. unknown availability blocks the order
/// 2. a non-positive request is never orderable
/// 3. a request within availability is allowed
/// 4. exhausted (or over-committed) stock blocks the order
/// 5. otherwise only part of the request can be covered
///
/// Total and side-effect free.
pub fn evaluate(reading: &StockReading, requested: i64) -> Eligibility {
    match reading {
        StockReading::Unknown { .. } => Eligibility {
            can_order: false,
            max_available: 0,
            message: "availability unknown".to_string(),
        },
        StockReading::Available(snapshot) => evaluate_snapshot(snapshot, requested),
    }
}

fn evaluate_snapshot(s: &StockSnapshot, requested: i64) -> Eligibility {
    let available = s.available_quantity();

    if requested <= 0 {
        return Eligibility {
            can_order: false,
            max_available: available.max(0),
            message: "Quantity must be positive".to_string(),
        };
    }

    if requested <= available {
        return Eligibility {
            can_order: true,
            max_available: available,
            message: format!("{requested} available"),
        };
    }

    let breakdown = format!(
        "({} in stock, {} pending orders)",
        s.current_stock_level(),
        s.pending_orders_quantity()
    );

    if available <= 0 {
        Eligibility {
            can_order: false,
            max_available: 0,
            message: format!("Out of stock {breakdown}"),
        }
    } else {
        Eligibility {
            can_order: false,
            max_available: available,
            message: format!("Only {available} available {breakdown}"),
        }
    }
}

impl StockSnapshot {
    /// Shorthand for [`evaluate`] on a successful reading.
    pub fn evaluate(&self, requested: i64) -> Eligibility {
        evaluate_snapshot(self, requested)
    }
}
