//! Point-in-time stock figures for one inventory item.

use serde::{Deserialize, Serialize};

use prodtrack_core::{DomainError, ValueObject};

use crate::item::InventoryItemId;

/// Stock classification derived from available quantity and reorder point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "in_stock",
            StockStatus::LowStock => "low_stock",
            StockStatus::OutOfStock => "out_of_stock",
        }
    }
}

/// A stock read for one item.
///
/// Immutable once produced: a new query yields a new snapshot. Derived fields
/// (`available_quantity`, `stock_status`, `can_order`) are computed on
/// construction and on deserialization, so they always agree with the raw
/// figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StockFigures")]
pub struct StockSnapshot {
    inventory_item_id: InventoryItemId,
    item_name: String,
    part_number: Option<String>,
    current_stock_level: i64,
    pending_orders_quantity: i64,
    available_quantity: i64,
    reorder_point: Option<i64>,
    max_stock_level: Option<i64>,
    stock_status: StockStatus,
    can_order: bool,
}

impl ValueObject for StockSnapshot {}

/// Raw figures as they arrive from the stock query (derived fields ignored).
#[derive(Debug, Clone, Deserialize)]
pub struct StockFigures {
    pub inventory_item_id: InventoryItemId,
    pub item_name: String,
    #[serde(default)]
    pub part_number: Option<String>,
    pub current_stock_level: i64,
    pub pending_orders_quantity: i64,
    #[serde(default)]
    pub reorder_point: Option<i64>,
    #[serde(default)]
    pub max_stock_level: Option<i64>,
}

impl TryFrom<StockFigures> for StockSnapshot {
    type Error = DomainError;

    fn try_from(f: StockFigures) -> Result<Self, Self::Error> {
        if f.current_stock_level < 0 {
            return Err(DomainError::validation("current_stock_level cannot be negative"));
        }
        if f.pending_orders_quantity < 0 {
            return Err(DomainError::validation("pending_orders_quantity cannot be negative"));
        }
        Ok(Self::from_figures(f))
    }
}

impl StockSnapshot {
    /// Build a snapshot from raw figures, deriving availability and status.
    ///
    /// `available_quantity` is `current − pending` and is deliberately not
    /// clamped: over-committed items report a negative availability.
    pub fn from_figures(f: StockFigures) -> Self {
        let available_quantity = f.current_stock_level - f.pending_orders_quantity;
        let stock_status = classify(available_quantity, f.reorder_point);

        Self {
            inventory_item_id: f.inventory_item_id,
            item_name: f.item_name,
            part_number: f.part_number,
            current_stock_level: f.current_stock_level,
            pending_orders_quantity: f.pending_orders_quantity,
            available_quantity,
            reorder_point: f.reorder_point,
            max_stock_level: f.max_stock_level,
            stock_status,
            can_order: available_quantity > 0,
        }
    }

    pub fn inventory_item_id(&self) -> InventoryItemId {
        self.inventory_item_id
    }

    pub fn item_name(&self) -> &str {
        &self.item_name
    }

    pub fn part_number(&self) -> Option<&str> {
        self.part_number.as_deref()
    }

    pub fn current_stock_level(&self) -> i64 {
        self.current_stock_level
    }

    pub fn pending_orders_quantity(&self) -> i64 {
        self.pending_orders_quantity
    }

    pub fn available_quantity(&self) -> i64 {
        self.available_quantity
    }

    pub fn reorder_point(&self) -> Option<i64> {
        self.reorder_point
    }

    pub fn max_stock_level(&self) -> Option<i64> {
        self.max_stock_level
    }

    pub fn stock_status(&self) -> StockStatus {
        self.stock_status
    }

    pub fn can_order(&self) -> bool {
        self.can_order
    }
}

fn classify(available: i64, reorder_point: Option<i64>) -> StockStatus {
    if available <= 0 {
        StockStatus::OutOfStock
    } else if reorder_point.is_some_and(|rp| available <= rp) {
        StockStatus::LowStock
    } else {
        StockStatus::InStock
    }
}

/// Outcome of a stock query as seen by the evaluator.
///
/// `Unknown` is the "availability unknown" state: the query failed and nothing
/// can be said about the item's stock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockReading {
    Available(StockSnapshot),
    Unknown { reason: String },
}

impl StockReading {
    pub fn unknown(reason: impl Into<String>) -> Self {
        Self::Unknown {
            reason: reason.into(),
        }
    }

    pub fn snapshot(&self) -> Option<&StockSnapshot> {
        match self {
            StockReading::Available(s) => Some(s),
            StockReading::Unknown { .. } => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, StockReading::Available(_))
    }
}

impl From<StockSnapshot> for StockReading {
    fn from(value: StockSnapshot) -> Self {
        Self::Available(value)
    }
}

impl<E: core::fmt::Display> From<Result<StockSnapshot, E>> for StockReading {
    fn from(value: Result<StockSnapshot, E>) -> Self {
        match value {
            Ok(s) => Self::Available(s),
            Err(e) => Self::unknown(e.to_string()),
        }
    }
}
