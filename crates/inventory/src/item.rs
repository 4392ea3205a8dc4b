use serde::{Deserialize, Serialize};

use prodtrack_core::{DomainError, DomainResult, Entity, RecordId};

use crate::cart::AdjustmentDirection;
use crate::stock::{StockFigures, StockSnapshot};

/// Inventory item identifier (database identity).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventoryItemId(pub RecordId);

impl InventoryItemId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for InventoryItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl core::str::FromStr for InventoryItemId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Input for registering a new inventory item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewInventoryItem {
    pub item_name: String,
    #[serde(default)]
    pub part_number: Option<String>,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub unit_cost: Option<u64>,
    #[serde(default)]
    pub current_stock_level: i64,
    #[serde(default)]
    pub pending_orders_quantity: i64,
    #[serde(default)]
    pub reorder_point: Option<i64>,
    #[serde(default)]
    pub max_stock_level: Option<i64>,
}

/// Stock-keeping record for one item.
///
/// Every operation validates before it mutates: a rejected operation leaves
/// the record untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryItem {
    id: InventoryItemId,
    item_name: String,
    part_number: Option<String>,
    supplier: Option<String>,
    unit_cost: Option<u64>,
    current_stock_level: i64,
    pending_orders_quantity: i64,
    reorder_point: Option<i64>,
    max_stock_level: Option<i64>,
}

impl Entity for InventoryItem {
    type Id = InventoryItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl InventoryItem {
    pub fn register(id: InventoryItemId, new: NewInventoryItem) -> DomainResult<Self> {
        if new.item_name.trim().is_empty() {
            return Err(DomainError::validation("item_name cannot be empty"));
        }
        if new.current_stock_level < 0 {
            return Err(DomainError::validation("current_stock_level cannot be negative"));
        }
        if new.pending_orders_quantity < 0 {
            return Err(DomainError::validation("pending_orders_quantity cannot be negative"));
        }
        if new.reorder_point.is_some_and(|v| v < 0) || new.max_stock_level.is_some_and(|v| v < 0) {
            return Err(DomainError::validation("stock thresholds cannot be negative"));
        }

        Ok(Self {
            id,
            item_name: new.item_name.trim().to_string(),
            part_number: new.part_number,
            supplier: new.supplier,
            unit_cost: new.unit_cost,
            current_stock_level: new.current_stock_level,
            pending_orders_quantity: new.pending_orders_quantity,
            reorder_point: new.reorder_point,
            max_stock_level: new.max_stock_level,
        })
    }

    pub fn id_typed(&self) -> InventoryItemId {
        self.id
    }

    pub fn item_name(&self) -> &str {
        &self.item_name
    }

    pub fn supplier(&self) -> Option<&str> {
        self.supplier.as_deref()
    }

    pub fn unit_cost(&self) -> Option<u64> {
        self.unit_cost
    }

    pub fn current_stock_level(&self) -> i64 {
        self.current_stock_level
    }

    pub fn pending_orders_quantity(&self) -> i64 {
        self.pending_orders_quantity
    }

    /// Record a purchase order for `quantity` more units.
    pub fn place_reorder(&mut self, quantity: i64) -> DomainResult<()> {
        ensure_positive(quantity)?;
        self.pending_orders_quantity = self
            .pending_orders_quantity
            .checked_add(quantity)
            .ok_or_else(|| DomainError::invariant("pending orders overflow"))?;
        Ok(())
    }

    /// Correct on-hand stock by `quantity` units in `direction`.
    pub fn adjust_stock(&mut self, direction: AdjustmentDirection, quantity: i64) -> DomainResult<()> {
        ensure_positive(quantity)?;
        let new_stock = match direction {
            AdjustmentDirection::Increase => self.current_stock_level.checked_add(quantity),
            AdjustmentDirection::Decrease => self.current_stock_level.checked_sub(quantity),
        }
        .ok_or_else(|| DomainError::invariant("stock level overflow"))?;

        if new_stock < 0 {
            return Err(DomainError::invariant("stock cannot go negative"));
        }

        self.current_stock_level = new_stock;
        Ok(())
    }

    /// Produce a fresh snapshot of the current figures.
    pub fn snapshot(&self) -> StockSnapshot {
        StockSnapshot::from_figures(StockFigures {
            inventory_item_id: self.id,
            item_name: self.item_name.clone(),
            part_number: self.part_number.clone(),
            current_stock_level: self.current_stock_level,
            pending_orders_quantity: self.pending_orders_quantity,
            reorder_point: self.reorder_point,
            max_stock_level: self.max_stock_level,
        })
    }
}

fn ensure_positive(quantity: i64) -> DomainResult<()> {
    if quantity <= 0 {
        return Err(DomainError::validation("quantity must be positive"));
    }
    Ok(())
}
