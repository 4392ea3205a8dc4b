//! The cart: an ordered, process-local collection of pending order lines.
//!
//! Lines keep their insertion order. Edits happen in place, so the edited line
//! does not move. Stock figures captured when a line is added are a copy and
//! may drift from the live stock; use [`Cart::revalidate`] against a newer
//! reading before relying on them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use prodtrack_core::{DomainError, DomainResult, Entity, LocalId, ValueObject};

use crate::eligibility::{Eligibility, evaluate};
use crate::item::InventoryItemId;
use crate::stock::{StockReading, StockSnapshot};
use crate::submission::BulkSubmitResult;

/// Cart line identifier (generated on the client).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartItemId(pub LocalId);

impl CartItemId {
    pub fn new() -> Self {
        Self(LocalId::new())
    }
}

impl Default for CartItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for CartItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// What a cart line asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CartItemType {
    /// A part not yet tracked in inventory.
    New,
    /// More units of an existing item.
    Reorder,
    /// A correction of an existing item's on-hand stock.
    Adjustment,
}

impl CartItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CartItemType::New => "new",
            CartItemType::Reorder => "reorder",
            CartItemType::Adjustment => "adjustment",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentDirection {
    Increase,
    Decrease,
}

/// Stock figures copied from a snapshot when the line was added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedStock {
    pub current_stock_level: i64,
    pub pending_orders_quantity: i64,
    pub available_quantity: i64,
    pub captured_at: DateTime<Utc>,
}

impl ValueObject for CapturedStock {}

impl CapturedStock {
    fn from_snapshot(s: &StockSnapshot) -> Self {
        Self {
            current_stock_level: s.current_stock_level(),
            pending_orders_quantity: s.pending_orders_quantity(),
            available_quantity: s.available_quantity(),
            captured_at: Utc::now(),
        }
    }
}

/// One intended order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    id: CartItemId,
    item_type: CartItemType,
    quantity: i64,
    #[serde(default)]
    inventory_item_id: Option<InventoryItemId>,
    item_name: String,
    #[serde(default)]
    part_number: Option<String>,
    #[serde(default)]
    supplier: Option<String>,
    #[serde(default)]
    unit_cost: Option<u64>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    adjustment_direction: Option<AdjustmentDirection>,
    #[serde(default)]
    captured_stock: Option<CapturedStock>,
    added_at: DateTime<Utc>,
}

impl Entity for CartItem {
    type Id = CartItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl CartItem {
    /// A line for a part that is not in inventory yet.
    pub fn new_item(item_name: impl Into<String>, quantity: i64) -> DomainResult<Self> {
        let item = Self::blank(CartItemType::New, item_name.into(), quantity);
        item.validate()?;
        Ok(item)
    }

    /// A reorder of an existing item; captures the snapshot's figures.
    pub fn reorder(snapshot: &StockSnapshot, quantity: i64) -> DomainResult<Self> {
        let item = Self::from_snapshot(CartItemType::Reorder, snapshot, quantity);
        item.validate()?;
        Ok(item)
    }

    /// A stock correction of an existing item; captures the snapshot's figures.
    pub fn adjustment(
        snapshot: &StockSnapshot,
        direction: AdjustmentDirection,
        quantity: i64,
    ) -> DomainResult<Self> {
        let mut item = Self::from_snapshot(CartItemType::Adjustment, snapshot, quantity);
        item.adjustment_direction = Some(direction);
        item.validate()?;
        Ok(item)
    }

    fn blank(item_type: CartItemType, item_name: String, quantity: i64) -> Self {
        Self {
            id: CartItemId::new(),
            item_type,
            quantity,
            inventory_item_id: None,
            item_name,
            part_number: None,
            supplier: None,
            unit_cost: None,
            notes: None,
            adjustment_direction: None,
            captured_stock: None,
            added_at: Utc::now(),
        }
    }

    fn from_snapshot(item_type: CartItemType, snapshot: &StockSnapshot, quantity: i64) -> Self {
        let mut item = Self::blank(item_type, snapshot.item_name().to_string(), quantity);
        item.inventory_item_id = Some(snapshot.inventory_item_id());
        item.part_number = snapshot.part_number().map(str::to_string);
        item.captured_stock = Some(CapturedStock::from_snapshot(snapshot));
        item
    }

    pub fn with_id(mut self, id: CartItemId) -> Self {
        self.id = id;
        self
    }

    pub fn with_part_number(mut self, part_number: impl Into<String>) -> Self {
        self.part_number = Some(part_number.into());
        self
    }

    pub fn with_supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = Some(supplier.into());
        self
    }

    pub fn with_unit_cost(mut self, unit_cost: u64) -> Self {
        self.unit_cost = Some(unit_cost);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Check the line is submittable.
    ///
    /// Lines built through the constructors are always valid; lines that
    /// arrive over the wire are checked here.
    pub fn validate(&self) -> DomainResult<()> {
        if self.quantity <= 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        match self.item_type {
            CartItemType::New => {
                if self.item_name.trim().is_empty() {
                    return Err(DomainError::validation("new items need a name"));
                }
            }
            CartItemType::Reorder => {
                if self.inventory_item_id.is_none() {
                    return Err(DomainError::validation("reorders need an inventory item"));
                }
            }
            CartItemType::Adjustment => {
                if self.inventory_item_id.is_none() {
                    return Err(DomainError::validation("adjustments need an inventory item"));
                }
                if self.adjustment_direction.is_none() {
                    return Err(DomainError::validation("adjustments need a direction"));
                }
            }
        }
        Ok(())
    }

    pub fn id_typed(&self) -> CartItemId {
        self.id
    }

    pub fn item_type(&self) -> CartItemType {
        self.item_type
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn inventory_item_id(&self) -> Option<InventoryItemId> {
        self.inventory_item_id
    }

    pub fn item_name(&self) -> &str {
        &self.item_name
    }

    pub fn part_number(&self) -> Option<&str> {
        self.part_number.as_deref()
    }

    pub fn supplier(&self) -> Option<&str> {
        self.supplier.as_deref()
    }

    pub fn unit_cost(&self) -> Option<u64> {
        self.unit_cost
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn adjustment_direction(&self) -> Option<AdjustmentDirection> {
        self.adjustment_direction
    }

    pub fn captured_stock(&self) -> Option<&CapturedStock> {
        self.captured_stock.as_ref()
    }

    pub fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }

    /// `quantity × unit_cost`, if the line has a cost.
    pub fn line_cost(&self) -> Option<u64> {
        self.unit_cost
            .map(|cost| cost.saturating_mul(self.quantity.max(0) as u64))
    }
}

/// Derived cart statistics, computed on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub total_items: usize,
    pub total_quantity: i64,
    /// In the smallest currency unit; lines without a cost contribute nothing.
    pub estimated_total_cost: u64,
    pub new_items_count: usize,
    pub reorder_items_count: usize,
    pub adjustment_items_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line. Rejects invalid lines and duplicate line ids.
    pub fn add(&mut self, item: CartItem) -> DomainResult<&CartItem> {
        item.validate()?;
        if self.position(&item.id).is_some() {
            return Err(DomainError::conflict(format!("cart item {} already in cart", item.id)));
        }
        self.items.push(item);
        Ok(&self.items[self.items.len() - 1])
    }

    pub fn remove(&mut self, id: &CartItemId) -> Option<CartItem> {
        let idx = self.position(id)?;
        Some(self.items.remove(idx))
    }

    pub fn update_quantity(&mut self, id: &CartItemId, quantity: i64) -> DomainResult<()> {
        if quantity <= 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        let item = self.get_mut(id)?;
        item.quantity = quantity;
        Ok(())
    }

    /// Replace a line's notes; blank notes clear them.
    pub fn update_notes(&mut self, id: &CartItemId, notes: Option<String>) -> DomainResult<()> {
        let item = self.get_mut(id)?;
        item.notes = notes.filter(|n| !n.trim().is_empty());
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn get(&self, id: &CartItemId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.is(id))
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn items_of_type(&self, item_type: CartItemType) -> impl Iterator<Item = &CartItem> {
        self.items.iter().filter(move |i| i.item_type == item_type)
    }

    /// First line linked to `inventory_item_id`, if any.
    pub fn find_by_inventory_item(&self, inventory_item_id: InventoryItemId) -> Option<&CartItem> {
        self.items
            .iter()
            .find(|i| i.inventory_item_id == Some(inventory_item_id))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn summary(&self) -> CartSummary {
        self.items.iter().fold(
            CartSummary {
                total_items: self.items.len(),
                ..CartSummary::default()
            },
            |mut acc, item| {
                acc.total_quantity += item.quantity;
                acc.estimated_total_cost = acc
                    .estimated_total_cost
                    .saturating_add(item.line_cost().unwrap_or(0));
                match item.item_type {
                    CartItemType::New => acc.new_items_count += 1,
                    CartItemType::Reorder => acc.reorder_items_count += 1,
                    CartItemType::Adjustment => acc.adjustment_items_count += 1,
                }
                acc
            },
        )
    }

    /// Evaluate a line's quantity against a newer stock reading.
    pub fn revalidate(&self, id: &CartItemId, reading: &StockReading) -> DomainResult<Eligibility> {
        let item = self.get(id).ok_or(DomainError::NotFound)?;
        Ok(evaluate(reading, item.quantity))
    }

    /// Drop the lines a bulk submission applied; failed lines stay.
    ///
    /// Returns the removed lines in cart order.
    pub fn apply_submission(&mut self, result: &BulkSubmitResult) -> Vec<CartItem> {
        let (submitted, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.items)
            .into_iter()
            .partition(|item| result.succeeded(&item.id));
        self.items = kept;
        submitted
    }

    fn position(&self, id: &CartItemId) -> Option<usize> {
        self.items.iter().position(|i| i.is(id))
    }

    fn get_mut(&mut self, id: &CartItemId) -> DomainResult<&mut CartItem> {
        self.items
            .iter_mut()
            .find(|i| i.is(id))
            .ok_or(DomainError::NotFound)
    }
}
