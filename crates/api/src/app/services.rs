use std::{
    collections::HashMap,
    sync::{
        RwLock, RwLockReadGuard, RwLockWriteGuard,
        atomic::{AtomicI64, Ordering},
    },
};

use prodtrack_core::{DomainError, DomainResult, RecordId};
use prodtrack_inventory::{
    AdjustmentDirection, BulkSubmitReport, BulkSubmitResult, CartItem, CartItemType, InventoryItem,
    FailedItem, InventoryItemId, NewInventoryItem, StockSnapshot, SubmittedItem,
};

type Items = HashMap<InventoryItemId, InventoryItem>;

/// In-memory inventory: the system of record the API serves stock from.
///
/// Ids are allocated sequentially starting at 1.
#[derive(Debug, Default)]
pub struct InventoryStore {
    items: RwLock<Items>,
    last_id: AtomicI64,
}

impl InventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, new: NewInventoryItem) -> DomainResult<StockSnapshot> {
        let mut items = self.write();
        let snapshot = self.register_in(&mut items, new)?;
        tracing::info!(item_id = %snapshot.inventory_item_id(), "inventory item registered");
        Ok(snapshot)
    }

    pub fn stock(&self, id: InventoryItemId) -> DomainResult<StockSnapshot> {
        self.read().get(&id).map(InventoryItem::snapshot).ok_or(DomainError::NotFound)
    }

    pub fn place_reorder(&self, id: InventoryItemId, quantity: i64) -> DomainResult<StockSnapshot> {
        let mut items = self.write();
        let item = items.get_mut(&id).ok_or(DomainError::NotFound)?;
        item.place_reorder(quantity)?;
        Ok(item.snapshot())
    }

    pub fn adjust(
        &self,
        id: InventoryItemId,
        direction: AdjustmentDirection,
        quantity: i64,
    ) -> DomainResult<StockSnapshot> {
        let mut items = self.write();
        let item = items.get_mut(&id).ok_or(DomainError::NotFound)?;
        item.adjust_stock(direction, quantity)?;
        Ok(item.snapshot())
    }

    /// Apply each cart line on its own; one line failing does not stop the rest.
    pub fn bulk_submit(&self, lines: &[CartItem]) -> BulkSubmitResult {
        self.bulk_submit_lines(lines.iter().cloned().map(Ok))
    }

    /// Like [`Self::bulk_submit`], for a batch where some lines already
    /// failed to parse. Those are reported as failures in their position.
    ///
    /// The whole batch runs under one write lock, so readers see either none
    /// or all of its applied lines.
    pub fn bulk_submit_lines(
        &self,
        lines: impl IntoIterator<Item = Result<CartItem, FailedItem>>,
    ) -> BulkSubmitResult {
        let mut report = BulkSubmitReport::new();
        let mut items = self.write();
        let mut total = 0usize;

        for line in lines {
            total += 1;
            let line = match line {
                Ok(line) => line,
                Err(failed) => {
                    tracing::debug!(cart_item_id = %failed.cart_item_id, error = %failed.error, "cart line unreadable");
                    report.record_failure(failed.cart_item_id, failed.error);
                    continue;
                }
            };

            let cart_item_id = line.id_typed();
            if report.has_outcome(&cart_item_id) {
                report.record_failure(cart_item_id, "duplicate cart item");
                continue;
            }

            match self.apply_line(&mut items, &line) {
                Ok(inventory_item_id) => report.record_success(SubmittedItem {
                    cart_item_id,
                    item_type: line.item_type(),
                    inventory_item_id,
                }),
                Err(e) => {
                    tracing::debug!(
                        %cart_item_id,
                        item_type = line.item_type().as_str(),
                        error = %e,
                        "cart line rejected"
                    );
                    report.record_failure(cart_item_id, e.to_string());
                }
            }
        }

        let result = report.finish();
        tracing::info!(
            lines = total,
            failed = result.failed_items.len(),
            "bulk submission applied"
        );
        result
    }

    fn apply_line(&self, items: &mut Items, line: &CartItem) -> DomainResult<InventoryItemId> {
        line.validate()?;

        match line.item_type() {
            CartItemType::New => {
                let new = NewInventoryItem {
                    item_name: line.item_name().to_string(),
                    part_number: line.part_number().map(str::to_string),
                    supplier: line.supplier().map(str::to_string),
                    unit_cost: line.unit_cost(),
                    current_stock_level: 0,
                    pending_orders_quantity: line.quantity(),
                    reorder_point: None,
                    max_stock_level: None,
                };
                Ok(self.register_in(items, new)?.inventory_item_id())
            }
            CartItemType::Reorder => {
                let id = linked_item(line)?;
                items.get_mut(&id).ok_or(DomainError::NotFound)?.place_reorder(line.quantity())?;
                Ok(id)
            }
            CartItemType::Adjustment => {
                let id = linked_item(line)?;
                let direction = line
                    .adjustment_direction()
                    .ok_or_else(|| DomainError::validation("adjustments need a direction"))?;
                items
                    .get_mut(&id)
                    .ok_or(DomainError::NotFound)?
                    .adjust_stock(direction, line.quantity())?;
                Ok(id)
            }
        }
    }

    fn register_in(&self, items: &mut Items, new: NewInventoryItem) -> DomainResult<StockSnapshot> {
        let id = self.next_id()?;
        let item = InventoryItem::register(id, new)?;
        let snapshot = item.snapshot();
        items.insert(id, item);
        Ok(snapshot)
    }

    fn next_id(&self) -> DomainResult<InventoryItemId> {
        let n = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(InventoryItemId::new(RecordId::new(n)?))
    }

    fn read(&self) -> RwLockReadGuard<'_, Items> {
        self.items.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Items> {
        self.items.write().unwrap_or_else(|e| e.into_inner())
    }
}

fn linked_item(line: &CartItem) -> DomainResult<InventoryItemId> {
    line.inventory_item_id()
        .ok_or_else(|| DomainError::validation("line is not linked to an inventory item"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_bolts(current: i64) -> (InventoryStore, StockSnapshot) {
        let store = InventoryStore::new();
        let bolts = store
            .register(NewInventoryItem {
                item_name: "Hex bolt M8".to_string(),
                current_stock_level: current,
                ..NewInventoryItem::default()
            })
            .unwrap();
        (store, bolts)
    }

    #[test]
    fn ids_are_sequential() {
        let (store, bolts) = store_with_bolts(1);
        let nuts = store
            .register(NewInventoryItem {
                item_name: "Hex nut M8".to_string(),
                ..NewInventoryItem::default()
            })
            .unwrap();
        assert_eq!(bolts.inventory_item_id().to_string(), "1");
        assert_eq!(nuts.inventory_item_id().to_string(), "2");
    }

    #[test]
    fn unknown_item_is_not_found() {
        let store = InventoryStore::new();
        let id = InventoryItemId::new(RecordId::new(42).unwrap());
        match store.stock(id).unwrap_err() {
            DomainError::NotFound => {}
            _ => panic!("Expected NotFound"),
        }
    }

    #[test]
    fn bulk_submit_applies_lines_independently() {
        let (store, bolts) = store_with_bolts(5);
        let reorder = CartItem::reorder(&bolts, 10).unwrap();
        let too_big = CartItem::adjustment(&bolts, AdjustmentDirection::Decrease, 6).unwrap();
        let fresh = CartItem::new_item("Spring washer", 25).unwrap();

        let result = store.bulk_submit(&[reorder.clone(), too_big.clone(), fresh.clone()]);

        assert!(!result.success);
        assert!(result.succeeded(&reorder.id_typed()));
        assert!(result.succeeded(&fresh.id_typed()));
        assert!(result
            .failure_for(&too_big.id_typed())
            .unwrap()
            .error
            .contains("stock cannot go negative"));

        let after = store.stock(bolts.inventory_item_id()).unwrap();
        assert_eq!(after.current_stock_level(), 5);
        assert_eq!(after.pending_orders_quantity(), 10);

        let created = result
            .successful_items
            .iter()
            .find(|s| s.cart_item_id == fresh.id_typed())
            .unwrap();
        let washer = store.stock(created.inventory_item_id).unwrap();
        assert_eq!(washer.current_stock_level(), 0);
        assert_eq!(washer.pending_orders_quantity(), 25);
        assert_eq!(washer.available_quantity(), -25);
    }

    #[test]
    fn line_for_missing_item_fails_alone() {
        let (store, bolts) = store_with_bolts(5);
        let other = InventoryStore::new();
        // Registered in a different store, so id 2 does not exist here.
        other.register(NewInventoryItem { item_name: "a".into(), ..Default::default() }).unwrap();
        let ghost = other
            .register(NewInventoryItem { item_name: "Ghost".into(), ..Default::default() })
            .unwrap();

        let ok = CartItem::adjustment(&bolts, AdjustmentDirection::Increase, 3).unwrap();
        let missing = CartItem::reorder(&ghost, 1).unwrap();
        let result = store.bulk_submit(&[missing.clone(), ok.clone()]);

        assert_eq!(result.failure_for(&missing.id_typed()).unwrap().error, "not found");
        assert!(result.succeeded(&ok.id_typed()));
        assert_eq!(store.stock(bolts.inventory_item_id()).unwrap().current_stock_level(), 8);
    }

    #[test]
    fn duplicate_line_ids_are_rejected() {
        let (store, bolts) = store_with_bolts(5);
        let line = CartItem::reorder(&bolts, 1).unwrap();
        let result = store.bulk_submit(&[line.clone(), line.clone()]);

        assert!(result.succeeded(&line.id_typed()));
        assert_eq!(result.failed_items.len(), 1);
        assert_eq!(store.stock(bolts.inventory_item_id()).unwrap().pending_orders_quantity(), 1);
    }

    #[test]
    fn unreadable_lines_fail_in_place() {
        let (store, bolts) = store_with_bolts(5);
        let ok = CartItem::reorder(&bolts, 2).unwrap();
        let unreadable = FailedItem {
            cart_item_id: prodtrack_inventory::CartItemId::new(),
            error: "validation failed: missing field `quantity`".to_string(),
        };

        let result = store.bulk_submit_lines(vec![Err(unreadable.clone()), Ok(ok.clone())]);

        assert!(!result.success);
        assert_eq!(result.failed_items, vec![unreadable]);
        assert!(result.succeeded(&ok.id_typed()));
        assert_eq!(result.message, "1 of 2 items submitted successfully; 1 failed");
        assert_eq!(store.stock(bolts.inventory_item_id()).unwrap().pending_orders_quantity(), 2);
    }
}
