//! Inventory domain module.
//!
//! This crate contains the stock and ordering rules, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage):
//!
//! - `stock`: point-in-time stock snapshots and their derived classification
//! - `eligibility`: whether a requested quantity can be ordered
//! - `cart`: the in-progress collection of order lines
//! - `submission`: the partial-failure report of a bulk submission
//! - `item`: the stock-keeping record the API applies order lines to

pub mod cart;
pub mod eligibility;
pub mod item;
pub mod stock;
pub mod submission;

pub use cart::{
    AdjustmentDirection, CapturedStock, Cart, CartItem, CartItemId, CartItemType, CartSummary,
};
pub use eligibility::{Eligibility, evaluate};
pub use item::{InventoryItem, InventoryItemId, NewInventoryItem};
pub use stock::{StockFigures, StockReading, StockSnapshot, StockStatus};
pub use submission::{BulkSubmitReport, BulkSubmitResult, FailedItem, SubmittedItem};
