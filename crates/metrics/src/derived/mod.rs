//! Derived field calculator: operational metrics computed from records.

pub mod inventory;
pub mod rfm;
pub mod rollup;

pub use inventory::{InventoryPolicy, InventoryRow, InventorySummary, StockStatus, inventory_rows};
pub use rfm::{CustomerScore, RfmPolicy, Segment, rfm_scores};
pub use rollup::{
    OrderSummary, ProductRating, ReviewSummary, ShipmentSummary, TransactionSummary,
    product_ratings,
};
