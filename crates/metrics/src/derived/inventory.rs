//! Inventory rows with derived stock figures.
//!
//! - committed = min(sold_count, on_hand)
//! - available = on_hand - committed (never negative)
//! - incoming  = round(on_hand * incoming_rate)
//! - status    = out_of_stock if available == 0, low if below threshold, else ok

use serde::{Deserialize, Serialize};

use backoffice_core::{Intent, StatusIntent};
use backoffice_products::{Product, ProductId, ProductStatus};

/// Default low-stock threshold, in units.
pub const DEFAULT_LOW_STOCK_THRESHOLD: u64 = 10;

/// Default restock heuristic: 5% of on-hand stock is assumed to be incoming.
pub const DEFAULT_INCOMING_RATE: f64 = 0.05;

/// Thresholds used to classify stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryPolicy {
    /// Rows with fewer available units than this are `low`.
    pub low_stock_threshold: u64,
    /// Fraction of on-hand stock reported as incoming.
    pub incoming_rate: f64,
}

impl Default for InventoryPolicy {
    fn default() -> Self {
        Self {
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            incoming_rate: DEFAULT_INCOMING_RATE,
        }
    }
}

impl InventoryPolicy {
    pub fn classify(&self, available: u64) -> StockStatus {
        if available == 0 {
            StockStatus::OutOfStock
        } else if available < self.low_stock_threshold {
            StockStatus::Low
        } else {
            StockStatus::InStock
        }
    }

    pub fn incoming(&self, on_hand: u64) -> u64 {
        let estimate = (on_hand as f64 * self.incoming_rate).round();
        if estimate.is_finite() && estimate > 0.0 {
            estimate as u64
        } else {
            0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StockStatus {
    #[serde(rename = "out_of_stock")]
    OutOfStock,
    #[serde(rename = "low")]
    Low,
    #[serde(rename = "ok")]
    InStock,
}

impl StatusIntent for StockStatus {
    fn intent(&self) -> Intent {
        match self {
            StockStatus::OutOfStock => Intent::Danger,
            StockStatus::Low => Intent::Warning,
            StockStatus::InStock => Intent::Success,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            StockStatus::OutOfStock => "out_of_stock",
            StockStatus::Low => "low",
            StockStatus::InStock => "ok",
        }
    }
}

/// One row of the inventory table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRow {
    pub product_id: ProductId,
    pub sku: String,
    pub name: String,
    pub category: String,
    pub product_status: ProductStatus,
    pub on_hand: u64,
    pub committed: u64,
    pub available: u64,
    pub incoming: u64,
    pub status: StockStatus,
}

impl InventoryRow {
    pub fn derive(product: &Product, policy: &InventoryPolicy) -> Self {
        let on_hand = product.stock;
        let committed = product.sold_count.min(on_hand);
        let available = on_hand - committed;

        Self {
            product_id: product.id,
            sku: product.sku.clone(),
            name: product.name.clone(),
            category: product.category.clone(),
            product_status: product.status,
            on_hand,
            committed,
            available,
            incoming: policy.incoming(on_hand),
            status: policy.classify(available),
        }
    }
}

/// Derive one inventory row per product, preserving input order.
pub fn inventory_rows(products: &[Product], policy: &InventoryPolicy) -> Vec<InventoryRow> {
    let rows: Vec<InventoryRow> = products
        .iter()
        .map(|p| InventoryRow::derive(p, policy))
        .collect();
    tracing::debug!(
        products = products.len(),
        threshold = policy.low_stock_threshold,
        "derived inventory rows"
    );
    rows
}

/// Header counters shown above the inventory table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySummary {
    pub products: usize,
    pub out_of_stock: usize,
    pub low: usize,
    pub in_stock: usize,
    pub on_hand: u64,
    pub committed: u64,
    pub available: u64,
    pub incoming: u64,
}

impl InventorySummary {
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a InventoryRow>) -> Self {
        rows.into_iter().fold(Self::default(), |mut acc, row| {
            acc.products += 1;
            match row.status {
                StockStatus::OutOfStock => acc.out_of_stock += 1,
                StockStatus::Low => acc.low += 1,
                StockStatus::InStock => acc.in_stock += 1,
            }
            acc.on_hand = acc.on_hand.saturating_add(row.on_hand);
            acc.committed = acc.committed.saturating_add(row.committed);
            acc.available = acc.available.saturating_add(row.available);
            acc.incoming = acc.incoming.saturating_add(row.incoming);
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_core::{Money, RecordId};
    use chrono::Utc;

    fn test_product(stock: u64, sold_count: u64) -> Product {
        Product {
            id: ProductId::new(RecordId::new()),
            sku: "SKU-1".to_string(),
            name: "Linen Shirt".to_string(),
            thumbnail: String::new(),
            category: "apparel".to_string(),
            price: Money::new(4900, "USD"),
            stock,
            sold_count,
            status: ProductStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn available_of(available: u64) -> StockStatus {
        // sold_count = 0 so available == on_hand
        InventoryRow::derive(&test_product(available, 0), &InventoryPolicy::default()).status
    }

    #[test]
    fn status_boundaries_at_default_threshold() {
        assert_eq!(available_of(0), StockStatus::OutOfStock);
        assert_eq!(available_of(1), StockStatus::Low);
        assert_eq!(available_of(9), StockStatus::Low);
        assert_eq!(available_of(10), StockStatus::InStock);
    }

    #[test]
    fn committed_is_capped_by_on_hand() {
        let row = InventoryRow::derive(&test_product(5, 12), &InventoryPolicy::default());
        assert_eq!(row.committed, 5);
        assert_eq!(row.available, 0);
        assert_eq!(row.status, StockStatus::OutOfStock);
    }

    #[test]
    fn incoming_rounds_five_percent() {
        let policy = InventoryPolicy::default();
        assert_eq!(policy.incoming(100), 5);
        assert_eq!(policy.incoming(30), 2); // 1.5 rounds up
        assert_eq!(policy.incoming(29), 1); // 1.45
        assert_eq!(policy.incoming(0), 0);
    }

    #[test]
    fn custom_policy_moves_thresholds() {
        let policy = InventoryPolicy {
            low_stock_threshold: 25,
            incoming_rate: 0.10,
        };
        let row = InventoryRow::derive(&test_product(40, 20), &policy);
        assert_eq!(row.available, 20);
        assert_eq!(row.status, StockStatus::Low);
        assert_eq!(row.incoming, 4);
    }

    #[test]
    fn summary_of_empty_rows_is_zeroed() {
        let rows: Vec<InventoryRow> = Vec::new();
        assert_eq!(InventorySummary::from_rows(&rows), InventorySummary::default());
    }

    #[test]
    fn summary_counts_statuses() {
        let policy = InventoryPolicy::default();
        let rows = inventory_rows(
            &[test_product(0, 0), test_product(5, 0), test_product(50, 10)],
            &policy,
        );
        let summary = InventorySummary::from_rows(&rows);
        assert_eq!(summary.products, 3);
        assert_eq!(summary.out_of_stock, 1);
        assert_eq!(summary.low, 1);
        assert_eq!(summary.in_stock, 1);
        assert_eq!(summary.on_hand, 55);
        assert_eq!(summary.available, 45);
    }

    #[test]
    fn summary_totals_saturate_on_extreme_stock() {
        let policy = InventoryPolicy::default();
        let rows = inventory_rows(&[test_product(u64::MAX, 0), test_product(u64::MAX, 1)], &policy);
        let summary = InventorySummary::from_rows(&rows);
        assert_eq!(summary.products, 2);
        assert_eq!(summary.on_hand, u64::MAX);
        assert_eq!(summary.available, u64::MAX);
        assert_eq!(summary.committed, 1);
        assert_eq!(summary.in_stock, 2);
    }

    #[test]
    fn stock_status_serializes_to_dashboard_labels() {
        let json = serde_json::to_string(&StockStatus::InStock).unwrap();
        assert_eq!(json, "\"ok\"");
        assert_eq!(StockStatus::OutOfStock.label(), "out_of_stock");
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: committed never exceeds on-hand, available never goes negative.
            #[test]
            fn committed_and_available_are_bounded(
                on_hand in 0u64..1_000_000,
                sold in 0u64..1_000_000,
            ) {
                let row = InventoryRow::derive(&test_product(on_hand, sold), &InventoryPolicy::default());
                prop_assert_eq!(row.committed, sold.min(on_hand));
                prop_assert_eq!(row.available, on_hand - row.committed);
                prop_assert!(row.available <= on_hand);
            }

            /// Property: status is a function of available alone.
            #[test]
            fn status_depends_only_on_available(on_hand in 0u64..100, sold in 0u64..100) {
                let policy = InventoryPolicy::default();
                let row = InventoryRow::derive(&test_product(on_hand, sold), &policy);
                let expected = if row.available == 0 {
                    StockStatus::OutOfStock
                } else if row.available < 10 {
                    StockStatus::Low
                } else {
                    StockStatus::InStock
                };
                prop_assert_eq!(row.status, expected);
            }
        }
    }
}
