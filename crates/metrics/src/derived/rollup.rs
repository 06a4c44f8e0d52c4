//! Single-pass rollups over record collections.
//!
//! Every rollup folds once over its input and yields zeroed values for an
//! empty collection. Averages guard against division by zero.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use backoffice_payments::{Transaction, TransactionStatus};
use backoffice_products::ProductId;
use backoffice_reviews::{Review, ReviewStatus};
use backoffice_sales::{Order, OrderStatus, Shipment, ShipmentStatus};

/// `sum / count`, or `0.0` when there is nothing to average.
pub(crate) fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 { 0.0 } else { sum / count as f64 }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewSummary {
    pub total: usize,
    pub average_rating: f64,
    pub by_status: BTreeMap<ReviewStatus, usize>,
    /// Histogram indexed by `rating - 1`.
    pub by_rating: [usize; 5],
}

impl ReviewSummary {
    pub fn from_reviews<'a>(reviews: impl IntoIterator<Item = &'a Review>) -> Self {
        let (mut summary, sum) =
            reviews
                .into_iter()
                .fold((Self::default(), 0u64), |(mut acc, sum), review| {
                    let rating = review.rating.get();
                    acc.total += 1;
                    *acc.by_status.entry(review.status).or_default() += 1;
                    acc.by_rating[usize::from(rating - 1)] += 1;
                    (acc, sum + u64::from(rating))
                });
        summary.average_rating = mean(sum as f64, summary.total);
        summary
    }

    pub fn count(&self, status: ReviewStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

/// Average rating of a single product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRating {
    pub product_id: ProductId,
    pub reviews: usize,
    pub average: f64,
}

/// Per-product average rating, ordered by product id.
///
/// Only `published` reviews count towards the storefront rating.
pub fn product_ratings<'a>(reviews: impl IntoIterator<Item = &'a Review>) -> Vec<ProductRating> {
    let mut acc: BTreeMap<ProductId, (usize, u64)> = BTreeMap::new();
    for review in reviews {
        if review.status != ReviewStatus::Published {
            continue;
        }
        let entry = acc.entry(review.product_id).or_default();
        entry.0 += 1;
        entry.1 += u64::from(review.rating.get());
    }
    acc.into_iter()
        .map(|(product_id, (count, sum))| ProductRating {
            product_id,
            reviews: count,
            average: mean(sum as f64, count),
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub total: usize,
    /// Revenue in minor units, excluding cancelled and refunded orders.
    pub revenue: i64,
    pub revenue_orders: usize,
    pub average_order_value: f64,
    pub units_sold: u64,
    /// Orders with line items whose subtotals do not add up to the order total.
    pub mismatched_totals: usize,
    pub by_status: BTreeMap<OrderStatus, usize>,
}

impl OrderSummary {
    pub fn from_orders<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Self {
        let mut summary = orders.into_iter().fold(Self::default(), |mut acc, order| {
            acc.total += 1;
            *acc.by_status.entry(order.status).or_default() += 1;
            if !order.items.is_empty() && order.items_subtotal() != order.total_price.amount {
                tracing::debug!(
                    order = %order.order_number,
                    total = order.total_price.amount,
                    lines = order.items_subtotal(),
                    "order total does not match line items"
                );
                acc.mismatched_totals += 1;
            }
            if order.status.is_revenue() {
                acc.revenue += order.total_price.amount;
                acc.revenue_orders += 1;
                acc.units_sold += order.item_count();
            }
            acc
        });
        summary.average_order_value = mean(summary.revenue as f64, summary.revenue_orders);
        summary
    }

    pub fn count(&self, status: OrderStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub total: usize,
    pub gross: i64,
    pub fees: i64,
    pub net: i64,
    pub refunded: i64,
    pub disputed: usize,
    pub by_status: BTreeMap<TransactionStatus, usize>,
}

impl TransactionSummary {
    /// Failed transactions are counted by status but excluded from money totals.
    pub fn from_transactions<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        transactions.into_iter().fold(Self::default(), |mut acc, tx| {
            acc.total += 1;
            *acc.by_status.entry(tx.status).or_default() += 1;
            if tx.status != TransactionStatus::Failed {
                acc.gross += tx.amount.gross;
                acc.fees += tx.amount.fee;
                acc.net += tx.amount.net;
            }
            acc.refunded += tx.refunded_total();
            if tx.is_disputed() {
                acc.disputed += 1;
            }
            acc
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShipmentSummary {
    pub total: usize,
    pub delivered: usize,
    /// Mean whole days from dispatch to delivery, over shipments with both dates.
    pub average_transit_days: f64,
    pub by_status: BTreeMap<ShipmentStatus, usize>,
}

impl ShipmentSummary {
    pub fn from_shipments<'a>(shipments: impl IntoIterator<Item = &'a Shipment>) -> Self {
        let (mut summary, days) =
            shipments
                .into_iter()
                .fold((Self::default(), 0i64), |(mut acc, days), shipment| {
                    acc.total += 1;
                    *acc.by_status.entry(shipment.status).or_default() += 1;
                    match shipment.transit_days() {
                        Some(d) => {
                            acc.delivered += 1;
                            (acc, days + d)
                        }
                        None => (acc, days),
                    }
                });
        summary.average_transit_days = mean(days as f64, summary.delivered);
        summary
    }

    pub fn count(&self, status: ShipmentStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_core::{Money, RecordId};
    use backoffice_parties::CustomerId;
    use backoffice_payments::{Refund, TransactionAmount, TransactionId};
    use backoffice_reviews::{Rating, ReviewId};
    use backoffice_sales::{OrderId, OrderLine, ShipmentId};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn test_review(product_id: ProductId, rating: u8, status: ReviewStatus) -> Review {
        Review {
            id: ReviewId::new(RecordId::new()),
            product_id,
            customer_id: CustomerId::new(RecordId::new()),
            rating: Rating::new(rating).unwrap(),
            status,
            title: String::new(),
            body: String::new(),
            created_at: Utc::now(),
        }
    }

    fn test_order(status: OrderStatus, total: i64, quantity: u32) -> Order {
        Order {
            id: OrderId::new(RecordId::new()),
            order_number: "#1".to_string(),
            customer_id: CustomerId::new(RecordId::new()),
            customer_email: String::new(),
            status,
            items: vec![OrderLine {
                product_id: ProductId::new(RecordId::new()),
                quantity,
                unit_price: Money::new(total, "USD"),
                subtotal: Money::new(total, "USD"),
            }],
            total_price: Money::new(total, "USD"),
            ordered_at: Utc::now(),
        }
    }

    fn test_shipment(status: ShipmentStatus, transit: Option<i64>) -> Shipment {
        let shipped = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let delivered: Option<DateTime<Utc>> = transit.map(|d| shipped + Duration::days(d));
        Shipment {
            id: ShipmentId::new(RecordId::new()),
            order_id: OrderId::new(RecordId::new()),
            carrier: "DHL".to_string(),
            tracking_number: String::new(),
            status,
            created_at: shipped,
            shipped_at: Some(shipped),
            delivered_at: delivered,
        }
    }

    fn test_transaction(status: TransactionStatus, gross: i64, fee: i64) -> Transaction {
        Transaction {
            id: TransactionId::new(RecordId::new()),
            order_id: None,
            provider: "stripe".to_string(),
            method: "card".to_string(),
            amount: TransactionAmount {
                gross,
                fee,
                net: gross - fee,
                currency: "USD".to_string(),
            },
            status,
            created_at: Utc::now(),
            authorized_at: None,
            captured_at: None,
            settled_at: None,
            refunds: Vec::new(),
            dispute: None,
        }
    }

    #[test]
    fn average_rating_of_empty_collection_is_zero() {
        let summary = ReviewSummary::from_reviews(&Vec::<Review>::new());
        assert_eq!(summary.total, 0);
        assert_eq!(summary.average_rating, 0.0);
        assert!(!summary.average_rating.is_nan());
        assert_eq!(summary.by_rating, [0; 5]);
    }

    #[test]
    fn review_summary_counts_in_one_pass() {
        let p = ProductId::new(RecordId::new());
        let reviews = vec![
            test_review(p, 5, ReviewStatus::Published),
            test_review(p, 4, ReviewStatus::Published),
            test_review(p, 1, ReviewStatus::Flagged),
            test_review(p, 4, ReviewStatus::Pending),
        ];
        let summary = ReviewSummary::from_reviews(&reviews);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.average_rating, 3.5);
        assert_eq!(summary.count(ReviewStatus::Published), 2);
        assert_eq!(summary.count(ReviewStatus::Rejected), 0);
        assert_eq!(summary.by_rating, [1, 0, 0, 2, 1]);
    }

    #[test]
    fn product_ratings_only_use_published_reviews() {
        let a = ProductId::new(RecordId::new());
        let b = ProductId::new(RecordId::new());
        let reviews = vec![
            test_review(a, 5, ReviewStatus::Published),
            test_review(a, 2, ReviewStatus::Published),
            test_review(a, 1, ReviewStatus::Rejected),
            test_review(b, 3, ReviewStatus::Pending),
        ];
        let ratings = product_ratings(&reviews);
        assert_eq!(ratings.len(), 1);
        assert_eq!(ratings[0].product_id, a);
        assert_eq!(ratings[0].reviews, 2);
        assert_eq!(ratings[0].average, 3.5);
    }

    #[test]
    fn order_summary_excludes_cancelled_from_revenue() {
        let orders = vec![
            test_order(OrderStatus::Paid, 10_000, 2),
            test_order(OrderStatus::Shipped, 5_000, 1),
            test_order(OrderStatus::Cancelled, 99_999, 9),
        ];
        let summary = OrderSummary::from_orders(&orders);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.revenue, 15_000);
        assert_eq!(summary.revenue_orders, 2);
        assert_eq!(summary.average_order_value, 7_500.0);
        assert_eq!(summary.units_sold, 3);
        assert_eq!(summary.count(OrderStatus::Cancelled), 1);
    }

    #[test]
    fn order_summary_of_nothing_is_zeroed() {
        let summary = OrderSummary::from_orders(&Vec::<Order>::new());
        assert_eq!(summary, OrderSummary::default());
    }

    #[test]
    fn order_summary_flags_totals_that_disagree_with_lines() {
        let mut discounted = test_order(OrderStatus::Paid, 4_000, 1);
        discounted.total_price = Money::new(3_500, "USD");
        let mut no_lines = test_order(OrderStatus::Paid, 1_000, 1);
        no_lines.items.clear();
        let orders = vec![test_order(OrderStatus::Paid, 2_000, 1), discounted, no_lines];

        let summary = OrderSummary::from_orders(&orders);
        assert_eq!(summary.mismatched_totals, 1);
        assert_eq!(summary.revenue, 6_500);
    }

    #[test]
    fn shipment_summary_averages_transit_of_delivered_only() {
        let shipments = vec![
            test_shipment(ShipmentStatus::Delivered, Some(2)),
            test_shipment(ShipmentStatus::Delivered, Some(5)),
            test_shipment(ShipmentStatus::InTransit, None),
            test_shipment(ShipmentStatus::Returned, None),
        ];
        let summary = ShipmentSummary::from_shipments(&shipments);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.delivered, 2);
        assert_eq!(summary.average_transit_days, 3.5);
        assert_eq!(summary.count(ShipmentStatus::Delivered), 2);
        assert_eq!(summary.count(ShipmentStatus::Pending), 0);
    }

    #[test]
    fn shipment_summary_without_deliveries_is_zero() {
        let summary = ShipmentSummary::from_shipments(&[test_shipment(ShipmentStatus::Pending, None)]);
        assert_eq!(summary.delivered, 0);
        assert_eq!(summary.average_transit_days, 0.0);
        assert_eq!(ShipmentSummary::from_shipments(&Vec::<Shipment>::new()), ShipmentSummary::default());
    }

    #[test]
    fn transaction_summary_sums_money_and_refunds() {
        let mut refunded = test_transaction(TransactionStatus::Refunded, 2_000, 60);
        refunded.refunds.push(Refund {
            amount: 2_000,
            reason: String::new(),
            created_at: Utc::now(),
        });
        let txs = vec![
            test_transaction(TransactionStatus::Settled, 10_000, 300),
            test_transaction(TransactionStatus::Failed, 7_000, 0),
            refunded,
        ];
        let summary = TransactionSummary::from_transactions(&txs);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.gross, 12_000);
        assert_eq!(summary.fees, 360);
        assert_eq!(summary.net, 11_640);
        assert_eq!(summary.refunded, 2_000);
        assert_eq!(summary.disputed, 0);
        assert_eq!(summary.by_status.get(&TransactionStatus::Failed), Some(&1));
    }
}
