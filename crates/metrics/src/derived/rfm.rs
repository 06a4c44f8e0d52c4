//! RFM-like customer scoring (recency, frequency, monetary).
//!
//! Each dimension is scored 1..=5 against four ascending band edges. Only
//! orders that count as revenue contribute.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use backoffice_core::{DomainError, DomainResult};
use backoffice_parties::CustomerId;
use backoffice_sales::Order;

/// Band edges for the three RFM dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RfmPolicy {
    /// Days since last order; `<= edge[0]` scores 5, beyond `edge[3]` scores 1.
    pub recency_days: [i64; 4],
    /// Order counts; `<= edge[0]` scores 1, above `edge[3]` scores 5.
    pub frequency: [u64; 4],
    /// Lifetime spend in minor units, banded like `frequency`.
    pub monetary: [i64; 4],
}

impl Default for RfmPolicy {
    fn default() -> Self {
        Self {
            recency_days: [30, 90, 180, 365],
            frequency: [1, 2, 4, 8],
            monetary: [5_000, 20_000, 50_000, 100_000],
        }
    }
}

impl RfmPolicy {
    pub fn validate(&self) -> DomainResult<()> {
        fn ascending<T: PartialOrd>(edges: &[T]) -> bool {
            edges.windows(2).all(|w| w[0] < w[1])
        }
        if !ascending(&self.recency_days) {
            return Err(DomainError::validation("rfm recency bands must be strictly ascending"));
        }
        if !ascending(&self.frequency) {
            return Err(DomainError::validation("rfm frequency bands must be strictly ascending"));
        }
        if !ascending(&self.monetary) {
            return Err(DomainError::validation("rfm monetary bands must be strictly ascending"));
        }
        Ok(())
    }

    fn recency_score(&self, days: i64) -> u8 {
        5 - self.recency_days.iter().filter(|&&edge| days > edge).count() as u8
    }

    fn frequency_score(&self, orders: u64) -> u8 {
        1 + self.frequency.iter().filter(|&&edge| orders > edge).count() as u8
    }

    fn monetary_score(&self, spend: i64) -> u8 {
        1 + self.monetary.iter().filter(|&&edge| spend > edge).count() as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    Champion,
    Loyal,
    New,
    Promising,
    AtRisk,
    Hibernating,
}

impl Segment {
    fn classify(recency: u8, frequency: u8, monetary: u8) -> Self {
        match (recency, frequency, monetary) {
            (r, f, _) if r >= 4 && f >= 4 => Segment::Champion,
            (r, f, _) if r >= 3 && f >= 3 => Segment::Loyal,
            (r, 1, _) if r >= 4 => Segment::New,
            (r, _, _) if r >= 3 => Segment::Promising,
            (_, f, m) if f >= 3 || m >= 4 => Segment::AtRisk,
            _ => Segment::Hibernating,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerScore {
    pub customer_id: CustomerId,
    pub last_order_at: DateTime<Utc>,
    pub recency_days: i64,
    pub orders: u64,
    pub spend: i64,
    pub recency: u8,
    pub frequency: u8,
    pub monetary: u8,
    pub segment: Segment,
}

/// Score every customer with at least one revenue order, ordered by customer id.
pub fn rfm_scores<'a>(
    orders: impl IntoIterator<Item = &'a Order>,
    as_of: DateTime<Utc>,
    policy: &RfmPolicy,
) -> Vec<CustomerScore> {
    let mut per_customer: BTreeMap<CustomerId, (DateTime<Utc>, u64, i64)> = BTreeMap::new();
    for order in orders {
        if !order.status.is_revenue() {
            continue;
        }
        per_customer
            .entry(order.customer_id)
            .and_modify(|(last, count, spend)| {
                *last = (*last).max(order.ordered_at);
                *count += 1;
                *spend += order.total_price.amount;
            })
            .or_insert((order.ordered_at, 1, order.total_price.amount));
    }

    per_customer
        .into_iter()
        .map(|(customer_id, (last_order_at, orders, spend))| {
            let recency_days = (as_of - last_order_at).num_days().max(0);
            let recency = policy.recency_score(recency_days);
            let frequency = policy.frequency_score(orders);
            let monetary = policy.monetary_score(spend);
            CustomerScore {
                customer_id,
                last_order_at,
                recency_days,
                orders,
                spend,
                recency,
                frequency,
                monetary,
                segment: Segment::classify(recency, frequency, monetary),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_core::{Money, RecordId};
    use backoffice_sales::{OrderId, OrderStatus};
    use chrono::{Duration, TimeZone};

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap()
    }

    fn test_order(customer_id: CustomerId, days_ago: i64, total: i64, status: OrderStatus) -> Order {
        Order {
            id: OrderId::new(RecordId::new()),
            order_number: "#1".to_string(),
            customer_id,
            customer_email: String::new(),
            status,
            items: Vec::new(),
            total_price: Money::new(total, "USD"),
            ordered_at: as_of() - Duration::days(days_ago),
        }
    }

    #[test]
    fn scores_follow_band_edges() {
        let policy = RfmPolicy::default();
        assert_eq!(policy.recency_score(0), 5);
        assert_eq!(policy.recency_score(30), 5);
        assert_eq!(policy.recency_score(31), 4);
        assert_eq!(policy.recency_score(400), 1);
        assert_eq!(policy.frequency_score(1), 1);
        assert_eq!(policy.frequency_score(2), 2);
        assert_eq!(policy.frequency_score(9), 5);
        assert_eq!(policy.monetary_score(100_001), 5);
    }

    #[test]
    fn frequent_recent_customer_is_champion() {
        let c = CustomerId::new(RecordId::new());
        let orders: Vec<Order> = (0..6)
            .map(|i| test_order(c, i * 5, 20_000, OrderStatus::Paid))
            .collect();
        let scores = rfm_scores(&orders, as_of(), &RfmPolicy::default());
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].orders, 6);
        assert_eq!(scores[0].recency_days, 0);
        assert_eq!(scores[0].spend, 120_000);
        assert_eq!(scores[0].segment, Segment::Champion);
    }

    #[test]
    fn single_recent_order_is_new() {
        let c = CustomerId::new(RecordId::new());
        let orders = vec![test_order(c, 3, 1_000, OrderStatus::Pending)];
        let scores = rfm_scores(&orders, as_of(), &RfmPolicy::default());
        assert_eq!(scores[0].segment, Segment::New);
    }

    #[test]
    fn lapsed_big_spender_is_at_risk() {
        let c = CustomerId::new(RecordId::new());
        let orders = vec![
            test_order(c, 300, 60_000, OrderStatus::Shipped),
            test_order(c, 400, 10_000, OrderStatus::Shipped),
        ];
        let scores = rfm_scores(&orders, as_of(), &RfmPolicy::default());
        assert_eq!(scores[0].recency, 2);
        assert_eq!(scores[0].segment, Segment::AtRisk);
    }

    #[test]
    fn cancelled_only_customers_are_not_scored() {
        let c = CustomerId::new(RecordId::new());
        let orders = vec![test_order(c, 1, 5_000, OrderStatus::Cancelled)];
        assert!(rfm_scores(&orders, as_of(), &RfmPolicy::default()).is_empty());
    }

    #[test]
    fn validate_rejects_unsorted_bands() {
        let policy = RfmPolicy {
            frequency: [1, 4, 2, 8],
            ..RfmPolicy::default()
        };
        assert!(matches!(policy.validate(), Err(DomainError::Validation(_))));
        assert!(RfmPolicy::default().validate().is_ok());
    }
}
