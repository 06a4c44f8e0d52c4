use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use backoffice_core::{Entity, Intent, StatusIntent, record_id};

use crate::order::OrderId;

record_id!(
    /// Shipment identifier.
    ShipmentId
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    Pending,
    InTransit,
    Delivered,
    Returned,
}

impl StatusIntent for ShipmentStatus {
    fn intent(&self) -> Intent {
        match self {
            ShipmentStatus::Pending => Intent::Neutral,
            ShipmentStatus::InTransit => Intent::Info,
            ShipmentStatus::Delivered => Intent::Success,
            ShipmentStatus::Returned => Intent::Danger,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ShipmentStatus::Pending => "pending",
            ShipmentStatus::InTransit => "in_transit",
            ShipmentStatus::Delivered => "delivered",
            ShipmentStatus::Returned => "returned",
        }
    }
}

/// Outbound shipment for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
    pub id: ShipmentId,
    pub order_id: OrderId,
    pub carrier: String,
    #[serde(default)]
    pub tracking_number: String,
    pub status: ShipmentStatus,
    pub created_at: DateTime<Utc>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
}

impl Shipment {
    /// Dispatch time, or creation time for shipments not yet handed over.
    pub fn dispatched_or_created(&self) -> DateTime<Utc> {
        self.shipped_at.unwrap_or(self.created_at)
    }

    /// Whole days between dispatch and delivery, when both are known.
    pub fn transit_days(&self) -> Option<i64> {
        match (self.shipped_at, self.delivered_at) {
            (Some(s), Some(d)) if d >= s => Some((d - s).num_days()),
            _ => None,
        }
    }
}

impl Entity for Shipment {
    type Id = ShipmentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
