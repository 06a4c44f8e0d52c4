//! Sales domain module: orders and their shipments.

pub mod order;
pub mod shipment;

pub use order::{Order, OrderId, OrderLine, OrderStatus};
pub use shipment::{Shipment, ShipmentId, ShipmentStatus};
