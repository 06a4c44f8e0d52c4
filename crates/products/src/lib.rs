//! Products domain module.
//!
//! Catalog records as loaded from fixtures. Records are read-only; derived
//! inventory figures live in `backoffice-metrics`.

pub mod product;

pub use product::{Product, ProductId, ProductStatus};
