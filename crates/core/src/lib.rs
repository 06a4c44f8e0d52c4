//! `backoffice-core`: shared building blocks for back-office records.
//!
//! This crate contains **pure domain** primitives (no IO, no rendering).

pub mod entity;
pub mod error;
pub mod id;
pub mod intent;
pub mod money;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::RecordId;
pub use intent::{Intent, StatusIntent};
pub use money::Money;
pub use value_object::ValueObject;
