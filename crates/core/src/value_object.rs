//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have **no identity**: two instances with the same attribute
/// values are interchangeable. `Money`, `Rating` and derived view rows are
/// value objects; fixture records with an id are entities.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
