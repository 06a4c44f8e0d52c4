//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Every fixture record implements this so lookup maps can be keyed by id
/// without per-collection glue.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
