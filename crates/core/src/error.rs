//! Domain error model.

use thiserror::Error;

/// Result type used across the aggregation layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Derived computations are total over well-typed input, so this only covers
/// caller contract violations. Missing relations and empty collections are
/// handled locally and never surface here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. a rating outside 1..=5).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Range or pagination bounds were malformed (e.g. `to < from`).
    #[error("invalid bounds: {0}")]
    InvalidBounds(String),

    /// A positional series does not line up with its calendar anchors.
    #[error("series misaligned: {anchors} anchors but {values} values")]
    SeriesMisaligned { anchors: usize, values: usize },

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_bounds(msg: impl Into<String>) -> Self {
        Self::InvalidBounds(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn misaligned(anchors: usize, values: usize) -> Self {
        Self::SeriesMisaligned { anchors, values }
    }
}
