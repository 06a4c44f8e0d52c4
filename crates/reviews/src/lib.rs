//! Reviews domain module: product reviews awaiting or past moderation.

pub mod review;

pub use review::{Rating, Review, ReviewId, ReviewStatus};
