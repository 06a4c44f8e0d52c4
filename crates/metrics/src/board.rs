//! Review moderation board.
//!
//! Explicit, caller-owned state for the review list: the review collection
//! plus the current filter inputs. Views are recomputed from this state on
//! demand; nothing is cached and nothing is global.

use backoffice_reviews::{Review, ReviewId, ReviewStatus};

use crate::derived::ReviewSummary;
use crate::filter::{Criteria, Facet, FacetValue, RoundedEquals, TextQuery};
use crate::normalize::{Normalizer, ReviewRow};

/// State transitions for the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardAction {
    SetQuery(String),
    SetStatus(FacetValue<ReviewStatus>),
    SetRating(Option<u8>),
    Remove(ReviewId),
    Moderate { id: ReviewId, status: ReviewStatus },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewBoard {
    reviews: Vec<Review>,
    query: String,
    status: FacetValue<ReviewStatus>,
    rating: Option<u8>,
}

impl ReviewBoard {
    pub fn new(reviews: Vec<Review>) -> Self {
        Self {
            reviews,
            ..Self::default()
        }
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn status(&self) -> &FacetValue<ReviewStatus> {
        &self.status
    }

    pub fn rating(&self) -> Option<u8> {
        self.rating
    }

    /// Evolve state from a single action.
    pub fn apply(&mut self, action: &BoardAction) {
        match action {
            BoardAction::SetQuery(q) => self.query = q.clone(),
            BoardAction::SetStatus(s) => self.status = s.clone(),
            BoardAction::SetRating(r) => self.rating = *r,
            BoardAction::Remove(id) => {
                let before = self.reviews.len();
                self.reviews.retain(|r| r.id != *id);
                if self.reviews.len() == before {
                    tracing::debug!(review = %id, "remove ignored: unknown review");
                }
            }
            BoardAction::Moderate { id, status } => {
                match self.reviews.iter_mut().find(|r| r.id == *id) {
                    Some(review) => review.status = *status,
                    None => tracing::debug!(review = %id, "moderation ignored: unknown review"),
                }
            }
        }
    }

    /// Criteria built from the current filter inputs.
    pub fn criteria(&self) -> Criteria<'static, ReviewRow> {
        Criteria::new()
            .with(TextQuery::new(&self.query))
            .with(Facet::new(self.status.clone(), |r: &ReviewRow| r.status))
            .with(RoundedEquals::new(self.rating.map(i64::from), |r: &ReviewRow| {
                f64::from(r.rating.get())
            }))
    }

    /// Rows that pass the current filters, in collection order.
    pub fn visible(&self, normalizer: &Normalizer<'_>) -> Vec<ReviewRow> {
        let rows = normalizer.review_rows(&self.reviews);
        let visible = self.criteria().apply_owned(rows);
        tracing::debug!(
            total = self.reviews.len(),
            visible = visible.len(),
            "recomputed review board"
        );
        visible
    }

    /// Header counters over the whole collection, independent of filters.
    pub fn summary(&self) -> ReviewSummary {
        ReviewSummary::from_reviews(&self.reviews)
    }
}
