//! Filter/facet engine.
//!
//! A [`Criteria`] is a conjunction of independent predicates. Predicates are
//! pure, so evaluation order does not matter; a record is kept only if every
//! predicate accepts it. Results follow input order (this is a filter, not a
//! sort).

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use backoffice_payments::Transaction;
use backoffice_products::Product;

/// Sentinel facet value meaning "no filter".
pub const ALL: &str = "all";

/// A single side-effect-free test over a record.
pub trait Predicate<T> {
    fn matches(&self, record: &T) -> bool;
}

/// Adapts a closure into a [`Predicate`].
pub struct Where<F>(pub F);

impl<T, F> Predicate<T> for Where<F>
where
    F: Fn(&T) -> bool,
{
    fn matches(&self, record: &T) -> bool {
        (self.0)(record)
    }
}

/// Records that expose free-text fields to [`TextQuery`].
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
}

impl Searchable for Product {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.sku, &self.name, &self.category]
    }
}

impl Searchable for Transaction {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.provider, &self.method, &self.amount.currency]
    }
}

/// Case-insensitive substring match over the space-joined searchable fields.
///
/// An empty or whitespace-only query matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextQuery {
    needle: String,
}

impl TextQuery {
    pub fn new(query: &str) -> Self {
        Self {
            needle: query.trim().to_lowercase(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }
}

impl<T: Searchable> Predicate<T> for TextQuery {
    fn matches(&self, record: &T) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        record
            .search_fields()
            .join(" ")
            .to_lowercase()
            .contains(&self.needle)
    }
}

/// Selected value of a facet: either everything or one exact value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FacetValue<V> {
    All,
    Only(V),
}

impl<V> Default for FacetValue<V> {
    fn default() -> Self {
        FacetValue::All
    }
}

impl<V: FromStr> FacetValue<V> {
    /// Parse a facet selection, treating `"all"` as no filter.
    pub fn parse(raw: &str) -> Result<Self, V::Err> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case(ALL) {
            return Ok(FacetValue::All);
        }
        raw.parse().map(FacetValue::Only)
    }
}

impl<V> FacetValue<V> {
    pub fn is_all(&self) -> bool {
        matches!(self, FacetValue::All)
    }
}

impl<V> From<Option<V>> for FacetValue<V> {
    fn from(value: Option<V>) -> Self {
        value.map_or(FacetValue::All, FacetValue::Only)
    }
}

/// Exact match of an extracted field against the selected facet value.
pub struct Facet<V, F> {
    selected: FacetValue<V>,
    extract: F,
}

impl<V, F> Facet<V, F> {
    pub fn new(selected: FacetValue<V>, extract: F) -> Self {
        Self { selected, extract }
    }
}

impl<T, V, F> Predicate<T> for Facet<V, F>
where
    V: PartialEq,
    F: Fn(&T) -> V,
{
    fn matches(&self, record: &T) -> bool {
        match &self.selected {
            FacetValue::All => true,
            FacetValue::Only(v) => (self.extract)(record) == *v,
        }
    }
}

/// Compares a rounded numeric field to a target bucket (e.g. 4 stars).
pub struct RoundedEquals<F> {
    target: Option<i64>,
    extract: F,
}

impl<F> RoundedEquals<F> {
    pub fn new(target: Option<i64>, extract: F) -> Self {
        Self { target, extract }
    }
}

impl<T, F> Predicate<T> for RoundedEquals<F>
where
    F: Fn(&T) -> f64,
{
    fn matches(&self, record: &T) -> bool {
        match self.target {
            None => true,
            Some(target) => {
                let value = (self.extract)(record);
                value.is_finite() && value.round() as i64 == target
            }
        }
    }
}

/// Inclusive numeric range with optional open ends.
pub struct NumericRange<F> {
    min: Option<f64>,
    max: Option<f64>,
    extract: F,
}

impl<F> NumericRange<F> {
    pub fn new(min: Option<f64>, max: Option<f64>, extract: F) -> Self {
        Self { min, max, extract }
    }
}

impl<T, F> Predicate<T> for NumericRange<F>
where
    F: Fn(&T) -> f64,
{
    fn matches(&self, record: &T) -> bool {
        let value = (self.extract)(record);
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// Conjunction of predicates.
pub struct Criteria<'a, T> {
    predicates: Vec<Box<dyn Predicate<T> + 'a>>,
}

impl<T> Default for Criteria<'_, T> {
    fn default() -> Self {
        Self {
            predicates: Vec::new(),
        }
    }
}

impl<'a, T> Criteria<'a, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, predicate: impl Predicate<T> + 'a) -> Self {
        self.predicates.push(Box::new(predicate));
        self
    }

    /// `self ∧ other`.
    pub fn and(mut self, other: Criteria<'a, T>) -> Self {
        self.predicates.extend(other.predicates);
        self
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn matches(&self, record: &T) -> bool {
        self.predicates.iter().all(|p| p.matches(record))
    }

    pub fn apply<'r>(&self, records: impl IntoIterator<Item = &'r T>) -> Vec<&'r T>
    where
        T: 'r,
    {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }

    pub fn apply_owned(&self, records: Vec<T>) -> Vec<T> {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}
