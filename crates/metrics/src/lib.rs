//! Derived metrics for the back-office dashboard.
//!
//! Everything in this crate is a pure, synchronous function of its inputs:
//! record collections go in, view models (inventory rows, faceted lists,
//! chart series, page windows, rollups) come out. Nothing here performs IO or
//! holds process-wide state; callers own the snapshots and the
//! [`board::ReviewBoard`] state container.

pub mod board;
pub mod buckets;
pub mod config;
pub mod debounce;
pub mod derived;
pub mod filter;
pub mod normalize;
pub mod paginate;

pub use board::{BoardAction, ReviewBoard};
pub use buckets::{
    DateRange, FieldSpec, Granularity, KeyedSeries, Reduce, SeriesPoint, TimeBucket, Timestamped,
    anchors, bucket_records, bucket_start, cumulative, retain_in_range, rolling_sum, series_of,
    totals,
};
pub use config::MetricsConfig;
pub use debounce::SearchDebounce;
pub use derived::{
    CustomerScore, InventoryPolicy, InventoryRow, InventorySummary, OrderSummary, ProductRating,
    ReviewSummary, RfmPolicy, Segment, ShipmentSummary, StockStatus, TransactionSummary,
    inventory_rows, product_ratings, rfm_scores,
};
pub use filter::{
    Criteria, Facet, FacetValue, NumericRange, Predicate, RoundedEquals, Searchable, TextQuery,
    Where,
};
pub use normalize::{Lookup, Normalizer, OrderRow, ReviewRow};
pub use paginate::{PageWindow, paginate, paginate_with};
