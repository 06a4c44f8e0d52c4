//! Time-bucketing aggregator.
//!
//! Chart series are built from calendar anchors (first day of a month, or the
//! ISO Monday of a week). Values are addressed by anchor date through
//! [`KeyedSeries`], never by array position, so a series that is shorter or
//! longer than the anchor list cannot shift values into the wrong bucket.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use backoffice_core::{DomainError, DomainResult};
use backoffice_payments::Transaction;
use backoffice_products::Product;
use backoffice_reviews::Review;
use backoffice_sales::{Order, Shipment};

use crate::derived::rollup::mean;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Month,
    Week,
}

impl Granularity {
    /// `YYYY-MM` for months, ISO `YYYY-Www` for weeks.
    pub fn label(self, start: NaiveDate) -> String {
        match self {
            Granularity::Month => start.format("%Y-%m").to_string(),
            Granularity::Week => {
                let week = start.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
        }
    }

    fn step_back(self, start: NaiveDate, periods: u32) -> Option<NaiveDate> {
        match self {
            Granularity::Month => start.checked_sub_months(Months::new(periods)),
            Granularity::Week => start.checked_sub_signed(Duration::weeks(i64::from(periods))),
        }
    }
}

/// Truncate a date to the start of its bucket.
pub fn bucket_start(date: NaiveDate, granularity: Granularity) -> NaiveDate {
    match granularity {
        Granularity::Month => date.with_day(1).unwrap_or(date),
        Granularity::Week => {
            date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
        }
    }
}

/// The `count` bucket starts ending at `reference`, oldest first.
pub fn anchors(reference: NaiveDate, count: usize, granularity: Granularity) -> Vec<NaiveDate> {
    let end = bucket_start(reference, granularity);
    (0..count)
        .rev()
        .filter_map(|i| u32::try_from(i).ok())
        .filter_map(|i| granularity.step_back(end, i))
        .map(|d| bucket_start(d, granularity))
        .collect()
}

/// Inclusive date range. A range with `start > end` is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

/// Keep the anchors that fall within `range`, preserving order.
pub fn retain_in_range(anchors: &[NaiveDate], range: &DateRange) -> Vec<NaiveDate> {
    anchors.iter().copied().filter(|d| range.contains(*d)).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Values keyed by bucket start date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyedSeries {
    points: BTreeMap<NaiveDate, f64>,
}

impl KeyedSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key a positional series by its anchors.
    ///
    /// Fails instead of guessing when the lengths differ.
    pub fn from_positional(anchors: &[NaiveDate], values: &[f64]) -> DomainResult<Self> {
        if anchors.len() != values.len() {
            tracing::warn!(
                anchors = anchors.len(),
                values = values.len(),
                "rejecting misaligned positional series"
            );
            return Err(DomainError::misaligned(anchors.len(), values.len()));
        }
        Ok(anchors.iter().copied().zip(values.iter().copied()).collect())
    }

    pub fn insert(&mut self, date: NaiveDate, value: f64) {
        self.points.insert(date, value);
    }

    /// Accumulate into the bucket at `date`.
    pub fn add(&mut self, date: NaiveDate, value: f64) {
        *self.points.entry(date).or_insert(0.0) += value;
    }

    /// Value at `date`, `0.0` when absent.
    pub fn get(&self, date: NaiveDate) -> f64 {
        self.points.get(&date).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// One point per anchor, in anchor order.
    pub fn project(&self, anchors: &[NaiveDate]) -> Vec<SeriesPoint> {
        anchors
            .iter()
            .map(|&date| SeriesPoint {
                date,
                value: self.get(date),
            })
            .collect()
    }
}

impl FromIterator<(NaiveDate, f64)> for KeyedSeries {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, f64)>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

pub fn totals(points: &[SeriesPoint]) -> f64 {
    points.iter().map(|p| p.value).sum()
}

/// Sum over a trailing window of `window` points (including the current one).
pub fn rolling_sum(points: &[SeriesPoint], window: usize) -> DomainResult<Vec<SeriesPoint>> {
    if window == 0 {
        return Err(DomainError::validation("rolling window must be at least 1"));
    }
    Ok(points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let from = (i + 1).saturating_sub(window);
            SeriesPoint {
                date: p.date,
                value: totals(&points[from..=i]),
            }
        })
        .collect())
}

/// Running total.
pub fn cumulative(points: &[SeriesPoint]) -> Vec<SeriesPoint> {
    points
        .iter()
        .scan(0.0, |acc, p| {
            *acc += p.value;
            Some(SeriesPoint {
                date: p.date,
                value: *acc,
            })
        })
        .collect()
}

/// Records that can be placed on a calendar.
pub trait Timestamped {
    fn timestamp(&self) -> DateTime<Utc>;
}

impl Timestamped for Order {
    fn timestamp(&self) -> DateTime<Utc> {
        self.ordered_at
    }
}

impl Timestamped for Review {
    fn timestamp(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Timestamped for Transaction {
    fn timestamp(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Timestamped for Shipment {
    fn timestamp(&self) -> DateTime<Utc> {
        self.dispatched_or_created()
    }
}

impl Timestamped for Product {
    fn timestamp(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reduce {
    Sum,
    Average,
}

/// A named numeric field reduced per bucket.
pub struct FieldSpec<T> {
    pub name: &'static str,
    pub reduce: Reduce,
    pub value: fn(&T) -> f64,
}

impl<T> FieldSpec<T> {
    pub fn sum(name: &'static str, value: fn(&T) -> f64) -> Self {
        Self {
            name,
            reduce: Reduce::Sum,
            value,
        }
    }

    pub fn average(name: &'static str, value: fn(&T) -> f64) -> Self {
        Self {
            name,
            reduce: Reduce::Average,
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBucket {
    pub label: String,
    pub start: NaiveDate,
    /// Number of records that fell into the bucket.
    pub count: usize,
    pub fields: BTreeMap<String, f64>,
}

impl TimeBucket {
    pub fn field(&self, name: &str) -> f64 {
        self.fields.get(name).copied().unwrap_or(0.0)
    }
}

/// Group records into the given anchors and reduce each field per bucket.
///
/// Records outside every anchor are ignored. Every anchor yields a bucket,
/// empty ones with zeroed fields.
pub fn bucket_records<'a, T>(
    records: impl IntoIterator<Item = &'a T>,
    anchors: &[NaiveDate],
    granularity: Granularity,
    fields: &[FieldSpec<T>],
) -> Vec<TimeBucket>
where
    T: Timestamped + 'a,
{
    let mut acc: BTreeMap<NaiveDate, (usize, Vec<f64>)> = anchors
        .iter()
        .map(|&d| (d, (0, vec![0.0; fields.len()])))
        .collect();

    let mut seen = 0usize;
    for record in records {
        seen += 1;
        let key = bucket_start(record.timestamp().date_naive(), granularity);
        if let Some((count, sums)) = acc.get_mut(&key) {
            *count += 1;
            for (sum, spec) in sums.iter_mut().zip(fields) {
                *sum += (spec.value)(record);
            }
        }
    }
    tracing::debug!(records = seen, buckets = anchors.len(), "bucketed records");

    anchors
        .iter()
        .map(|&start| {
            let (count, sums) = acc.get(&start).cloned().unwrap_or((0, vec![0.0; fields.len()]));
            let fields = fields
                .iter()
                .zip(sums)
                .map(|(spec, sum)| {
                    let value = match spec.reduce {
                        Reduce::Sum => sum,
                        Reduce::Average => mean(sum, count),
                    };
                    (spec.name.to_string(), value)
                })
                .collect();
            TimeBucket {
                label: granularity.label(start),
                start,
                count,
                fields,
            }
        })
        .collect()
}

/// Lift one field of a bucket list into a keyed series.
pub fn series_of(buckets: &[TimeBucket], field: &str) -> KeyedSeries {
    buckets.iter().map(|b| (b.start, b.field(field))).collect()
}
