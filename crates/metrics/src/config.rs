//! Metrics configuration.
//!
//! Defaults reproduce the dashboard's fixed policy (low stock below 10 units,
//! 5% incoming estimate, 5 page buttons, 300 ms search debounce). Overrides
//! come from JSON or `BACKOFFICE_*` environment variables.

use core::str::FromStr;
use std::time::Duration;

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};

use backoffice_core::{DomainError, DomainResult};

use crate::debounce::{DEFAULT_SEARCH_DEBOUNCE, SearchDebounce};
use crate::derived::{InventoryPolicy, RfmPolicy};
use crate::paginate::{DEFAULT_PAGE_BUTTONS, PageWindow, paginate_with};

pub const ENV_LOW_STOCK_THRESHOLD: &str = "BACKOFFICE_LOW_STOCK_THRESHOLD";
pub const ENV_INCOMING_RATE: &str = "BACKOFFICE_INCOMING_RATE";
pub const ENV_PAGE_BUTTONS: &str = "BACKOFFICE_PAGE_BUTTONS";
pub const ENV_SEARCH_DEBOUNCE_MS: &str = "BACKOFFICE_SEARCH_DEBOUNCE_MS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub inventory: InventoryPolicy,
    pub rfm: RfmPolicy,
    pub page_buttons: usize,
    pub search_debounce_ms: u64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            inventory: InventoryPolicy::default(),
            rfm: RfmPolicy::default(),
            page_buttons: DEFAULT_PAGE_BUTTONS,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE.as_millis() as u64,
        }
    }
}

impl MetricsConfig {
    /// Parse a JSON document; missing fields keep their defaults.
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(raw).context("invalid metrics config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `BACKOFFICE_*` environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`MetricsConfig::from_env`], reading variables through `get`.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(v) = parse_var::<u64>(&get, ENV_LOW_STOCK_THRESHOLD)? {
            config.inventory.low_stock_threshold = v;
        }
        if let Some(v) = parse_var::<f64>(&get, ENV_INCOMING_RATE)? {
            config.inventory.incoming_rate = v;
        }
        if let Some(v) = parse_var::<usize>(&get, ENV_PAGE_BUTTONS)? {
            config.page_buttons = v;
        }
        if let Some(v) = parse_var::<u64>(&get, ENV_SEARCH_DEBOUNCE_MS)? {
            config.search_debounce_ms = v;
        }

        config.validate()?;
        tracing::info!(
            low_stock_threshold = config.inventory.low_stock_threshold,
            incoming_rate = config.inventory.incoming_rate,
            page_buttons = config.page_buttons,
            search_debounce_ms = config.search_debounce_ms,
            "metrics config loaded"
        );
        Ok(config)
    }

    pub fn validate(&self) -> DomainResult<()> {
        let rate = self.inventory.incoming_rate;
        if !(rate.is_finite() && rate >= 0.0) {
            return Err(DomainError::validation(format!(
                "incoming_rate must be a finite non-negative number, got {rate}"
            )));
        }
        if self.page_buttons == 0 {
            return Err(DomainError::validation("page_buttons must be at least 1"));
        }
        self.rfm.validate()
    }

    /// Debouncer for the search box, using the configured quiet period.
    pub fn search_debounce(&self) -> SearchDebounce {
        SearchDebounce::new(Duration::from_millis(self.search_debounce_ms))
    }

    /// [`paginate_with`] capped at the configured number of page buttons.
    pub fn paginate(&self, from: i64, to: i64, total: i64) -> DomainResult<PageWindow> {
        paginate_with(from, to, total, self.page_buttons)
    }
}

fn parse_var<T>(get: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: core::fmt::Display,
{
    let Some(raw) = get(key) else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        tracing::warn!(key, "empty value; keeping default");
        return Ok(None);
    }
    raw.parse::<T>()
        .map(Some)
        .map_err(|e| anyhow!("{key}={raw:?}: {e}"))
}
