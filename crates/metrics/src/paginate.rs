//! Pagination helper: page windows from 1-based inclusive item bounds.

use serde::{Deserialize, Serialize};

use backoffice_core::{DomainError, DomainResult};

/// Numbered page buttons shown at most, not counting the separate last page.
pub const DEFAULT_PAGE_BUTTONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    /// First item shown, 1-based.
    pub from: u64,
    /// Last item shown, 1-based, inclusive.
    pub to: u64,
    pub total: u64,
    pub items_per_page: u64,
    pub current_page: u64,
    pub total_pages: u64,
    /// Numbered page buttons, ascending.
    pub displayable_pages: Vec<u64>,
    /// Final page, when it is not already among `displayable_pages`.
    pub last_page: Option<u64>,
}

impl PageWindow {
    /// 0-based index of the first item on this page.
    pub fn offset(&self) -> usize {
        usize::try_from(self.from - 1).unwrap_or(usize::MAX)
    }

    /// The items of `records` that fall on this page.
    pub fn slice<'a, T>(&self, records: &'a [T]) -> &'a [T] {
        let start = self.offset().min(records.len());
        let len = usize::try_from(self.items_per_page).unwrap_or(usize::MAX);
        let end = start.saturating_add(len).min(records.len());
        &records[start..end]
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// Page window for items `from..=to` out of `total`, with the default button cap.
pub fn paginate(from: i64, to: i64, total: i64) -> DomainResult<PageWindow> {
    paginate_with(from, to, total, DEFAULT_PAGE_BUTTONS)
}

pub fn paginate_with(from: i64, to: i64, total: i64, max_buttons: usize) -> DomainResult<PageWindow> {
    if from < 1 {
        tracing::warn!(from, "rejecting pagination bounds");
        return Err(DomainError::invalid_bounds(format!("from must be >= 1, got {from}")));
    }
    if to < from {
        tracing::warn!(from, to, "rejecting pagination bounds");
        return Err(DomainError::invalid_bounds(format!(
            "to ({to}) must not be less than from ({from})"
        )));
    }
    if total < 0 {
        tracing::warn!(total, "rejecting pagination bounds");
        return Err(DomainError::invalid_bounds(format!("total must be >= 0, got {total}")));
    }
    if max_buttons == 0 {
        return Err(DomainError::invalid_bounds("max_buttons must be at least 1"));
    }

    // All three are non-negative past the checks above.
    let (from, to, total) = (from as u64, to as u64, total as u64);
    let items_per_page = to - from + 1;
    let current_page = (from - 1) / items_per_page + 1;
    let total_pages = total.div_ceil(items_per_page);

    let displayable_pages = page_buttons(current_page, total_pages, max_buttons as u64);
    let last_page = match displayable_pages.last() {
        Some(&shown) if shown < total_pages => Some(total_pages),
        None if total_pages > 0 => Some(total_pages),
        _ => None,
    };

    Ok(PageWindow {
        from,
        to,
        total,
        items_per_page,
        current_page,
        total_pages,
        displayable_pages,
        last_page,
    })
}

/// Up to `max` consecutive page numbers around `current`, clamped to `1..=total_pages`.
fn page_buttons(current: u64, total_pages: u64, max: u64) -> Vec<u64> {
    if total_pages == 0 {
        return Vec::new();
    }
    let count = max.min(total_pages);
    let current = current.clamp(1, total_pages);
    let mut start = current.saturating_sub(count / 2).max(1);
    let mut end = start + count - 1;
    if end > total_pages {
        end = total_pages;
        start = end + 1 - count;
    }
    (start..=end).collect()
}
