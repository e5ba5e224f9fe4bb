//! Paging, sort and filter state for a records table, and the parameters
//! sent to the gateway's `records` endpoint.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u64 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "asc", alias = "ascending")]
    Ascending,
    #[serde(rename = "desc", alias = "descending")]
    Descending,
}

impl SortOrder {
    pub fn as_param(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }

    pub fn flip(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    /// Header indicator.
    pub fn arrow(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "▲",
            SortOrder::Descending => "▼",
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            other => Err(format!("unknown sort order '{}'", other)),
        }
    }
}

/// Mutable query state owned by a records table.
///
/// `start` only ever moves by whole pages. It can point past `total` for a
/// moment (e.g. after the result set shrinks); rendering clamps instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub start: u64,
    count: u64,
    pub sort_field: Option<String>,
    pub sort_order: SortOrder,
    pub filter: Option<String>,
}

impl QueryState {
    /// Returns `None` when `count` is zero.
    pub fn new(start: u64, count: u64) -> Option<Self> {
        if count == 0 {
            return None;
        }
        Some(QueryState {
            start,
            count,
            sort_field: None,
            sort_order: SortOrder::Ascending,
            filter: None,
        })
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Move to the first page. Returns false when already there.
    pub fn first_page(&mut self) -> bool {
        if self.start == 0 {
            return false;
        }
        self.start = 0;
        true
    }

    pub fn prev_page(&mut self) -> bool {
        if self.start < self.count {
            return false;
        }
        self.start -= self.count;
        true
    }

    pub fn next_page(&mut self, total: u64) -> bool {
        if self.start + self.count >= total {
            return false;
        }
        self.start += self.count;
        true
    }

    pub fn last_page(&mut self, total: u64) -> bool {
        if total <= self.count {
            return false;
        }
        let remainder = total % self.count;
        let last = if remainder == 0 {
            total - self.count
        } else {
            total - remainder
        };
        if last == self.start {
            return false;
        }
        self.start = last;
        true
    }

    /// Sort by `key`, flipping the order when it is already the sort field.
    pub fn sort_by(&mut self, key: &str) {
        if self.sort_field.as_deref() == Some(key) {
            self.sort_order = self.sort_order.flip();
        } else {
            self.sort_field = Some(key.to_string());
        }
    }

    /// Replace the filter; blank text clears it and the table returns to page one.
    pub fn set_filter(&mut self, filter: Option<String>) {
        self.filter = filter
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty());
        self.start = 0;
    }

    /// Zero-based index range `[first, end)` of the page within `total`.
    pub fn visible_range(&self, total: u64) -> (u64, u64) {
        let end = (self.start + self.count).min(total);
        (self.start.min(end), end)
    }

    pub fn current_page(&self) -> u64 {
        self.start / self.count + 1
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.count).max(1)
    }
}

/// Parameters for one `records` request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordsQuery {
    pub start: u64,
    pub count: u64,
    pub fields: Option<String>,
    pub order_by: Option<String>,
    pub order: SortOrder,
    pub filter: Option<String>,
}

impl RecordsQuery {
    pub fn from_state(state: &QueryState, fields: String) -> Self {
        RecordsQuery {
            start: state.start,
            count: state.count,
            fields: Some(fields).filter(|f| !f.is_empty()),
            order_by: state.sort_field.clone(),
            order: state.sort_order,
            filter: state.filter.clone(),
        }
    }

    /// Query pairs in wire order, omitting defaults.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if self.start > 0 {
            params.push(("start", self.start.to_string()));
        }
        params.push(("count", self.count.to_string()));
        if let Some(fields) = self.fields.as_ref().filter(|f| !f.is_empty()) {
            params.push(("fields", fields.clone()));
        }
        if let Some(order_by) = &self.order_by {
            params.push(("orderby", order_by.clone()));
            params.push(("order", self.order.as_param().to_string()));
        }
        if let Some(filter) = self.filter.as_ref().filter(|f| !f.is_empty()) {
            params.push(("filter", filter.clone()));
        }
        params
    }
}
