use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of a screen-specific filter key. The controller never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Single(String),
    List(Vec<String>),
}

impl FilterValue {
    pub fn values(&self) -> Vec<&str> {
        match self {
            FilterValue::Single(value) => vec![value.as_str()],
            FilterValue::List(values) => values.iter().map(String::as_str).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Single(value) => value.is_empty(),
            FilterValue::List(values) => values.iter().all(String::is_empty),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Single(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Single(value)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(values: Vec<String>) -> Self {
        FilterValue::List(values)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub page: u32,
    pub limit: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
    #[serde(default, flatten)]
    pub extra: BTreeMap<String, FilterValue>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            q: None,
            sort_by: None,
            order: None,
            extra: BTreeMap::new(),
        }
    }
}

impl FilterState {
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit.max(1);
        self
    }

    pub fn with_sort(mut self, sort_by: &str, order: SortOrder) -> Self {
        self.sort_by = Some(sort_by.to_string());
        self.order = Some(order);
        self
    }

    pub fn with_filter(mut self, key: &str, value: impl Into<FilterValue>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }

    pub fn search_term(&self) -> Option<&str> {
        self.q.as_deref().filter(|q| !q.is_empty())
    }

    /// True when anything beyond paging narrows or reorders the result set.
    pub fn is_filtered(&self) -> bool {
        self.search_term().is_some() || self.extra.values().any(|value| !value.is_empty())
    }

    /// Merges `patch` into a copy of `self`.
    ///
    /// A patch that touches `q`, `sort_by`, `order` or any extra key and leaves
    /// `page` unset sends the result back to page 1.
    pub fn merged(&self, patch: FilterPatch) -> FilterState {
        let resets_page = patch.resets_page();
        let mut next = self.clone();

        if let Some(page) = patch.page {
            next.page = page;
        }
        if let Some(limit) = patch.limit {
            next.limit = limit;
        }
        if let Some(q) = patch.q {
            next.q = q.filter(|q| !q.is_empty());
        }
        if let Some(sort_by) = patch.sort_by {
            next.sort_by = sort_by.filter(|key| !key.is_empty());
        }
        if let Some(order) = patch.order {
            next.order = order;
        }
        for (key, value) in patch.extra {
            match value {
                Some(value) if !value.is_empty() => {
                    next.extra.insert(key, value);
                }
                _ => {
                    next.extra.remove(&key);
                }
            }
        }

        if resets_page {
            next.page = DEFAULT_PAGE;
        }

        next
    }
}

/// Partial update of a [`FilterState`].
///
/// Outer `None` leaves a field untouched; inner `None` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub q: Option<Option<String>>,
    pub sort_by: Option<Option<String>>,
    pub order: Option<Option<SortOrder>>,
    pub extra: BTreeMap<String, Option<FilterValue>>,
}

impl FilterPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn search(mut self, q: Option<String>) -> Self {
        self.q = Some(q);
        self
    }

    pub fn sort(mut self, sort_by: Option<String>, order: Option<SortOrder>) -> Self {
        self.sort_by = Some(sort_by);
        self.order = Some(order);
        self
    }

    pub fn filter(mut self, key: &str, value: Option<FilterValue>) -> Self {
        self.extra.insert(key.to_string(), value);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn resets_page(&self) -> bool {
        self.page.is_none()
            && (self.q.is_some()
                || self.sort_by.is_some()
                || self.order.is_some()
                || !self.extra.is_empty())
    }
}
