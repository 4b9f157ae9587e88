use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub last_page: u32,
}

impl PageMeta {
    pub fn new(total: u64, page: u32, limit: u32) -> Self {
        let limit = limit.max(1);
        let last_page = total.div_ceil(u64::from(limit)) as u32;
        Self {
            total,
            page,
            limit,
            last_page,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.last_page
    }

    /// One-based index range of the rows shown, `None` when the page is empty.
    pub fn row_range(&self, rows_on_page: usize) -> Option<(u64, u64)> {
        if rows_on_page == 0 {
            return None;
        }
        let first = u64::from(self.page.saturating_sub(1)) * u64::from(self.limit) + 1;
        Some((first, first + rows_on_page as u64 - 1))
    }
}

/// Envelope returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> ListResponse<T> {
    pub fn empty(page: u32, limit: u32) -> Self {
        Self {
            data: Vec::new(),
            meta: PageMeta::new(0, page, limit),
        }
    }
}
