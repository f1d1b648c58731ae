use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Paging window for list endpoints, read from `?startIndex=..&pageSize=..`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryParameters {
    /// Zero-based offset of the first item.
    #[validate(range(min = 0))]
    pub start_index: i64,
    /// At most 100 items per page.
    #[validate(range(min = 1, max = 100))]
    pub page_size: i64,
}

impl Default for QueryParameters {
    fn default() -> Self {
        Self {
            start_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of items plus the size of the whole collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualizeResponse<T> {
    pub items: Vec<T>,
    pub total_size: i64,
}

impl<T> VirtualizeResponse<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> VirtualizeResponse<U> {
        VirtualizeResponse {
            items: self.items.into_iter().map(f).collect(),
            total_size: self.total_size,
        }
    }
}
