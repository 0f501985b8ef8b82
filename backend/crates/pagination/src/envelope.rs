//! Page envelope returned by paginated listings.

use serde::{Deserialize, Serialize};

use crate::PageRequest;

/// A page of items plus the information needed to request neighbours.
///
/// `total` counts every item in the underlying collection, independent of the
/// requested page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    /// Items on this page, already ordered.
    pub items: Vec<T>,
    /// Size of the full, unpaginated collection.
    pub total: u64,
    /// Echo of the requested page number.
    pub page: u32,
    /// Echo of the requested page size.
    pub limit: u32,
}

impl<T> Paginated<T> {
    /// Wrap `items` fetched for `request`.
    #[must_use]
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page(),
            limit: request.limit(),
        }
    }
}
