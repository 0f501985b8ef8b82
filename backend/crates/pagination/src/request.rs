//! Validated offset page requests.

use serde::{Deserialize, Serialize};

/// Page number used when the caller omits one.
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used when the caller omits one.
pub const DEFAULT_LIMIT: u32 = 10;

/// Reasons a page request is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// Page numbers start at one.
    #[error("page must be greater than or equal to 1")]
    PageTooSmall,
    /// Page numbers must fit the supported range.
    #[error("page must be less than or equal to {max}")]
    PageTooLarge {
        /// Largest accepted page number.
        max: u32,
    },
    /// A page must hold at least one item.
    #[error("limit must be greater than or equal to 1")]
    LimitTooSmall,
    /// The page size exceeds the configured ceiling.
    #[error("limit must be less than or equal to {max}")]
    LimitTooLarge {
        /// Largest accepted page size.
        max: u32,
    },
}

/// One page of an offset-paginated listing.
///
/// ## Invariants
/// - `page >= 1`
/// - `1 <= limit <= max_limit` where `max_limit` is supplied at construction.
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(2, 5, 100).expect("valid request");
/// assert_eq!(request.offset(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPageRequest")]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Validate a page number and size against `max_limit`.
    ///
    /// Inputs are signed so raw query values can be checked without a lossy
    /// pre-conversion.
    ///
    /// # Errors
    /// Returns a [`PageRequestError`] describing the first failing bound.
    pub fn new(page: i64, limit: i64, max_limit: u32) -> Result<Self, PageRequestError> {
        if page < 1 {
            return Err(PageRequestError::PageTooSmall);
        }
        let page =
            u32::try_from(page).map_err(|_| PageRequestError::PageTooLarge { max: u32::MAX })?;
        if limit < 1 {
            return Err(PageRequestError::LimitTooSmall);
        }
        let limit = u32::try_from(limit)
            .ok()
            .filter(|value| *value <= max_limit)
            .ok_or(PageRequestError::LimitTooLarge { max: max_limit })?;
        Ok(Self { page, limit })
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of items on this page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of items preceding this page: `(page - 1) * limit`.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

/// Wire form checked through [`PageRequest::new`] on deserialisation.
#[derive(Deserialize)]
struct RawPageRequest {
    page: i64,
    limit: i64,
}

impl TryFrom<RawPageRequest> for PageRequest {
    type Error = PageRequestError;

    fn try_from(raw: RawPageRequest) -> Result<Self, Self::Error> {
        Self::new(raw.page, raw.limit, u32::MAX)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Bounds and offset arithmetic for page requests.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 10, 0)]
    #[case(2, 5, 5)]
    #[case(3, 7, 14)]
    #[case(4_000_000_000, 100, 399_999_999_900)]
    fn offset_skips_previous_pages(#[case] page: i64, #[case] limit: i64, #[case] expected: u64) {
        let request = PageRequest::new(page, limit, 100).expect("valid request");
        assert_eq!(request.offset(), expected);
    }

    #[rstest]
    #[case(0, 10, PageRequestError::PageTooSmall)]
    #[case(-3, 10, PageRequestError::PageTooSmall)]
    #[case(i64::MAX, 10, PageRequestError::PageTooLarge { max: u32::MAX })]
    #[case(1, 0, PageRequestError::LimitTooSmall)]
    #[case(1, -1, PageRequestError::LimitTooSmall)]
    #[case(1, 101, PageRequestError::LimitTooLarge { max: 100 })]
    #[case(1, i64::MAX, PageRequestError::LimitTooLarge { max: 100 })]
    fn rejects_out_of_range_values(
        #[case] page: i64,
        #[case] limit: i64,
        #[case] expected: PageRequestError,
    ) {
        assert_eq!(PageRequest::new(page, limit, 100), Err(expected));
    }

    #[rstest]
    fn accepts_limit_equal_to_maximum() {
        let request = PageRequest::new(1, 100, 100).expect("boundary is inclusive");
        assert_eq!(request.limit(), 100);
    }

    #[rstest]
    fn default_is_first_page_of_ten() {
        let request = PageRequest::default();
        assert_eq!(request.page(), DEFAULT_PAGE);
        assert_eq!(request.limit(), DEFAULT_LIMIT);
        assert_eq!(request.offset(), 0);
    }

    #[rstest]
    #[case(r#"{"page":0,"limit":10}"#)]
    #[case(r#"{"page":1,"limit":0}"#)]
    #[case(r#"{"page":-2,"limit":5}"#)]
    fn deserialising_enforces_the_same_bounds(#[case] raw: &str) {
        assert!(serde_json::from_str::<PageRequest>(raw).is_err());
    }

    #[rstest]
    fn deserialising_accepts_valid_requests() {
        let request: PageRequest =
            serde_json::from_str(r#"{"page":3,"limit":4}"#).expect("valid request");
        assert_eq!(request.offset(), 8);
    }

    #[rstest]
    fn error_messages_name_the_bound() {
        assert_eq!(
            PageRequestError::LimitTooLarge { max: 50 }.to_string(),
            "limit must be less than or equal to 50"
        );
    }
}
