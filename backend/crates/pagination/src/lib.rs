//! Page-request and paginated envelope primitives shared by backend
//! endpoints.
//!
//! The crate deliberately stays free of web-framework and database
//! dependencies: inbound adapters parse query parameters into a
//! [`PageRequest`], repositories return a [`Paginated`] collection, and the
//! HTTP layer serialises the derived [`PageInfo`] alongside the items.

use serde::Serialize;
use thiserror::Error;

/// First page number of every paginated listing.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size applied when the caller does not supply one.
pub const DEFAULT_LIMIT: u32 = 15;

/// Upper bound on the page size accepted from callers.
pub const MAX_LIMIT: u32 = 100;

/// Validation failures for [`PageRequest`] construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// Page numbers are 1-based.
    #[error("page must be at least 1")]
    PageOutOfRange,
    /// Limit must be between 1 and [`MAX_LIMIT`].
    #[error("limit must be between 1 and {max}")]
    LimitOutOfRange {
        /// Largest accepted page size.
        max: u32,
    },
}

/// A validated request for one page of a listing.
///
/// ## Invariants
/// - `page >= 1`
/// - `1 <= limit <= MAX_LIMIT`
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(2, 10)?;
/// assert_eq!(request.offset(), 10);
/// # Ok::<(), pagination::PageRequestError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Validate and construct a page request.
    pub fn new(page: u32, limit: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::PageOutOfRange);
        }
        if limit == 0 || limit > MAX_LIMIT {
            return Err(PageRequestError::LimitOutOfRange { max: MAX_LIMIT });
        }
        Ok(Self { page, limit })
    }

    /// Construct a request from optional caller inputs, applying defaults
    /// for the missing values.
    pub fn from_optional(page: Option<u32>, limit: Option<u32>) -> Result<Self, PageRequestError> {
        Self::new(page.unwrap_or(DEFAULT_PAGE), limit.unwrap_or(DEFAULT_LIMIT))
    }

    /// Requested 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Requested page size.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows preceding the requested page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
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

/// One page of items together with the aggregate counts needed to derive
/// the pagination envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Paginated<T> {
    /// Items of the current page, in listing order.
    pub items: Vec<T>,
    /// Whether pages exist after this one.
    pub has_more: bool,
    /// Next page number, when `has_more` holds.
    pub next_page: Option<u32>,
    /// Total items matching the listing's filters.
    pub total_items: u64,
    /// Total pages at the requested limit.
    pub total_pages: u32,
}

impl<T> Paginated<T> {
    /// Build a page from the fetched slice and the filtered total.
    ///
    /// `has_more` holds exactly when rows remain beyond this page:
    /// `offset + items.len() < total_items`.
    #[must_use]
    pub fn new(items: Vec<T>, request: &PageRequest, total_items: u64) -> Self {
        let has_more = request.offset() + (items.len() as u64) < total_items;
        Self {
            items,
            has_more,
            next_page: has_more.then(|| request.page().saturating_add(1)),
            total_items,
            total_pages: total_pages(total_items, request.limit()),
        }
    }

    /// A page with no items at all, used when the filtered total is zero.
    #[must_use]
    pub fn empty(request: &PageRequest) -> Self {
        Self::new(Vec::new(), request, 0)
    }

    /// Map the page's items, keeping the envelope counts.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        let Self {
            items,
            has_more,
            next_page,
            total_items,
            total_pages,
        } = self;
        Paginated {
            items: items.into_iter().map(f).collect(),
            has_more,
            next_page,
            total_items,
            total_pages,
        }
    }
}

/// Pagination metadata serialised next to the items in HTTP responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Page the response covers.
    pub current_page: u32,
    /// Total pages at the applied limit.
    pub total_pages: u32,
    /// Total items matching the filters.
    pub total_items: u64,
    /// Applied page size.
    pub limit: u32,
    /// Next page to request, absent on the final page.
    pub next_page: Option<u32>,
    /// Whether more pages follow.
    pub has_more: bool,
}

impl PageInfo {
    /// Derive response metadata from a page and the request that produced it.
    #[must_use]
    pub fn from_page<T>(page: &Paginated<T>, request: &PageRequest) -> Self {
        Self {
            current_page: request.page(),
            total_pages: page.total_pages,
            total_items: page.total_items,
            limit: request.limit(),
            next_page: page.next_page,
            has_more: page.has_more,
        }
    }
}

fn total_pages(total_items: u64, limit: u32) -> u32 {
    u32::try_from(total_items.div_ceil(u64::from(limit))).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    //! Envelope arithmetic coverage.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 10)]
    #[case(5, 0)]
    #[case(1, MAX_LIMIT + 1)]
    fn request_rejects_out_of_range_inputs(#[case] page: u32, #[case] limit: u32) {
        PageRequest::new(page, limit).expect_err("out of range inputs must fail");
    }

    #[rstest]
    #[case(1, 15, 0)]
    #[case(2, 15, 15)]
    #[case(4, 7, 21)]
    fn request_offset_skips_previous_pages(#[case] page: u32, #[case] limit: u32, #[case] offset: u64) {
        let request = PageRequest::new(page, limit).expect("valid request");
        assert_eq!(request.offset(), offset);
    }

    #[rstest]
    fn from_optional_applies_defaults() {
        let request = PageRequest::from_optional(None, None).expect("defaults are valid");
        assert_eq!(request.page(), DEFAULT_PAGE);
        assert_eq!(request.limit(), DEFAULT_LIMIT);
    }

    #[rstest]
    // full first page of three
    #[case(1, 10, 10, 25, true, Some(2), 3)]
    // final partial page
    #[case(3, 10, 5, 25, false, None, 3)]
    // exactly full final page
    #[case(2, 10, 10, 20, false, None, 2)]
    // past the end
    #[case(9, 10, 0, 25, false, None, 3)]
    fn envelope_matches_totals(
        #[case] page: u32,
        #[case] limit: u32,
        #[case] returned: usize,
        #[case] total: u64,
        #[case] has_more: bool,
        #[case] next_page: Option<u32>,
        #[case] total_pages: u32,
    ) {
        let request = PageRequest::new(page, limit).expect("valid request");
        let paginated = Paginated::new(vec![(); returned], &request, total);

        assert_eq!(paginated.has_more, has_more);
        assert_eq!(paginated.next_page, next_page);
        assert_eq!(paginated.total_pages, total_pages);
        assert_eq!(paginated.total_items, total);
    }

    #[rstest]
    fn empty_page_has_no_follow_up() {
        let request = PageRequest::default();
        let paginated = Paginated::<u8>::empty(&request);

        assert!(paginated.items.is_empty());
        assert!(!paginated.has_more);
        assert_eq!(paginated.next_page, None);
        assert_eq!(paginated.total_pages, 0);
    }

    #[rstest]
    fn map_preserves_the_envelope() {
        let request = PageRequest::new(1, 2).expect("valid request");
        let paginated = Paginated::new(vec![1_u32, 2], &request, 5).map(|n| n.to_string());

        assert_eq!(paginated.items, vec!["1".to_owned(), "2".to_owned()]);
        assert!(paginated.has_more);
        assert_eq!(paginated.next_page, Some(2));
    }

    #[rstest]
    fn page_info_mirrors_page_and_request() {
        let request = PageRequest::new(2, 10).expect("valid request");
        let paginated = Paginated::new(vec![(); 10], &request, 45);
        let info = PageInfo::from_page(&paginated, &request);

        assert_eq!(info.current_page, 2);
        assert_eq!(info.limit, 10);
        assert_eq!(info.total_items, 45);
        assert_eq!(info.total_pages, 5);
        assert_eq!(info.next_page, Some(3));
        assert!(info.has_more);
    }
}
