use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::{FolioError, FolioResult};

/// Page/size based paginator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetPaginator {
    /// Size used when the caller asks for less than one item.
    pub default_page_size: u32,
    /// Upper bound applied to every request.
    pub max_page_size: u32,
}

impl OffsetPaginator {
    /// The default page size.
    pub const DEFAULT_PAGE_SIZE: u32 = 20;
    /// The maximum allowed page size.
    pub const MAX_PAGE_SIZE: u32 = 100;

    /// Creates a paginator with custom limits.
    #[must_use]
    pub const fn new(default_page_size: u32, max_page_size: u32) -> Self {
        Self {
            default_page_size,
            max_page_size,
        }
    }

    /// Validates and normalizes raw `page`/`size` parameters.
    ///
    /// # Errors
    ///
    /// Returns a validation error when `page` is smaller than 1. Out of range
    /// sizes are clamped instead of rejected.
    pub fn validate(&self, page: i64, size: i64) -> FolioResult<OffsetRequest> {
        if page < 1 {
            return Err(FolioError::validation("Page number must be greater than 0"));
        }
        let page = u32::try_from(page)
            .map_err(|_| FolioError::validation("Page number is too large"))?;

        let size = if size < 1 {
            self.default_page_size
        } else {
            u32::try_from(size)
                .unwrap_or(u32::MAX)
                .min(self.max_page_size)
        };

        Ok(OffsetRequest { page, size })
    }

    /// Builds page metadata for a normalized request.
    #[must_use]
    pub fn metadata(&self, total_count: u64, request: OffsetRequest) -> OffsetPageMeta {
        OffsetPageMeta::new(total_count, request)
    }

    /// Runs a paginated query.
    ///
    /// `count` resolves the total number of matching rows; `fetch` receives
    /// the normalized request and loads the rows of that page.
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::NoDataFound`] when the listing is empty and
    /// propagates errors from either closure.
    pub async fn paginate<T, C, F, Fut>(
        &self,
        request: OffsetRequest,
        count: C,
        fetch: F,
    ) -> FolioResult<OffsetPage<T>>
    where
        C: Future<Output = FolioResult<u64>>,
        F: FnOnce(OffsetRequest) -> Fut,
        Fut: Future<Output = FolioResult<Vec<T>>>,
    {
        let total_count = count.await?;
        if total_count == 0 {
            return Err(FolioError::NoDataFound);
        }

        let items = fetch(request).await?;
        tracing::debug!(
            page = request.page,
            size = request.size,
            total_count,
            returned = items.len(),
            "Offset page fetched"
        );

        Ok(OffsetPage::new(items, self.metadata(total_count, request)))
    }
}

impl Default for OffsetPaginator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PAGE_SIZE, Self::MAX_PAGE_SIZE)
    }
}

/// A normalized offset page request. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OffsetRequest {
    /// The page number (1-indexed).
    pub page: u32,
    /// The number of items per page.
    pub size: u32,
}

impl OffsetRequest {
    /// Returns the offset for database queries.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page.saturating_sub(1) as u64) * self.size as u64
    }

    /// Returns the limit for database queries.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.size as u64
    }
}

impl Default for OffsetRequest {
    fn default() -> Self {
        Self {
            page: 1,
            size: OffsetPaginator::DEFAULT_PAGE_SIZE,
        }
    }
}

/// Metadata describing one offset page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetPageMeta {
    /// The current page number (1-indexed).
    pub current_page: u32,
    /// The number of items per page.
    pub page_size: u32,
    /// The total number of items across all pages.
    pub total_count: u64,
    /// The total number of pages.
    pub total_pages: u64,
    /// Whether a later page exists.
    pub has_next: bool,
    /// Whether an earlier page exists.
    pub has_prev: bool,
    /// 1-based position of the first item on this page, 0 for an empty set.
    pub start_index: u64,
    /// 1-based position of the last item on this page.
    pub end_index: u64,
    /// Items created during the current month (admin listings only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_items_this_month: Option<u64>,
    /// Items updated during the current month (admin listings only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_items_this_month: Option<u64>,
}

impl OffsetPageMeta {
    /// Computes metadata from a total and a normalized request.
    #[must_use]
    pub fn new(total_count: u64, request: OffsetRequest) -> Self {
        let page = u64::from(request.page);
        let size = u64::from(request.size);
        let total_pages = if total_count > 0 && size > 0 {
            total_count.div_ceil(size)
        } else {
            0
        };

        Self {
            current_page: request.page,
            page_size: request.size,
            total_count,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
            start_index: if total_count > 0 {
                (page - 1) * size + 1
            } else {
                0
            },
            end_index: (page * size).min(total_count),
            new_items_this_month: None,
            updated_items_this_month: None,
        }
    }

    /// Attaches the monthly activity counters shown on admin listings.
    #[must_use]
    pub fn with_monthly_counts(mut self, new_items: u64, updated_items: u64) -> Self {
        self.new_items_this_month = Some(new_items);
        self.updated_items_this_month = Some(updated_items);
        self
    }
}

/// A page of results with its offset metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetPage<T> {
    /// Information about this page.
    pub pagination: OffsetPageMeta,
    /// The items on this page.
    pub items: Vec<T>,
}

impl<T> OffsetPage<T> {
    /// Creates a new page.
    #[must_use]
    pub const fn new(items: Vec<T>, pagination: OffsetPageMeta) -> Self {
        Self { pagination, items }
    }

    /// Maps the page content to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> OffsetPage<U> {
        OffsetPage {
            pagination: self.pagination,
            items: self.items.into_iter().map(f).collect(),
        }
    }

    /// Returns true if the page is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}
