//! Pagination query extractors.

use folio_config::PaginationConfig;
use folio_core::{FolioResult, OffsetPaginator, OffsetRequest};
use serde::Deserialize;

/// Query parameters for offset pagination (`?page=&size=`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationQuery {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub size: Option<i64>,
}

impl PaginationQuery {
    /// Normalizes the query through `paginator`.
    ///
    /// A missing page means page 1; a missing size falls back to the
    /// paginator default.
    ///
    /// # Errors
    ///
    /// Returns a validation error when `page` is smaller than 1.
    pub fn to_request(&self, paginator: &OffsetPaginator) -> FolioResult<OffsetRequest> {
        paginator.validate(self.page.unwrap_or(1), self.size.unwrap_or(0))
    }
}

/// Query parameters for keyset pagination (`?cursor=&limit=`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CursorQuery {
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
}

impl CursorQuery {
    /// The cursor, with an empty parameter treated as absent.
    #[must_use]
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref().filter(|cursor| !cursor.is_empty())
    }

    /// The page size clamped to `[1, max_keyset_limit]`.
    #[must_use]
    pub fn limit(&self, config: &PaginationConfig) -> u32 {
        let max = config.max_keyset_limit.max(1);
        self.limit.map_or(config.default_keyset_limit, |limit| {
            u32::try_from(limit.max(1)).unwrap_or(u32::MAX).min(max)
        })
    }
}
