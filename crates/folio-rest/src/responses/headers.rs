//! Offset pagination response headers.

use axum::http::{HeaderName, HeaderValue};
use axum::response::{IntoResponseParts, ResponseParts};
use folio_core::OffsetPageMeta;
use std::convert::Infallible;

pub const X_TOTAL_COUNT: HeaderName = HeaderName::from_static("x-total-count");
pub const X_TOTAL_PAGES: HeaderName = HeaderName::from_static("x-total-pages");
pub const X_CURRENT_PAGE: HeaderName = HeaderName::from_static("x-current-page");
pub const X_PAGE_SIZE: HeaderName = HeaderName::from_static("x-page-size");
pub const X_HAS_NEXT: HeaderName = HeaderName::from_static("x-has-next");
pub const X_HAS_PREV: HeaderName = HeaderName::from_static("x-has-prev");

/// Mirrors [`OffsetPageMeta`] into `X-*` response headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationHeaders {
    pub total_count: u64,
    pub total_pages: u64,
    pub current_page: u32,
    pub page_size: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl From<&OffsetPageMeta> for PaginationHeaders {
    fn from(meta: &OffsetPageMeta) -> Self {
        Self {
            total_count: meta.total_count,
            total_pages: meta.total_pages,
            current_page: meta.current_page,
            page_size: meta.page_size,
            has_next: meta.has_next,
            has_prev: meta.has_prev,
        }
    }
}

const fn flag(value: bool) -> HeaderValue {
    HeaderValue::from_static(if value { "true" } else { "false" })
}

impl IntoResponseParts for PaginationHeaders {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        let headers = res.headers_mut();
        headers.insert(X_TOTAL_COUNT, HeaderValue::from(self.total_count));
        headers.insert(X_TOTAL_PAGES, HeaderValue::from(self.total_pages));
        headers.insert(X_CURRENT_PAGE, HeaderValue::from(self.current_page));
        headers.insert(X_PAGE_SIZE, HeaderValue::from(self.page_size));
        headers.insert(X_HAS_NEXT, flag(self.has_next));
        headers.insert(X_HAS_PREV, flag(self.has_prev));
        Ok(res)
    }
}
