//! Tunables shared by every service.

use folio_config::AppConfig;
use folio_core::{FolioResult, OffsetPaginator, OffsetRequest};
use std::time::Duration;

use crate::cache::DEFAULT_TTL;

/// Cache lifetime and paging limits handed to each service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceSettings {
    /// TTL of every cache entry written by the services.
    pub ttl: Duration,
    /// Limits of offset listings.
    pub offset: OffsetPaginator,
    /// Keyset page size used when the client sends none.
    pub default_keyset_limit: u32,
    /// Largest keyset page size a client may ask for.
    pub max_keyset_limit: u32,
}

impl ServiceSettings {
    #[must_use]
    pub const fn from_config(config: &AppConfig) -> Self {
        Self {
            ttl: config.redis.default_ttl(),
            offset: config.pagination.offset_paginator(),
            default_keyset_limit: config.pagination.default_keyset_limit,
            max_keyset_limit: config.pagination.max_keyset_limit,
        }
    }

    /// Re-applies the offset limits to a request built elsewhere.
    pub fn offset_request(&self, request: OffsetRequest) -> FolioResult<OffsetRequest> {
        self.offset
            .validate(i64::from(request.page), i64::from(request.size))
    }

    /// Clamps a keyset page size to `[1, max_keyset_limit]`.
    #[must_use]
    pub fn keyset_limit(&self, limit: Option<u32>) -> u32 {
        limit
            .unwrap_or(self.default_keyset_limit)
            .clamp(1, self.max_keyset_limit.max(1))
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            offset: OffsetPaginator::default(),
            default_keyset_limit: 20,
            max_keyset_limit: 100,
        }
    }
}
