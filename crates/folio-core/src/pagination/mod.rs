//! Pagination types for list operations.
//!
//! Two strategies are supported:
//!
//! - [`OffsetPaginator`]: classic `page`/`size` paging backed by `LIMIT`/`OFFSET`
//!   and a total count. Used for admin tables and numbered page links.
//! - [`KeysetPaginator`]: cursor paging over a `(created_at, id)` key. Used for
//!   infinite-scroll style lists (archives, comment threads) where rows are
//!   inserted while readers page through.

mod keyset;
mod offset;

pub use keyset::*;
pub use offset::*;

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Ordering direction of a paginated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Oldest first.
    Asc,
    /// Newest first.
    #[default]
    Desc,
}

impl SortDirection {
    /// SQL keyword for `ORDER BY`.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    /// Comparison operator selecting rows that come after a cursor.
    #[must_use]
    pub const fn comparison_operator(self) -> &'static str {
        match self {
            Self::Asc => ">",
            Self::Desc => "<",
        }
    }
}

impl Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}
