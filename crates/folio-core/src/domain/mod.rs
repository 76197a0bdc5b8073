//! Domain entities of the blog backend.
//!
//! Entities mirror the persisted rows. Bilingual text fields keep both the
//! Chinese and the English version; callers resolve them with a
//! [`Language`](crate::Language).

pub mod blog;
pub mod comment;
pub mod project;
pub mod role;
pub mod section;
pub mod tag;
pub mod visitor;

pub use blog::*;
pub use comment::*;
pub use project::*;
pub use role::*;
pub use section::*;
pub use tag::*;
pub use visitor::*;

use chrono::{DateTime, Datelike, TimeZone, Utc};

/// Half-open `[start, end)` window covering the calendar month of `now` (UTC).
///
/// Used for the "new/updated this month" counters on admin listings.
#[must_use]
pub fn month_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let (next_year, next_month) = if now.month() == 12 {
        (now.year() + 1, 1)
    } else {
        (now.year(), now.month() + 1)
    };
    let start = Utc
        .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now);
    let end = Utc
        .with_ymd_and_hms(next_year, next_month, 1, 0, 0, 0)
        .single()
        .unwrap_or(now);
    (start, end)
}

/// Activity counters for the current month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonthlyCounts {
    /// Rows created this month.
    pub created: u64,
    /// Rows updated this month.
    pub updated: u64,
}
