use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::SortDirection;

/// A decoded keyset cursor: the sort key of the last row a client has seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CursorPosition {
    /// Primary sort key.
    pub created_at: DateTime<Utc>,
    /// Tie-breaker for rows sharing a timestamp.
    pub id: i64,
}

impl CursorPosition {
    /// Creates a new position.
    #[must_use]
    pub const fn new(created_at: DateTime<Utc>, id: i64) -> Self {
        Self { created_at, id }
    }
}

/// Rows that can be paged with a [`KeysetPaginator`].
pub trait KeysetRow {
    /// Returns the `(created_at, id)` sort key of this row.
    fn position(&self) -> CursorPosition;
}

/// Cursor based paginator ordered by `(created_at, id)`.
///
/// Cursors are opaque to clients: URL-safe base64 of
/// `"{created_at}{delimiter}{id}"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeysetPaginator {
    direction: SortDirection,
    delimiter: char,
}

impl KeysetPaginator {
    /// Oldest-first paginator.
    pub const ASC: Self = Self::new(SortDirection::Asc);
    /// Newest-first paginator.
    pub const DESC: Self = Self::new(SortDirection::Desc);

    /// Creates a paginator with the default `|` delimiter.
    #[must_use]
    pub const fn new(direction: SortDirection) -> Self {
        Self {
            direction,
            delimiter: '|',
        }
    }

    /// Overrides the delimiter between timestamp and id.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Returns the ordering direction.
    #[must_use]
    pub const fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Encodes a row's sort key into an opaque cursor.
    #[must_use]
    pub fn encode_cursor(&self, created_at: DateTime<Utc>, id: i64) -> String {
        let raw = format!(
            "{}{}{}",
            created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
            self.delimiter,
            id
        );
        URL_SAFE.encode(raw)
    }

    /// Decodes a cursor previously produced by [`Self::encode_cursor`].
    ///
    /// Missing, empty or malformed cursors decode to `None`, which callers
    /// treat as "start from the first page".
    #[must_use]
    pub fn decode_cursor(&self, cursor: Option<&str>) -> Option<CursorPosition> {
        let cursor = cursor.map(str::trim).filter(|c| !c.is_empty())?;
        let bytes = URL_SAFE.decode(cursor).ok()?;
        let raw = String::from_utf8(bytes).ok()?;
        let (timestamp, id) = raw.split_once(self.delimiter)?;
        let created_at = parse_timestamp(timestamp)?;
        let id = id.parse::<i64>().ok()?;
        Some(CursorPosition { created_at, id })
    }

    /// Returns true when `row` comes strictly after `position` in this
    /// paginator's order. This is the in-memory twin of the SQL keyset filter.
    #[must_use]
    pub fn follows(&self, position: &CursorPosition, row: &CursorPosition) -> bool {
        match self.direction {
            SortDirection::Desc => {
                row.created_at < position.created_at
                    || (row.created_at == position.created_at && row.id < position.id)
            }
            SortDirection::Asc => {
                row.created_at > position.created_at
                    || (row.created_at == position.created_at && row.id > position.id)
            }
        }
    }

    /// Compares two rows by this paginator's `(created_at, id)` order.
    #[must_use]
    pub fn compare(&self, a: &CursorPosition, b: &CursorPosition) -> Ordering {
        match self.direction {
            SortDirection::Asc => a.cmp(b),
            SortDirection::Desc => b.cmp(a),
        }
    }

    /// Number of rows to fetch for a page: one extra row detects `has_next`.
    #[must_use]
    pub const fn fetch_limit(limit: u32) -> u64 {
        limit as u64 + 1
    }

    /// Turns the `limit + 1` rows fetched for a page into a [`KeysetPage`].
    #[must_use]
    pub fn finish<T: KeysetRow>(
        &self,
        mut rows: Vec<T>,
        limit: u32,
        prev_cursor: Option<String>,
    ) -> KeysetPage<T> {
        let limit_len = limit as usize;
        let has_next = rows.len() > limit_len;
        if has_next {
            rows.truncate(limit_len);
        }

        let next_cursor = if has_next {
            rows.last().map(|row| {
                let position = row.position();
                self.encode_cursor(position.created_at, position.id)
            })
        } else {
            None
        };

        KeysetPage {
            pagination: KeysetPageMeta {
                has_next,
                has_prev: prev_cursor.is_some(),
                limit,
                next_cursor,
                prev_cursor,
                count: rows.len(),
            },
            items: rows,
        }
    }
}

impl Default for KeysetPaginator {
    fn default() -> Self {
        Self::DESC
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Metadata describing one keyset page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeysetPageMeta {
    /// Whether more rows follow this page.
    pub has_next: bool,
    /// Whether a previous-page cursor was supplied.
    pub has_prev: bool,
    /// Requested page size.
    pub limit: u32,
    /// Cursor of the next page, `null` on the last page.
    pub next_cursor: Option<String>,
    /// Cursor of the previous page, omitted when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_cursor: Option<String>,
    /// Number of items on this page.
    pub count: usize,
}

/// A page of results with its keyset metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeysetPage<T> {
    /// Information about this page.
    pub pagination: KeysetPageMeta,
    /// The items on this page.
    pub items: Vec<T>,
}

impl<T> KeysetPage<T> {
    /// Maps the page content to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> KeysetPage<U> {
        KeysetPage {
            pagination: self.pagination,
            items: self.items.into_iter().map(f).collect(),
        }
    }

    /// Returns true if the page is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
