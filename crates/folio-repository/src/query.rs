//! SQL fragments shared by the paginated repository queries.
//!
//! Every list query is assembled with [`sqlx::QueryBuilder`] so that the
//! keyset predicate, the ordering and the `LIMIT` clause are always written
//! the same way.

use folio_core::{CursorPosition, KeysetPaginator, OffsetRequest, SortDirection};
use sqlx::{MySql, QueryBuilder};

/// The slice of a keyset ordered listing a repository should load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeysetWindow {
    /// Last row the client has seen; `None` for the first page.
    pub after: Option<CursorPosition>,
    /// Sort direction over `(created_at, id)`.
    pub direction: SortDirection,
    /// Page size requested by the client.
    pub limit: u32,
}

impl KeysetWindow {
    /// Decodes `cursor` with `paginator`; an unreadable cursor yields the first page.
    #[must_use]
    pub fn new(paginator: &KeysetPaginator, cursor: Option<&str>, limit: u32) -> Self {
        Self {
            after: paginator.decode_cursor(cursor),
            direction: paginator.direction(),
            limit,
        }
    }

    /// Rows to fetch: one past the page to detect `has_next`.
    #[must_use]
    pub const fn fetch_limit(&self) -> u64 {
        KeysetPaginator::fetch_limit(self.limit)
    }
}

/// Appends ` AND (<row strictly past position>)` for `table`.
///
/// Nothing is appended when `position` is `None`.
pub fn push_keyset_filter(
    builder: &mut QueryBuilder<'_, MySql>,
    table: &str,
    position: Option<CursorPosition>,
    direction: SortDirection,
) {
    let Some(position) = position else {
        return;
    };
    let op = direction.comparison_operator();

    builder
        .push(" AND (")
        .push(table)
        .push(".created_at ")
        .push(op)
        .push(" ")
        .push_bind(position.created_at)
        .push(" OR (")
        .push(table)
        .push(".created_at = ")
        .push_bind(position.created_at)
        .push(" AND ")
        .push(table)
        .push(".id ")
        .push(op)
        .push(" ")
        .push_bind(position.id)
        .push("))");
}

/// Appends ` ORDER BY t.created_at {dir}, t.id {dir}`.
pub fn push_keyset_order(builder: &mut QueryBuilder<'_, MySql>, table: &str, direction: SortDirection) {
    let dir = direction.as_sql();
    builder
        .push(" ORDER BY ")
        .push(table)
        .push(".created_at ")
        .push(dir)
        .push(", ")
        .push(table)
        .push(".id ")
        .push(dir);
}

/// Appends the keyset filter, ordering and `LIMIT` for `window`.
pub fn push_keyset_window(builder: &mut QueryBuilder<'_, MySql>, table: &str, window: &KeysetWindow) {
    push_keyset_filter(builder, table, window.after, window.direction);
    push_keyset_order(builder, table, window.direction);
    builder.push(" LIMIT ").push_bind(to_sql_count(window.fetch_limit()));
}

/// Appends ` LIMIT ? OFFSET ?` for an offset page.
pub fn push_offset_window(builder: &mut QueryBuilder<'_, MySql>, request: OffsetRequest) {
    builder
        .push(" LIMIT ")
        .push_bind(to_sql_count(request.limit()))
        .push(" OFFSET ")
        .push_bind(to_sql_count(request.offset()));
}

/// Appends `column IN (?, ?, ...)`. Callers must not pass an empty slice.
pub fn push_id_list(builder: &mut QueryBuilder<'_, MySql>, column: &str, ids: &[i64]) {
    builder.push(column).push(" IN (");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
}

/// Converts an unsigned row count to the signed type MySQL binds.
#[must_use]
pub fn to_sql_count(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Converts a `COUNT(*)` result back to an unsigned count.
#[must_use]
pub fn from_sql_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}
