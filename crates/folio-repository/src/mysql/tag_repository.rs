//! MySQL tag repository implementation.

use crate::query::{from_sql_count, to_sql_count};
use crate::{traits::TagRepository, DatabasePoolInterface, TimeWindow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use folio_core::{FolioError, FolioResult, MonthlyCounts, OffsetRequest, Tag, TagId};
use shaku::Component;
use sqlx::{FromRow, MySql, QueryBuilder};
use std::sync::Arc;
use tracing::debug;

/// MySQL tag repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = TagRepository)]
pub struct MySqlTagRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlTagRepository {
    /// Creates a new MySQL tag repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TagRow {
    id: i64,
    chinese_title: String,
    english_title: String,
    slug: String,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<TagRow> for Tag {
    fn from(row: TagRow) -> Self {
        Tag {
            id: TagId(row.id),
            chinese_title: row.chinese_title,
            english_title: row.english_title,
            slug: row.slug,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl TagRepository for MySqlTagRepository {
    async fn count(&self) -> FolioResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tags")
            .fetch_one(self.pool.inner())
            .await?;
        Ok(from_sql_count(total))
    }

    async fn find_all(&self, page: OffsetRequest) -> FolioResult<Vec<Tag>> {
        debug!(page = page.page, size = page.size, "Listing tags");

        let rows = sqlx::query_as::<_, TagRow>(
            r#"
            SELECT id, chinese_title, english_title, slug, created_at, updated_at
            FROM tags
            ORDER BY created_at DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(to_sql_count(page.limit()))
        .bind(to_sql_count(page.offset()))
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(Tag::from).collect())
    }

    async fn find_by_id(&self, id: TagId) -> FolioResult<Option<Tag>> {
        let row = sqlx::query_as::<_, TagRow>(
            "SELECT id, chinese_title, english_title, slug, created_at, updated_at FROM tags WHERE id = ?",
        )
        .bind(id.0)
        .fetch_optional(self.pool.inner())
        .await?;
        Ok(row.map(Tag::from))
    }

    async fn find_by_slug(&self, slug: &str) -> FolioResult<Option<Tag>> {
        debug!("Finding tag by slug: {}", slug);

        let row = sqlx::query_as::<_, TagRow>(
            "SELECT id, chinese_title, english_title, slug, created_at, updated_at FROM tags WHERE slug = ?",
        )
        .bind(slug)
        .fetch_optional(self.pool.inner())
        .await?;
        Ok(row.map(Tag::from))
    }

    async fn exists_by_title(&self, chinese_title: &str, exclude: Option<TagId>) -> FolioResult<bool> {
        let mut builder = QueryBuilder::<MySql>::new("SELECT COUNT(*) FROM tags WHERE chinese_title = ");
        builder.push_bind(chinese_title);
        if let Some(id) = exclude {
            builder.push(" AND id <> ").push_bind(id.0);
        }
        let total: i64 = builder
            .build_query_scalar::<i64>()
            .fetch_one(self.pool.inner())
            .await?;
        Ok(total > 0)
    }

    async fn insert(&self, chinese_title: &str, english_title: &str, slug: &str) -> FolioResult<Tag> {
        debug!("Inserting tag: {}", slug);

        let result = sqlx::query(
            "INSERT INTO tags (chinese_title, english_title, slug, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(chinese_title)
        .bind(english_title)
        .bind(slug)
        .bind(Utc::now())
        .execute(self.pool.inner())
        .await?;

        let id = TagId(i64::try_from(result.last_insert_id()).map_err(|e| {
            FolioError::Internal(format!("Tag id out of range: {}", e))
        })?);

        self.find_by_id(id)
            .await?
            .ok_or_else(|| FolioError::Internal("Failed to fetch inserted tag".to_string()))
    }

    async fn update(&self, tag: &Tag) -> FolioResult<Tag> {
        debug!("Updating tag: {}", tag.id);

        sqlx::query(
            "UPDATE tags SET chinese_title = ?, english_title = ?, slug = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&tag.chinese_title)
        .bind(&tag.english_title)
        .bind(&tag.slug)
        .bind(tag.updated_at.unwrap_or_else(Utc::now))
        .bind(tag.id.0)
        .execute(self.pool.inner())
        .await?;

        self.find_by_id(tag.id)
            .await?
            .ok_or_else(|| FolioError::not_found("Tag", tag.id))
    }

    async fn delete(&self, id: TagId) -> FolioResult<bool> {
        debug!("Deleting tag: {}", id);

        let result = sqlx::query("DELETE FROM tags WHERE id = ?")
            .bind(id.0)
            .execute(self.pool.inner())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn monthly_counts(&self, window: TimeWindow) -> FolioResult<MonthlyCounts> {
        let (start, end) = window;
        let (created, updated): (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM tags WHERE created_at >= ? AND created_at < ?),
                (SELECT COUNT(*) FROM tags WHERE updated_at >= ? AND updated_at < ?)
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(start)
        .bind(end)
        .fetch_one(self.pool.inner())
        .await?;

        Ok(MonthlyCounts {
            created: from_sql_count(created),
            updated: from_sql_count(updated),
        })
    }
}

impl std::fmt::Debug for MySqlTagRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlTagRepository").finish_non_exhaustive()
    }
}
