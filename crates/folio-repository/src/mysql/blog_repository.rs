//! MySQL blog repository implementation.

use crate::query::{
    from_sql_count, push_id_list, push_keyset_filter, push_keyset_order, push_keyset_window,
    push_offset_window,
};
use crate::{traits::BlogRepository, DatabasePoolInterface, KeysetWindow, TimeWindow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use folio_core::{
    Blog, BlogDraft, BlogId, BlogStats, BlogStatus, BlogStatusChange, BlogTag, CursorPosition,
    FolioError, FolioResult, MonthlyCounts, OffsetRequest, PopularBlog, SavedBlog, SectionId,
    SortDirection, TagId, UserId,
};
use shaku::Component;
use sqlx::{FromRow, MySql, MySqlConnection, QueryBuilder};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Columns of a blog joined with its status flags. Always aliases `blogs b`
/// and `blog_status s`.
const BLOG_SELECT: &str = r#"
    SELECT b.id, b.user_id, b.section_id, b.slug, b.chinese_title, b.english_title,
           b.chinese_description, b.english_description, b.chinese_content, b.english_content,
           s.is_published, s.is_archived, s.is_featured, b.created_at, b.updated_at
    FROM blogs b
    INNER JOIN blog_status s ON s.blog_id = b.id
"#;

/// [`BLOG_SELECT`] plus the counters, restricted to published blogs.
const POPULAR_SELECT: &str = r#"
    SELECT b.id, b.user_id, b.section_id, b.slug, b.chinese_title, b.english_title,
           b.chinese_description, b.english_description, b.chinese_content, b.english_content,
           s.is_published, s.is_archived, s.is_featured, b.created_at, b.updated_at,
           st.views, st.likes, st.comments, st.saves
    FROM blogs b
    INNER JOIN blog_status s ON s.blog_id = b.id
    INNER JOIN blog_stats st ON st.blog_id = b.id
    WHERE s.is_published = TRUE
    ORDER BY (st.views + st.likes + st.comments + st.saves) DESC, b.created_at DESC, b.id DESC
    LIMIT ?
"#;

/// MySQL blog repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = BlogRepository)]
pub struct MySqlBlogRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlBlogRepository {
    /// Creates a new MySQL blog repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }

    async fn fetch_blogs(&self, mut builder: QueryBuilder<'_, MySql>) -> FolioResult<Vec<Blog>> {
        let rows = builder
            .build_query_as::<BlogRow>()
            .fetch_all(self.pool.inner())
            .await?;
        Ok(rows.into_iter().map(Blog::from).collect())
    }

    async fn count_with(&self, mut builder: QueryBuilder<'_, MySql>) -> FolioResult<u64> {
        let total: i64 = builder
            .build_query_scalar::<i64>()
            .fetch_one(self.pool.inner())
            .await?;
        Ok(from_sql_count(total))
    }
}

/// Database row representation of a blog.
#[derive(Debug, FromRow)]
struct BlogRow {
    id: i64,
    user_id: Option<i64>,
    section_id: i64,
    slug: String,
    chinese_title: String,
    english_title: Option<String>,
    chinese_description: Option<String>,
    english_description: Option<String>,
    chinese_content: serde_json::Value,
    english_content: Option<serde_json::Value>,
    is_published: bool,
    is_archived: bool,
    is_featured: bool,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<BlogRow> for Blog {
    fn from(row: BlogRow) -> Self {
        Blog {
            id: BlogId(row.id),
            user_id: row.user_id.map(UserId),
            section_id: SectionId(row.section_id),
            slug: row.slug,
            chinese_title: row.chinese_title,
            english_title: row.english_title,
            chinese_description: row.chinese_description,
            english_description: row.english_description,
            chinese_content: row.chinese_content,
            english_content: row.english_content,
            status: BlogStatus {
                is_published: row.is_published,
                is_archived: row.is_archived,
                is_featured: row.is_featured,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct BlogTagRow {
    blog_id: i64,
    tag_id: i64,
    slug: String,
    chinese_title: String,
    english_title: String,
}

#[derive(Debug, FromRow)]
struct BlogStatsRow {
    blog_id: i64,
    views: i64,
    likes: i64,
    comments: i64,
    saves: i64,
}

#[derive(Debug, FromRow)]
struct PopularBlogRow {
    views: i64,
    likes: i64,
    comments: i64,
    saves: i64,
    #[sqlx(flatten)]
    blog: BlogRow,
}

impl From<PopularBlogRow> for PopularBlog {
    fn from(row: PopularBlogRow) -> Self {
        PopularBlog {
            blog: row.blog.into(),
            stats: BlogStats {
                views: row.views,
                likes: row.likes,
                comments: row.comments,
                saves: row.saves,
            },
        }
    }
}

#[derive(Debug, FromRow)]
struct SavedBlogRow {
    saved_by: i64,
    saved_at: DateTime<Utc>,
    #[sqlx(flatten)]
    blog: BlogRow,
}

async fn insert_tags(conn: &mut MySqlConnection, id: BlogId, tag_ids: &[TagId]) -> FolioResult<()> {
    if tag_ids.is_empty() {
        return Ok(());
    }
    let mut builder = QueryBuilder::<MySql>::new("INSERT INTO blog_tags (blog_id, tag_id) ");
    builder.push_values(tag_ids, |mut row, tag_id| {
        row.push_bind(id.0).push_bind(tag_id.0);
    });
    builder.build().execute(conn).await?;
    Ok(())
}

#[async_trait]
impl BlogRepository for MySqlBlogRepository {
    async fn find_by_id(&self, id: BlogId) -> FolioResult<Option<Blog>> {
        debug!("Finding blog by id: {}", id);

        let mut builder = QueryBuilder::new(BLOG_SELECT);
        builder.push(" WHERE b.id = ").push_bind(id.0);
        let row = builder
            .build_query_as::<BlogRow>()
            .fetch_optional(self.pool.inner())
            .await?;
        Ok(row.map(Blog::from))
    }

    async fn find_by_slug(&self, slug: &str) -> FolioResult<Option<Blog>> {
        debug!("Finding blog by slug: {}", slug);

        let mut builder = QueryBuilder::new(BLOG_SELECT);
        builder.push(" WHERE b.slug = ").push_bind(slug);
        let row = builder
            .build_query_as::<BlogRow>()
            .fetch_optional(self.pool.inner())
            .await?;
        Ok(row.map(Blog::from))
    }

    async fn count_by_section(&self, section_id: SectionId, published_only: bool) -> FolioResult<u64> {
        let mut builder = QueryBuilder::new(
            "SELECT COUNT(*) FROM blogs b INNER JOIN blog_status s ON s.blog_id = b.id WHERE b.section_id = ",
        );
        builder.push_bind(section_id.0);
        if published_only {
            builder.push(" AND s.is_published = TRUE");
        }
        self.count_with(builder).await
    }

    async fn find_by_section(
        &self,
        section_id: SectionId,
        published_only: bool,
        page: OffsetRequest,
    ) -> FolioResult<Vec<Blog>> {
        debug!(
            section_id = %section_id,
            published_only,
            page = page.page,
            size = page.size,
            "Listing blogs of section"
        );

        let mut builder = QueryBuilder::new(BLOG_SELECT);
        builder.push(" WHERE b.section_id = ").push_bind(section_id.0);
        if published_only {
            builder.push(" AND s.is_published = TRUE");
        }
        push_keyset_order(&mut builder, "b", SortDirection::Desc);
        push_offset_window(&mut builder, page);
        self.fetch_blogs(builder).await
    }

    async fn count_by_tag(&self, tag_id: TagId) -> FolioResult<u64> {
        let mut builder = QueryBuilder::new(
            r#"
            SELECT COUNT(*) FROM blogs b
            INNER JOIN blog_status s ON s.blog_id = b.id
            INNER JOIN blog_tags bt ON bt.blog_id = b.id
            WHERE s.is_published = TRUE AND bt.tag_id = "#,
        );
        builder.push_bind(tag_id.0);
        self.count_with(builder).await
    }

    async fn find_by_tag(&self, tag_id: TagId, page: OffsetRequest) -> FolioResult<Vec<Blog>> {
        debug!(tag_id = %tag_id, page = page.page, size = page.size, "Listing blogs by tag");

        let mut builder = QueryBuilder::new(BLOG_SELECT);
        builder
            .push(" INNER JOIN blog_tags bt ON bt.blog_id = b.id")
            .push(" WHERE s.is_published = TRUE AND bt.tag_id = ")
            .push_bind(tag_id.0);
        push_keyset_order(&mut builder, "b", SortDirection::Desc);
        push_offset_window(&mut builder, page);
        self.fetch_blogs(builder).await
    }

    async fn find_archived(&self, window: &KeysetWindow) -> FolioResult<Vec<Blog>> {
        debug!(limit = window.limit, has_cursor = window.after.is_some(), "Listing archived blogs");

        let mut builder = QueryBuilder::new(BLOG_SELECT);
        builder.push(" WHERE s.is_archived = TRUE");
        push_keyset_window(&mut builder, "b", window);
        self.fetch_blogs(builder).await
    }

    async fn find_adjacent(
        &self,
        section_id: SectionId,
        position: CursorPosition,
        direction: SortDirection,
    ) -> FolioResult<Option<Blog>> {
        let mut builder = QueryBuilder::new(BLOG_SELECT);
        builder
            .push(" WHERE s.is_published = TRUE AND b.section_id = ")
            .push_bind(section_id.0);
        push_keyset_filter(&mut builder, "b", Some(position), direction);
        push_keyset_order(&mut builder, "b", direction);
        builder.push(" LIMIT 1");

        let row = builder
            .build_query_as::<BlogRow>()
            .fetch_optional(self.pool.inner())
            .await?;
        Ok(row.map(Blog::from))
    }

    async fn find_tags(&self, ids: &[BlogId]) -> FolioResult<Vec<BlogTag>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw: Vec<i64> = ids.iter().map(|id| id.0).collect();
        let mut builder = QueryBuilder::new(
            r#"
            SELECT bt.blog_id, t.id AS tag_id, t.slug, t.chinese_title, t.english_title
            FROM blog_tags bt
            INNER JOIN tags t ON t.id = bt.tag_id
            WHERE "#,
        );
        push_id_list(&mut builder, "bt.blog_id", &raw);
        builder.push(" ORDER BY bt.blog_id, t.id");

        let rows = builder
            .build_query_as::<BlogTagRow>()
            .fetch_all(self.pool.inner())
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| BlogTag {
                blog_id: BlogId(row.blog_id),
                tag_id: TagId(row.tag_id),
                slug: row.slug,
                chinese_title: row.chinese_title,
                english_title: row.english_title,
            })
            .collect())
    }

    async fn find_stats(&self, ids: &[BlogId]) -> FolioResult<HashMap<BlogId, BlogStats>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let raw: Vec<i64> = ids.iter().map(|id| id.0).collect();
        let mut builder = QueryBuilder::new(
            "SELECT blog_id, views, likes, comments, saves FROM blog_stats WHERE ",
        );
        push_id_list(&mut builder, "blog_id", &raw);

        let rows = builder
            .build_query_as::<BlogStatsRow>()
            .fetch_all(self.pool.inner())
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                (
                    BlogId(row.blog_id),
                    BlogStats {
                        views: row.views,
                        likes: row.likes,
                        comments: row.comments,
                        saves: row.saves,
                    },
                )
            })
            .collect())
    }

    async fn monthly_counts(&self, section_id: SectionId, window: TimeWindow) -> FolioResult<MonthlyCounts> {
        let (start, end) = window;

        let created: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM blogs WHERE section_id = ? AND created_at >= ? AND created_at < ?",
        )
        .bind(section_id.0)
        .bind(start)
        .bind(end)
        .fetch_one(self.pool.inner())
        .await?;

        let updated: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM blogs WHERE section_id = ? AND updated_at >= ? AND updated_at < ?",
        )
        .bind(section_id.0)
        .bind(start)
        .bind(end)
        .fetch_one(self.pool.inner())
        .await?;

        Ok(MonthlyCounts {
            created: from_sql_count(created),
            updated: from_sql_count(updated),
        })
    }

    async fn insert(&self, author: UserId, slug: &str, draft: &BlogDraft) -> FolioResult<Blog> {
        debug!("Inserting blog: {}", slug);

        let mut tx = self.pool.inner().begin().await?;

        // MySQL doesn't support RETURNING, so insert then select
        let result = sqlx::query(
            r#"
            INSERT INTO blogs (user_id, section_id, slug, chinese_title, english_title,
                               chinese_description, english_description,
                               chinese_content, english_content, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(author.0)
        .bind(draft.section_id.0)
        .bind(slug)
        .bind(&draft.chinese_title)
        .bind(&draft.english_title)
        .bind(&draft.chinese_description)
        .bind(&draft.english_description)
        .bind(&draft.chinese_content)
        .bind(&draft.english_content)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        let id = BlogId(i64::try_from(result.last_insert_id()).map_err(|e| {
            FolioError::Internal(format!("Blog id out of range: {}", e))
        })?);

        sqlx::query("INSERT INTO blog_status (blog_id) VALUES (?)")
            .bind(id.0)
            .execute(&mut *tx)
            .await?;
        sqlx::query("INSERT INTO blog_stats (blog_id) VALUES (?)")
            .bind(id.0)
            .execute(&mut *tx)
            .await?;
        insert_tags(&mut *tx, id, &draft.tag_ids).await?;

        tx.commit().await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| FolioError::Internal("Failed to fetch inserted blog".to_string()))
    }

    async fn update(&self, blog: &Blog) -> FolioResult<Blog> {
        debug!("Updating blog: {}", blog.id);

        sqlx::query(
            r#"
            UPDATE blogs
            SET section_id = ?, slug = ?, chinese_title = ?, english_title = ?,
                chinese_description = ?, english_description = ?,
                chinese_content = ?, english_content = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(blog.section_id.0)
        .bind(&blog.slug)
        .bind(&blog.chinese_title)
        .bind(&blog.english_title)
        .bind(&blog.chinese_description)
        .bind(&blog.english_description)
        .bind(&blog.chinese_content)
        .bind(&blog.english_content)
        .bind(blog.updated_at.unwrap_or_else(Utc::now))
        .bind(blog.id.0)
        .execute(self.pool.inner())
        .await?;

        self.find_by_id(blog.id)
            .await?
            .ok_or_else(|| FolioError::not_found("Blog", blog.id))
    }

    async fn replace_tags(&self, id: BlogId, tag_ids: &[TagId]) -> FolioResult<()> {
        debug!(blog_id = %id, count = tag_ids.len(), "Replacing blog tags");

        let mut tx = self.pool.inner().begin().await?;
        sqlx::query("DELETE FROM blog_tags WHERE blog_id = ?")
            .bind(id.0)
            .execute(&mut *tx)
            .await?;
        insert_tags(&mut *tx, id, tag_ids).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn update_status(&self, id: BlogId, change: BlogStatusChange) -> FolioResult<()> {
        debug!(blog_id = %id, column = change.column(), value = change.value(), "Updating blog status");

        let mut builder = QueryBuilder::<MySql>::new("UPDATE blog_status SET ");
        builder
            .push(change.column())
            .push(" = ")
            .push_bind(change.value())
            .push(", updated_at = ")
            .push_bind(Utc::now())
            .push(" WHERE blog_id = ")
            .push_bind(id.0);
        builder.build().execute(self.pool.inner()).await?;
        Ok(())
    }

    async fn delete(&self, id: BlogId) -> FolioResult<bool> {
        debug!("Deleting blog: {}", id);

        let result = sqlx::query("DELETE FROM blogs WHERE id = ?")
            .bind(id.0)
            .execute(self.pool.inner())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn toggle_saved(&self, user_id: UserId, id: BlogId) -> FolioResult<bool> {
        let mut tx = self.pool.inner().begin().await?;

        let existing: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM saved_blogs WHERE user_id = ? AND blog_id = ? FOR UPDATE",
        )
        .bind(user_id.0)
        .bind(id.0)
        .fetch_optional(&mut *tx)
        .await?;

        let saved = if let Some(saved_id) = existing {
            sqlx::query("DELETE FROM saved_blogs WHERE id = ?")
                .bind(saved_id)
                .execute(&mut *tx)
                .await?;
            sqlx::query("UPDATE blog_stats SET saves = saves - 1 WHERE blog_id = ? AND saves > 0")
                .bind(id.0)
                .execute(&mut *tx)
                .await?;
            false
        } else {
            sqlx::query("INSERT INTO saved_blogs (user_id, blog_id, created_at) VALUES (?, ?, ?)")
                .bind(user_id.0)
                .bind(id.0)
                .bind(Utc::now())
                .execute(&mut *tx)
                .await?;
            sqlx::query("UPDATE blog_stats SET saves = saves + 1 WHERE blog_id = ?")
                .bind(id.0)
                .execute(&mut *tx)
                .await?;
            true
        };

        tx.commit().await?;
        debug!(user_id = %user_id, blog_id = %id, saved, "Toggled saved blog");
        Ok(saved)
    }

    async fn count_saved(&self, user_id: UserId) -> FolioResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM saved_blogs WHERE user_id = ?")
            .bind(user_id.0)
            .fetch_one(self.pool.inner())
            .await?;
        Ok(from_sql_count(total))
    }

    async fn find_saved(&self, user_id: UserId, page: OffsetRequest) -> FolioResult<Vec<SavedBlog>> {
        debug!(user_id = %user_id, page = page.page, size = page.size, "Listing saved blogs");

        let mut builder = QueryBuilder::new(
            r#"
            SELECT sb.user_id AS saved_by, sb.created_at AS saved_at,
                   b.id, b.user_id, b.section_id, b.slug, b.chinese_title, b.english_title,
                   b.chinese_description, b.english_description, b.chinese_content, b.english_content,
                   s.is_published, s.is_archived, s.is_featured, b.created_at, b.updated_at
            FROM saved_blogs sb
            INNER JOIN blogs b ON b.id = sb.blog_id
            INNER JOIN blog_status s ON s.blog_id = b.id
            WHERE sb.user_id = "#,
        );
        builder.push_bind(user_id.0);
        push_keyset_order(&mut builder, "sb", SortDirection::Desc);
        push_offset_window(&mut builder, page);

        let rows = builder
            .build_query_as::<SavedBlogRow>()
            .fetch_all(self.pool.inner())
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| SavedBlog {
                user_id: UserId(row.saved_by),
                saved_at: row.saved_at,
                blog: Blog::from(row.blog),
            })
            .collect())
    }

    async fn count_saved_between(&self, user_id: UserId, window: TimeWindow) -> FolioResult<u64> {
        let (start, end) = window;
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM saved_blogs WHERE user_id = ? AND created_at >= ? AND created_at < ?",
        )
        .bind(user_id.0)
        .bind(start)
        .bind(end)
        .fetch_one(self.pool.inner())
        .await?;
        Ok(from_sql_count(total))
    }

    async fn increment_views(&self, id: BlogId) -> FolioResult<()> {
        sqlx::query("UPDATE blog_stats SET views = views + 1 WHERE blog_id = ?")
            .bind(id.0)
            .execute(self.pool.inner())
            .await?;
        Ok(())
    }

    async fn adjust_likes(&self, id: BlogId, delta: i64) -> FolioResult<()> {
        debug!(blog_id = %id, delta, "Adjusting likes");

        sqlx::query("UPDATE blog_stats SET likes = GREATEST(likes + ?, 0) WHERE blog_id = ?")
            .bind(delta)
            .bind(id.0)
            .execute(self.pool.inner())
            .await?;
        Ok(())
    }

    async fn find_popular(&self, limit: u32) -> FolioResult<Vec<PopularBlog>> {
        debug!(limit, "Ranking popular blogs");

        let rows = sqlx::query_as::<_, PopularBlogRow>(POPULAR_SELECT)
            .bind(limit)
            .fetch_all(self.pool.inner())
            .await?;
        Ok(rows.into_iter().map(PopularBlog::from).collect())
    }
}

impl std::fmt::Debug for MySqlBlogRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlBlogRepository").finish_non_exhaustive()
    }
}
