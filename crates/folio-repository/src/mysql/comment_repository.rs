//! MySQL blog comment repository implementation.

use crate::query::{push_id_list, push_keyset_window};
use crate::{traits::CommentRepository, DatabasePoolInterface, KeysetWindow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use folio_core::{
    BlogComment, BlogId, CommentId, FolioError, FolioResult, UserId, UserRole,
};
use shaku::Component;
use sqlx::{FromRow, QueryBuilder};
use std::sync::Arc;
use tracing::debug;

/// Comment columns joined with the author's name and role.
const COMMENT_SELECT: &str = r#"
    SELECT c.id, c.blog_id, c.user_id, u.username, u.role AS user_role,
           c.comment, c.is_deleted, c.parent_id, c.created_at, c.updated_at
    FROM blog_comments c
    LEFT JOIN users u ON u.id = c.user_id
"#;

/// MySQL blog comment repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = CommentRepository)]
pub struct MySqlCommentRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlCommentRepository {
    /// Creates a new MySQL comment repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a comment.
#[derive(Debug, FromRow)]
struct CommentRow {
    id: i64,
    blog_id: i64,
    user_id: i64,
    username: Option<String>,
    user_role: Option<String>,
    comment: String,
    is_deleted: bool,
    parent_id: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<CommentRow> for BlogComment {
    fn from(row: CommentRow) -> Self {
        BlogComment {
            id: CommentId(row.id),
            blog_id: BlogId(row.blog_id),
            user_id: UserId(row.user_id),
            username: row.username,
            user_role: row
                .user_role
                .as_deref()
                .and_then(UserRole::parse)
                .unwrap_or_default(),
            comment: row.comment,
            is_deleted: row.is_deleted,
            parent_id: row.parent_id.map(CommentId),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl CommentRepository for MySqlCommentRepository {
    async fn find_roots(&self, blog_id: BlogId, window: &KeysetWindow) -> FolioResult<Vec<BlogComment>> {
        debug!(blog_id = %blog_id, limit = window.limit, "Listing top-level comments");

        let mut builder = QueryBuilder::new(COMMENT_SELECT);
        builder
            .push(" WHERE c.parent_id IS NULL AND c.is_deleted = FALSE AND c.blog_id = ")
            .push_bind(blog_id.0);
        push_keyset_window(&mut builder, "c", window);

        let rows = builder
            .build_query_as::<CommentRow>()
            .fetch_all(self.pool.inner())
            .await?;
        Ok(rows.into_iter().map(BlogComment::from).collect())
    }

    async fn find_children(&self, parent_ids: &[CommentId]) -> FolioResult<Vec<BlogComment>> {
        if parent_ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw: Vec<i64> = parent_ids.iter().map(|id| id.0).collect();
        let mut builder = QueryBuilder::new(COMMENT_SELECT);
        builder.push(" WHERE c.is_deleted = FALSE AND ");
        push_id_list(&mut builder, "c.parent_id", &raw);
        builder.push(" ORDER BY c.created_at ASC, c.id ASC");

        let rows = builder
            .build_query_as::<CommentRow>()
            .fetch_all(self.pool.inner())
            .await?;
        Ok(rows.into_iter().map(BlogComment::from).collect())
    }

    async fn find_by_id(&self, id: CommentId) -> FolioResult<Option<BlogComment>> {
        debug!("Finding comment by id: {}", id);

        let mut builder = QueryBuilder::new(COMMENT_SELECT);
        builder.push(" WHERE c.id = ").push_bind(id.0);
        let row = builder
            .build_query_as::<CommentRow>()
            .fetch_optional(self.pool.inner())
            .await?;
        Ok(row.map(BlogComment::from))
    }

    async fn insert(
        &self,
        blog_id: BlogId,
        user_id: UserId,
        parent_id: Option<CommentId>,
        text: &str,
    ) -> FolioResult<BlogComment> {
        debug!(blog_id = %blog_id, user_id = %user_id, reply = parent_id.is_some(), "Inserting comment");

        let mut tx = self.pool.inner().begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO blog_comments (blog_id, user_id, comment, parent_id, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(blog_id.0)
        .bind(user_id.0)
        .bind(text)
        .bind(parent_id.map(|id| id.0))
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;
        sqlx::query("UPDATE blog_stats SET comments = comments + 1 WHERE blog_id = ?")
            .bind(blog_id.0)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let id = CommentId(i64::try_from(result.last_insert_id()).map_err(|e| {
            FolioError::Internal(format!("Comment id out of range: {}", e))
        })?);

        self.find_by_id(id)
            .await?
            .ok_or_else(|| FolioError::Internal("Failed to fetch inserted comment".to_string()))
    }

    async fn update_text(&self, id: CommentId, text: &str) -> FolioResult<BlogComment> {
        debug!("Updating comment: {}", id);

        sqlx::query("UPDATE blog_comments SET comment = ?, updated_at = ? WHERE id = ?")
            .bind(text)
            .bind(Utc::now())
            .bind(id.0)
            .execute(self.pool.inner())
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| FolioError::not_found("Comment", id))
    }

    async fn soft_delete(&self, id: CommentId) -> FolioResult<bool> {
        debug!("Soft deleting comment: {}", id);

        let mut tx = self.pool.inner().begin().await?;

        let result = sqlx::query(
            "UPDATE blog_comments SET is_deleted = TRUE, updated_at = ? WHERE id = ? AND is_deleted = FALSE",
        )
        .bind(Utc::now())
        .bind(id.0)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query(
            r#"
            UPDATE blog_stats SET comments = comments - 1
            WHERE blog_id = (SELECT blog_id FROM blog_comments WHERE id = ?) AND comments > 0
            "#,
        )
        .bind(id.0)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }
}

impl std::fmt::Debug for MySqlCommentRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlCommentRepository").finish_non_exhaustive()
    }
}
