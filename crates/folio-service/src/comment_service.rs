//! Comment service trait definition.

use crate::dto::{CommentNode, CreateCommentRequest, UpdateCommentRequest};
use async_trait::async_trait;
use folio_core::{Actor, BlogId, CommentId, FolioResult, Interface, KeysetPage};

/// Comment service trait.
#[async_trait]
pub trait CommentService: Interface + Send + Sync {
    /// Lists a page of top-level comments of a blog with their replies.
    async fn list_comments(
        &self,
        blog_id: BlogId,
        cursor: Option<&str>,
        limit: Option<u32>,
    ) -> FolioResult<KeysetPage<CommentNode>>;

    /// Posts a comment, or a reply when `parent_id` is set.
    async fn create_comment(
        &self,
        actor: Actor,
        blog_id: BlogId,
        request: CreateCommentRequest,
    ) -> FolioResult<CommentNode>;

    /// Edits a comment (author only).
    async fn update_comment(
        &self,
        actor: Actor,
        id: CommentId,
        request: UpdateCommentRequest,
    ) -> FolioResult<CommentNode>;

    /// Hides a comment (author or admin).
    async fn delete_comment(&self, actor: Actor, id: CommentId) -> FolioResult<()>;
}
