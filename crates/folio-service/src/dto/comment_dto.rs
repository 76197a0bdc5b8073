//! Comment-related DTOs.

use chrono::{DateTime, Utc};
use folio_core::{BlogComment, CommentId, UserId, UserRole};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to post a comment or a reply.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(
        length(min = 1, max = 255, message = "Comment must be 1-255 characters"),
        custom(function = "folio_core::rules::not_blank")
    )]
    pub comment: String,
    pub parent_id: Option<CommentId>,
}

/// Request to edit a comment.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[validate(
        length(min = 1, max = 255, message = "Comment must be 1-255 characters"),
        custom(function = "folio_core::rules::not_blank")
    )]
    pub comment: String,
}

/// A comment with its replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentNode {
    pub comment_id: CommentId,
    pub user_id: UserId,
    pub username: Option<String>,
    pub user_role: UserRole,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CommentNode>,
}

impl From<BlogComment> for CommentNode {
    fn from(comment: BlogComment) -> Self {
        Self {
            comment_id: comment.id,
            user_id: comment.user_id,
            username: comment.username,
            user_role: comment.user_role,
            comment: comment.comment,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
            children: Vec::new(),
        }
    }
}
