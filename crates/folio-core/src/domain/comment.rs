//! Blog comment entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{BlogId, CommentId, CursorPosition, KeysetRow, UserId, UserRole};

/// A comment on a blog post. Replies point at their parent; deletion is soft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogComment {
    /// Unique identifier.
    pub id: CommentId,
    /// Commented post.
    pub blog_id: BlogId,
    /// Author.
    pub user_id: UserId,
    /// Author's display name.
    pub username: Option<String>,
    /// Author's role.
    pub user_role: UserRole,
    /// Comment text.
    pub comment: String,
    /// Soft deletion flag.
    pub is_deleted: bool,
    /// Parent comment for replies.
    pub parent_id: Option<CommentId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last edit timestamp.
    pub updated_at: Option<DateTime<Utc>>,
}

impl BlogComment {
    /// Returns true for top-level comments.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

impl KeysetRow for BlogComment {
    fn position(&self) -> CursorPosition {
        CursorPosition::new(self.created_at, self.id.0)
    }
}
