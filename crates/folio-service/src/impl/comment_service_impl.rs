//! Comment service implementation.

use crate::cache::{cache_keys, CacheExt, CacheInterface};
use crate::comment_service::CommentService;
use crate::dto::{CommentNode, CreateCommentRequest, UpdateCommentRequest};
use crate::settings::ServiceSettings;
use async_trait::async_trait;
use folio_core::{
    Actor, BlogComment, BlogId, CommentId, FolioError, FolioResult, KeysetPage, KeysetPaginator,
    ValidateExt,
};
use folio_repository::{BlogRepository, CommentRepository, KeysetWindow};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Deepest reply level below a top-level comment.
const MAX_REPLY_DEPTH: usize = 2;

/// Comment service backed by the comment and blog repositories.
pub struct CommentServiceImpl {
    comments: Arc<dyn CommentRepository>,
    blogs: Arc<dyn BlogRepository>,
    cache: Arc<dyn CacheInterface>,
    settings: ServiceSettings,
}

impl CommentServiceImpl {
    /// Creates a new comment service.
    pub fn new(
        comments: Arc<dyn CommentRepository>,
        blogs: Arc<dyn BlogRepository>,
        cache: Arc<dyn CacheInterface>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            comments,
            blogs,
            cache,
            settings,
        }
    }

    /// Loads a visible comment. Deleted comments read as missing.
    async fn find_visible(&self, id: CommentId) -> FolioResult<BlogComment> {
        self.comments
            .find_by_id(id)
            .await?
            .filter(|comment| !comment.is_deleted)
            .ok_or_else(|| FolioError::not_found("Comment", id))
    }

    /// Number of ancestors above `comment`.
    async fn depth_of(&self, comment: &BlogComment) -> FolioResult<usize> {
        let mut depth = 0;
        let mut parent = comment.parent_id;
        while let Some(id) = parent {
            depth += 1;
            if depth > MAX_REPLY_DEPTH {
                break;
            }
            parent = self
                .comments
                .find_by_id(id)
                .await?
                .and_then(|ancestor| ancestor.parent_id);
        }
        Ok(depth)
    }

    async fn invalidate(&self, blog_id: BlogId) {
        self.cache
            .invalidate(&[cache_keys::comment_list_pattern(blog_id)])
            .await;
    }
}

/// Nests `replies` under their parents, depth first. Replies arrive oldest
/// first and keep that order.
fn attach_replies(nodes: &mut [CommentNode], replies: &mut HashMap<CommentId, Vec<CommentNode>>) {
    for node in nodes {
        if let Some(mut children) = replies.remove(&node.comment_id) {
            attach_replies(&mut children, replies);
            node.children = children;
        }
    }
}

impl std::fmt::Debug for CommentServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommentServiceImpl")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CommentService for CommentServiceImpl {
    async fn list_comments(
        &self,
        blog_id: BlogId,
        cursor: Option<&str>,
        limit: Option<u32>,
    ) -> FolioResult<KeysetPage<CommentNode>> {
        let limit = self.settings.keyset_limit(limit);
        debug!(%blog_id, ?cursor, limit, "Listing comments");

        let key = cache_keys::comment_list(blog_id, limit, cursor);
        self.cache
            .get_or_set(&key, self.settings.ttl, || async move {
                let paginator = KeysetPaginator::DESC;
                let window = KeysetWindow::new(&paginator, cursor, limit);
                let roots = self.comments.find_roots(blog_id, &window).await?;
                if roots.is_empty() {
                    return Err(FolioError::NoDataFound);
                }

                let prev_cursor = window.after.and(cursor).map(str::to_string);
                let page = paginator.finish(roots, limit, prev_cursor);

                let root_ids: Vec<CommentId> = page.items.iter().map(|c| c.id).collect();
                let children = self.comments.find_children(&root_ids).await?;
                let child_ids: Vec<CommentId> = children.iter().map(|c| c.id).collect();
                let grandchildren = if child_ids.is_empty() {
                    Vec::new()
                } else {
                    self.comments.find_children(&child_ids).await?
                };

                let mut replies: HashMap<CommentId, Vec<CommentNode>> = HashMap::new();
                for reply in children.into_iter().chain(grandchildren) {
                    if let Some(parent_id) = reply.parent_id {
                        replies.entry(parent_id).or_default().push(reply.into());
                    }
                }

                let mut page = page.map(CommentNode::from);
                attach_replies(&mut page.items, &mut replies);
                Ok(page)
            })
            .await
    }

    async fn create_comment(
        &self,
        actor: Actor,
        blog_id: BlogId,
        request: CreateCommentRequest,
    ) -> FolioResult<CommentNode> {
        debug!(%blog_id, user_id = %actor.user_id, "Creating comment");

        request.validate_request()?;
        self.blogs
            .find_by_id(blog_id)
            .await?
            .ok_or_else(|| FolioError::not_found("Blog", blog_id))?;

        if let Some(parent_id) = request.parent_id {
            let parent = self.find_visible(parent_id).await?;
            if parent.blog_id != blog_id {
                return Err(FolioError::not_found("Comment", parent_id));
            }
            if self.depth_of(&parent).await? >= MAX_REPLY_DEPTH {
                return Err(FolioError::validation("Replies cannot be nested any deeper"));
            }
        }

        let comment = self
            .comments
            .insert(blog_id, actor.user_id, request.parent_id, request.comment.trim())
            .await?;
        info!(comment_id = %comment.id, %blog_id, "Comment created");

        self.invalidate(blog_id).await;
        Ok(comment.into())
    }

    async fn update_comment(
        &self,
        actor: Actor,
        id: CommentId,
        request: UpdateCommentRequest,
    ) -> FolioResult<CommentNode> {
        request.validate_request()?;
        let comment = self.find_visible(id).await?;
        if comment.user_id != actor.user_id {
            return Err(FolioError::not_found("Comment", id));
        }

        let comment = self.comments.update_text(id, request.comment.trim()).await?;
        info!(comment_id = %id, "Comment updated");

        self.invalidate(comment.blog_id).await;
        Ok(comment.into())
    }

    async fn delete_comment(&self, actor: Actor, id: CommentId) -> FolioResult<()> {
        let comment = self.find_visible(id).await?;
        if comment.user_id != actor.user_id && !actor.is_admin() {
            return Err(FolioError::not_found("Comment", id));
        }

        if !self.comments.soft_delete(id).await? {
            return Err(FolioError::not_found("Comment", id));
        }
        info!(comment_id = %id, blog_id = %comment.blog_id, "Comment deleted");

        self.invalidate(comment.blog_id).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::test_support::{published, InMemoryStore};
    use folio_core::UserId;

    struct Fixture {
        store: Arc<InMemoryStore>,
        service: CommentServiceImpl,
        blog_id: BlogId,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let section = store.seed_section("tech", None);
        let blog = store.seed_blog(section.id, "Post", published());
        let service = CommentServiceImpl::new(
            store.clone(),
            store.clone(),
            Arc::new(MemoryCache::new()),
            ServiceSettings::default(),
        );
        Fixture {
            store,
            service,
            blog_id: blog.id,
        }
    }

    fn text(comment: &str, parent_id: Option<CommentId>) -> CreateCommentRequest {
        CreateCommentRequest {
            comment: comment.to_string(),
            parent_id,
        }
    }

    #[tokio::test]
    async fn test_list_builds_three_level_tree() {
        let f = fixture();
        let alice = Actor::user(UserId(1));

        let root = f
            .service
            .create_comment(alice, f.blog_id, text("root", None))
            .await
            .unwrap();
        let child = f
            .service
            .create_comment(alice, f.blog_id, text("child", Some(root.comment_id)))
            .await
            .unwrap();
        f.service
            .create_comment(alice, f.blog_id, text("grandchild", Some(child.comment_id)))
            .await
            .unwrap();
        f.service
            .create_comment(alice, f.blog_id, text("lonely", None))
            .await
            .unwrap();

        let page = f.service.list_comments(f.blog_id, None, None).await.unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].comment, "lonely");
        assert!(page.items[0].children.is_empty());

        let tree = &page.items[1];
        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].comment, "child");
        assert_eq!(tree.children[0].children[0].comment, "grandchild");
        assert_eq!(f.store.stats_of(f.blog_id).comments, 4);

        let json = serde_json::to_value(&page.items[0]).unwrap();
        assert!(json.get("children").is_none());
    }

    #[tokio::test]
    async fn test_replies_cannot_go_deeper_than_three_levels() {
        let f = fixture();
        let alice = Actor::user(UserId(1));
        let mut parent = None;
        for _ in 0..3 {
            let node = f
                .service
                .create_comment(alice, f.blog_id, text("level", parent))
                .await
                .unwrap();
            parent = Some(node.comment_id);
        }

        let err = f
            .service
            .create_comment(alice, f.blog_id, text("too deep", parent))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_keyset_pages_of_roots() {
        let f = fixture();
        let alice = Actor::user(UserId(1));
        for i in 0..5 {
            f.service
                .create_comment(alice, f.blog_id, text(&format!("c{i}"), None))
                .await
                .unwrap();
        }

        let first = f.service.list_comments(f.blog_id, None, Some(3)).await.unwrap();
        assert!(first.pagination.has_next);
        let next = first.pagination.next_cursor.clone().unwrap();

        let second = f
            .service
            .list_comments(f.blog_id, Some(&next), Some(3))
            .await
            .unwrap();
        assert!(!second.pagination.has_next);
        assert!(second.pagination.has_prev);
        let texts: Vec<&str> = second.items.iter().map(|c| c.comment.as_str()).collect();
        assert_eq!(texts, vec!["c1", "c0"]);
    }

    #[tokio::test]
    async fn test_failed_counter_update_leaves_thread_unchanged() {
        let f = fixture();
        let alice = Actor::user(UserId(1));
        let kept = f
            .service
            .create_comment(alice, f.blog_id, text("kept", None))
            .await
            .unwrap();
        f.service.list_comments(f.blog_id, None, None).await.unwrap();

        f.store.break_counters(true);
        let err = f
            .service
            .create_comment(alice, f.blog_id, text("lost", None))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 500);
        let err = f.service.delete_comment(alice, kept.comment_id).await.unwrap_err();
        assert_eq!(err.status_code(), 500);

        assert_eq!(f.store.stats_of(f.blog_id).comments, 1);
        assert!(!f.store.comment(kept.comment_id).unwrap().is_deleted);
        let page = f.service.list_comments(f.blog_id, None, None).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].comment, "kept");

        f.store.break_counters(false);
        f.service
            .create_comment(alice, f.blog_id, text("saved", None))
            .await
            .unwrap();
        let page = f.service.list_comments(f.blog_id, None, None).await.unwrap();
        assert_eq!(page.items[0].comment, "saved");
        assert_eq!(f.store.stats_of(f.blog_id).comments, 2);
    }

    #[tokio::test]
    async fn test_empty_thread_is_not_found() {
        let f = fixture();
        let err = f.service.list_comments(f.blog_id, None, None).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_create_requires_blog_and_live_parent() {
        let f = fixture();
        let alice = Actor::user(UserId(1));

        let err = f
            .service
            .create_comment(alice, BlogId(999), text("hi", None))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);

        let root = f
            .service
            .create_comment(alice, f.blog_id, text("root", None))
            .await
            .unwrap();
        f.service.delete_comment(alice, root.comment_id).await.unwrap();

        let err = f
            .service
            .create_comment(alice, f.blog_id, text("reply", Some(root.comment_id)))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);

        let err = f
            .service
            .create_comment(alice, f.blog_id, text("   ", None))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_only_author_edits() {
        let f = fixture();
        let alice = Actor::user(UserId(1));
        let root = f
            .service
            .create_comment(alice, f.blog_id, text("first", None))
            .await
            .unwrap();
        f.service.list_comments(f.blog_id, None, None).await.unwrap();

        let edit = UpdateCommentRequest {
            comment: "edited".to_string(),
        };
        let err = f
            .service
            .update_comment(Actor::admin(UserId(2)), root.comment_id, edit.clone())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);

        let updated = f
            .service
            .update_comment(alice, root.comment_id, edit)
            .await
            .unwrap();
        assert_eq!(updated.comment, "edited");

        let page = f.service.list_comments(f.blog_id, None, None).await.unwrap();
        assert_eq!(page.items[0].comment, "edited");
    }

    #[tokio::test]
    async fn test_delete_by_author_or_admin() {
        let f = fixture();
        let alice = Actor::user(UserId(1));
        let first = f
            .service
            .create_comment(alice, f.blog_id, text("first", None))
            .await
            .unwrap();
        let second = f
            .service
            .create_comment(alice, f.blog_id, text("second", None))
            .await
            .unwrap();

        let err = f
            .service
            .delete_comment(Actor::user(UserId(3)), first.comment_id)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);

        f.service.delete_comment(alice, first.comment_id).await.unwrap();
        f.service
            .delete_comment(Actor::admin(UserId(3)), second.comment_id)
            .await
            .unwrap();

        assert!(f.store.comment(first.comment_id).unwrap().is_deleted);
        assert_eq!(f.store.stats_of(f.blog_id).comments, 0);
        assert!(f.service.delete_comment(alice, first.comment_id).await.is_err());
    }
}
