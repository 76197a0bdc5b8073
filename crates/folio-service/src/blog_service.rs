//! Blog service trait definition.

use crate::dto::{
    BlogDetail, BlogListItem, BlogNavigation, PopularBlogItem, SavedBlogItem,
    UpdateBlogStatusRequest,
};
use async_trait::async_trait;
use folio_core::{
    Actor, BlogDraft, BlogId, BlogStats, FolioResult, Interface, KeysetPage, Language,
    OffsetPage, OffsetRequest, SectionId, UserId, Visitor,
};

/// Blog service trait.
#[async_trait]
pub trait BlogService: Interface + Send + Sync {
    /// Lists the blogs of a section.
    ///
    /// With `published_only == false` this is the admin listing: both raw
    /// titles, the status flags and this month's counters are included.
    async fn list_blogs(
        &self,
        section_id: SectionId,
        page: OffsetRequest,
        published_only: bool,
        language: Language,
    ) -> FolioResult<OffsetPage<BlogListItem>>;

    /// Lists the published blogs carrying a tag.
    async fn list_blogs_by_tag(
        &self,
        tag_slug: &str,
        page: OffsetRequest,
        language: Language,
    ) -> FolioResult<OffsetPage<BlogListItem>>;

    /// Lists archived blogs, newest first, by cursor.
    async fn list_archived_blogs(
        &self,
        cursor: Option<&str>,
        limit: Option<u32>,
        language: Language,
    ) -> FolioResult<KeysetPage<BlogListItem>>;

    /// Lists the blogs a user has saved, most recently saved first.
    async fn list_saved_blogs(
        &self,
        user_id: UserId,
        page: OffsetRequest,
        language: Language,
    ) -> FolioResult<OffsetPage<SavedBlogItem>>;

    /// Gets a blog by slug.
    async fn get_blog(&self, slug: &str, language: Language) -> FolioResult<BlogDetail>;

    /// Gets a blog by slug for a reader and counts the view.
    ///
    /// The view is counted unless the previous reader of this blog had the
    /// same fingerprint, so reloads by one reader count once.
    async fn view_blog(
        &self,
        slug: &str,
        language: Language,
        visitor: &Visitor,
        is_editor: bool,
    ) -> FolioResult<BlogDetail>;

    /// Lists the most popular published blogs by the sum of their counters.
    async fn list_popular_blogs(&self, language: Language) -> FolioResult<Vec<PopularBlogItem>>;

    /// Gets the published neighbours of a blog within its section.
    async fn get_blog_navigation(&self, id: BlogId, language: Language) -> FolioResult<BlogNavigation>;

    /// Gets the live counters of a blog.
    async fn get_blog_stats(&self, id: BlogId) -> FolioResult<BlogStats>;

    /// Creates a blog authored by `actor`.
    async fn create_blog(&self, actor: Actor, draft: BlogDraft) -> FolioResult<BlogDetail>;

    /// Replaces the content of a blog.
    async fn update_blog(&self, actor: Actor, id: BlogId, draft: BlogDraft) -> FolioResult<BlogDetail>;

    /// Flips one status flag (admin only).
    async fn update_blog_status(
        &self,
        actor: Actor,
        id: BlogId,
        request: UpdateBlogStatusRequest,
    ) -> FolioResult<()>;

    /// Deletes a blog.
    async fn delete_blog(&self, actor: Actor, id: BlogId) -> FolioResult<()>;

    /// Saves or unsaves a blog. Returns `true` when the blog is now saved.
    async fn toggle_saved_blog(&self, user_id: UserId, id: BlogId) -> FolioResult<bool>;

    /// Likes or unlikes a blog for the visitor's address. Returns `true`
    /// when the blog is now liked.
    async fn toggle_blog_like(&self, id: BlogId, visitor: &Visitor) -> FolioResult<bool>;
}
