//! Repository trait definitions.

use crate::KeysetWindow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use folio_core::{
    Blog, BlogComment, BlogDraft, BlogId, BlogStats, BlogStatusChange, BlogTag, CommentId,
    CursorPosition, FolioResult, Interface, MonthlyCounts, OffsetRequest, PopularBlog, Project,
    ProjectDraft, ProjectId, SavedBlog, Section, SectionId, SortDirection, Tag, TagId, UserId,
};
use std::collections::HashMap;

/// Half-open `[start, end)` time range used for the monthly counters.
pub type TimeWindow = (DateTime<Utc>, DateTime<Utc>);

/// Blog repository trait.
#[async_trait]
pub trait BlogRepository: Interface + Send + Sync {
    /// Finds a blog by ID.
    async fn find_by_id(&self, id: BlogId) -> FolioResult<Option<Blog>>;

    /// Finds a blog by slug.
    async fn find_by_slug(&self, slug: &str) -> FolioResult<Option<Blog>>;

    /// Counts the blogs of a section.
    async fn count_by_section(&self, section_id: SectionId, published_only: bool) -> FolioResult<u64>;

    /// Lists the blogs of a section, newest first.
    async fn find_by_section(
        &self,
        section_id: SectionId,
        published_only: bool,
        page: OffsetRequest,
    ) -> FolioResult<Vec<Blog>>;

    /// Counts the published blogs carrying a tag.
    async fn count_by_tag(&self, tag_id: TagId) -> FolioResult<u64>;

    /// Lists the published blogs carrying a tag, newest first.
    async fn find_by_tag(&self, tag_id: TagId, page: OffsetRequest) -> FolioResult<Vec<Blog>>;

    /// Loads up to `window.fetch_limit()` archived blogs past the window's cursor.
    async fn find_archived(&self, window: &KeysetWindow) -> FolioResult<Vec<Blog>>;

    /// Finds the nearest published blog of a section strictly past `position`
    /// in `direction`.
    async fn find_adjacent(
        &self,
        section_id: SectionId,
        position: CursorPosition,
        direction: SortDirection,
    ) -> FolioResult<Option<Blog>>;

    /// Loads the tags of a set of blogs.
    async fn find_tags(&self, ids: &[BlogId]) -> FolioResult<Vec<BlogTag>>;

    /// Loads the live counters of a set of blogs.
    async fn find_stats(&self, ids: &[BlogId]) -> FolioResult<HashMap<BlogId, BlogStats>>;

    /// Counts blogs of a section created and updated inside `window`.
    async fn monthly_counts(&self, section_id: SectionId, window: TimeWindow) -> FolioResult<MonthlyCounts>;

    /// Inserts a blog with zeroed counters, cleared status flags and its tags.
    async fn insert(&self, author: UserId, slug: &str, draft: &BlogDraft) -> FolioResult<Blog>;

    /// Updates the editable columns of a blog.
    async fn update(&self, blog: &Blog) -> FolioResult<Blog>;

    /// Replaces the tag set of a blog.
    async fn replace_tags(&self, id: BlogId, tag_ids: &[TagId]) -> FolioResult<()>;

    /// Sets a single status flag.
    async fn update_status(&self, id: BlogId, change: BlogStatusChange) -> FolioResult<()>;

    /// Deletes a blog and everything hanging off it.
    async fn delete(&self, id: BlogId) -> FolioResult<bool>;

    /// Saves the blog for the user, or removes it when already saved.
    ///
    /// Returns `true` when the blog is saved afterwards. The `saves` counter
    /// moves with the toggle and never drops below zero.
    async fn toggle_saved(&self, user_id: UserId, id: BlogId) -> FolioResult<bool>;

    /// Counts the blogs a user has saved.
    async fn count_saved(&self, user_id: UserId) -> FolioResult<u64>;

    /// Lists the blogs a user has saved, most recently saved first.
    async fn find_saved(&self, user_id: UserId, page: OffsetRequest) -> FolioResult<Vec<SavedBlog>>;

    /// Counts the saves a user made inside `window`.
    async fn count_saved_between(&self, user_id: UserId, window: TimeWindow) -> FolioResult<u64>;

    /// Adds one view to a blog.
    async fn increment_views(&self, id: BlogId) -> FolioResult<()>;

    /// Adds `delta` likes to a blog; the counter never drops below zero.
    async fn adjust_likes(&self, id: BlogId, delta: i64) -> FolioResult<()>;

    /// Lists up to `limit` published blogs by the sum of their counters,
    /// highest first, newest first among equals.
    async fn find_popular(&self, limit: u32) -> FolioResult<Vec<PopularBlog>>;
}

/// Blog comment repository trait.
#[async_trait]
pub trait CommentRepository: Interface + Send + Sync {
    /// Loads top-level, non-deleted comments of a blog past the window's cursor.
    async fn find_roots(&self, blog_id: BlogId, window: &KeysetWindow) -> FolioResult<Vec<BlogComment>>;

    /// Loads the non-deleted replies to any of `parent_ids`, oldest first.
    async fn find_children(&self, parent_ids: &[CommentId]) -> FolioResult<Vec<BlogComment>>;

    /// Finds a comment by ID, deleted or not.
    async fn find_by_id(&self, id: CommentId) -> FolioResult<Option<BlogComment>>;

    /// Inserts a comment and bumps the blog's comment counter in one
    /// transaction.
    async fn insert(
        &self,
        blog_id: BlogId,
        user_id: UserId,
        parent_id: Option<CommentId>,
        text: &str,
    ) -> FolioResult<BlogComment>;

    /// Replaces the text of a comment.
    async fn update_text(&self, id: CommentId, text: &str) -> FolioResult<BlogComment>;

    /// Marks a comment as deleted and lowers the blog's comment counter
    /// (never below zero) in one transaction.
    ///
    /// Returns `false` without touching the counter when the comment is
    /// missing or already deleted.
    async fn soft_delete(&self, id: CommentId) -> FolioResult<bool>;
}

/// Tag repository trait.
#[async_trait]
pub trait TagRepository: Interface + Send + Sync {
    /// Counts all tags.
    async fn count(&self) -> FolioResult<u64>;

    /// Lists tags, newest first.
    async fn find_all(&self, page: OffsetRequest) -> FolioResult<Vec<Tag>>;

    /// Finds a tag by ID.
    async fn find_by_id(&self, id: TagId) -> FolioResult<Option<Tag>>;

    /// Finds a tag by slug.
    async fn find_by_slug(&self, slug: &str) -> FolioResult<Option<Tag>>;

    /// Checks whether another tag already uses `chinese_title`.
    async fn exists_by_title(&self, chinese_title: &str, exclude: Option<TagId>) -> FolioResult<bool>;

    /// Inserts a tag.
    async fn insert(&self, chinese_title: &str, english_title: &str, slug: &str) -> FolioResult<Tag>;

    /// Updates a tag.
    async fn update(&self, tag: &Tag) -> FolioResult<Tag>;

    /// Deletes a tag.
    async fn delete(&self, id: TagId) -> FolioResult<bool>;

    /// Counts tags created and updated inside `window`.
    async fn monthly_counts(&self, window: TimeWindow) -> FolioResult<MonthlyCounts>;
}

/// Section repository trait.
#[async_trait]
pub trait SectionRepository: Interface + Send + Sync {
    /// Lists active sections ordered by `(parent_id, id)`, roots first.
    async fn find_active(&self) -> FolioResult<Vec<Section>>;

    /// Finds a section by ID.
    async fn find_by_id(&self, id: SectionId) -> FolioResult<Option<Section>>;

    /// Finds a section by slug.
    async fn find_by_slug(&self, slug: &str) -> FolioResult<Option<Section>>;

    /// Updates a section.
    async fn update(&self, section: &Section) -> FolioResult<Section>;
}

/// Project repository trait.
#[async_trait]
pub trait ProjectRepository: Interface + Send + Sync {
    /// Counts projects.
    async fn count(&self, published_only: bool) -> FolioResult<u64>;

    /// Lists projects, newest first.
    async fn find_all(&self, published_only: bool, page: OffsetRequest) -> FolioResult<Vec<Project>>;

    /// Finds a project by ID.
    async fn find_by_id(&self, id: ProjectId) -> FolioResult<Option<Project>>;

    /// Finds a project by slug.
    async fn find_by_slug(&self, slug: &str) -> FolioResult<Option<Project>>;

    /// Checks whether another project already uses `chinese_title`.
    async fn exists_by_title(&self, chinese_title: &str, exclude: Option<ProjectId>) -> FolioResult<bool>;

    /// Inserts an unpublished project.
    async fn insert(&self, slug: &str, draft: &ProjectDraft) -> FolioResult<Project>;

    /// Updates a project.
    async fn update(&self, project: &Project) -> FolioResult<Project>;

    /// Publishes or unpublishes a project.
    async fn set_published(&self, id: ProjectId, published: bool) -> FolioResult<bool>;

    /// Deletes a project.
    async fn delete(&self, id: ProjectId) -> FolioResult<bool>;

    /// Counts projects created and updated inside `window`.
    async fn monthly_counts(&self, window: TimeWindow) -> FolioResult<MonthlyCounts>;
}
