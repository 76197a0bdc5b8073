//! In-memory repositories for service tests.
//!
//! One [`InMemoryStore`] implements every repository trait over shared state,
//! so a test can seed sections, tags and blogs and hand the same `Arc` to
//! each service. List queries follow the same filters and ordering as the
//! SQL ones. `queries` counts every database read apart from the live stats
//! lookup, which lets tests tell cache hits from misses.

use crate::cache::CacheInterface;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use folio_core::{
    month_window, Blog, BlogComment, BlogDraft, BlogId, BlogStats, BlogStatus, BlogStatusChange,
    BlogTag, CommentId, CursorPosition, FolioError, FolioResult, KeysetPaginator, KeysetRow,
    MonthlyCounts, OffsetRequest, PopularBlog, Project, ProjectDraft, ProjectId, SavedBlog, Section, SectionId,
    SectionType, SortDirection, Tag, TagId, UserId, UserRole,
};
use folio_repository::{
    BlogRepository, CommentRepository, KeysetWindow, ProjectRepository, SectionRepository,
    TagRepository, TimeWindow,
};
use parking_lot::{Mutex, MutexGuard};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Default)]
struct State {
    next_id: i64,
    ticks: i64,
    blogs: Vec<Blog>,
    blog_tags: Vec<(BlogId, TagId)>,
    stats: HashMap<BlogId, BlogStats>,
    saved: Vec<(UserId, BlogId, DateTime<Utc>)>,
    comments: Vec<BlogComment>,
    tags: Vec<Tag>,
    sections: Vec<Section>,
    projects: Vec<Project>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn blog_tags(&self, ids: &[BlogId]) -> Vec<BlogTag> {
        self.blog_tags
            .iter()
            .filter(|(blog_id, _)| ids.contains(blog_id))
            .filter_map(|(blog_id, tag_id)| {
                self.tags.iter().find(|t| t.id == *tag_id).map(|tag| BlogTag {
                    blog_id: *blog_id,
                    tag_id: tag.id,
                    slug: tag.slug.clone(),
                    chinese_title: tag.chinese_title.clone(),
                    english_title: tag.english_title.clone(),
                })
            })
            .collect()
    }
}

pub struct InMemoryStore {
    state: Mutex<State>,
    base: DateTime<Utc>,
    pub queries: AtomicUsize,
    counters_broken: AtomicBool,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self {
            state: Mutex::new(State::default()),
            base: month_window(Utc::now()).0 + Duration::hours(1),
            queries: AtomicUsize::new(0),
            counters_broken: AtomicBool::new(false),
        }
    }
}

fn page_of<T: Clone>(rows: &[T], page: OffsetRequest) -> Vec<T> {
    rows.iter()
        .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
        .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
        .cloned()
        .collect()
}

fn keyset_of<T: KeysetRow + Clone>(mut rows: Vec<T>, window: &KeysetWindow) -> Vec<T> {
    let paginator = KeysetPaginator::new(window.direction);
    rows.retain(|row| {
        window
            .after
            .map_or(true, |after| paginator.follows(&after, &row.position()))
    });
    rows.sort_by(|a, b| paginator.compare(&a.position(), &b.position()));
    rows.truncate(usize::try_from(window.fetch_limit()).unwrap_or(usize::MAX));
    rows
}

fn newest_first<T: KeysetRow>(rows: &mut [T]) {
    rows.sort_by(|a, b| KeysetPaginator::DESC.compare(&a.position(), &b.position()));
}

fn in_window(at: Option<DateTime<Utc>>, window: TimeWindow) -> bool {
    at.is_some_and(|at| at >= window.0 && at < window.1)
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Makes every write that maintains a stats counter fail and roll back.
    pub fn break_counters(&self, broken: bool) {
        self.counters_broken.store(broken, Ordering::SeqCst);
    }

    fn check_counter_update(&self) -> FolioResult<()> {
        if self.counters_broken.load(Ordering::SeqCst) {
            return Err(FolioError::Database("blog_stats is unavailable".to_string()));
        }
        Ok(())
    }

    /// Lock for a counted database read.
    fn read(&self) -> MutexGuard<'_, State> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.state.lock()
    }

    fn write(&self) -> MutexGuard<'_, State> {
        self.state.lock()
    }

    /// Strictly increasing timestamps inside the current month.
    fn tick(&self, state: &mut State) -> DateTime<Utc> {
        state.ticks += 1;
        self.base + Duration::seconds(state.ticks)
    }

    pub fn seed_section(&self, slug: &str, parent_id: Option<SectionId>) -> Section {
        let mut state = self.write();
        let section = Section {
            id: SectionId(state.next_id()),
            section_type: SectionType::Blog,
            slug: slug.to_string(),
            chinese_title: format!("{slug}-zh"),
            english_title: Some(format!("{slug}-en")),
            chinese_description: None,
            english_description: None,
            is_active: true,
            parent_id,
            created_at: self.tick(&mut state),
            updated_at: None,
        };
        state.sections.push(section.clone());
        section
    }

    pub fn seed_tag(&self, chinese_title: &str, english_title: &str) -> Tag {
        let mut state = self.write();
        let tag = Tag {
            id: TagId(state.next_id()),
            chinese_title: chinese_title.to_string(),
            english_title: english_title.to_string(),
            slug: english_title.to_lowercase(),
            created_at: self.tick(&mut state),
            updated_at: None,
        };
        state.tags.push(tag.clone());
        tag
    }

    pub fn seed_blog(&self, section_id: SectionId, title: &str, status: BlogStatus) -> Blog {
        let mut state = self.write();
        let id = BlogId(state.next_id());
        let blog = Blog {
            id,
            user_id: Some(UserId(1)),
            section_id,
            slug: title.to_lowercase().replace(' ', "-"),
            chinese_title: format!("{title}-zh"),
            english_title: Some(title.to_string()),
            chinese_description: None,
            english_description: None,
            chinese_content: serde_json::json!({"text": title}),
            english_content: None,
            status,
            created_at: self.tick(&mut state),
            updated_at: None,
        };
        state.blogs.push(blog.clone());
        state.stats.insert(id, BlogStats::default());
        blog
    }

    pub fn tag_blog(&self, blog_id: BlogId, tag_id: TagId) {
        self.write().blog_tags.push((blog_id, tag_id));
    }

    pub fn set_views(&self, blog_id: BlogId, views: i64) {
        self.write().stats.entry(blog_id).or_default().views = views;
    }

    pub fn set_stats(&self, blog_id: BlogId, stats: BlogStats) {
        self.write().stats.insert(blog_id, stats);
    }

    pub fn stats_of(&self, blog_id: BlogId) -> BlogStats {
        self.write().stats.get(&blog_id).copied().unwrap_or_default()
    }

    pub fn comment(&self, id: CommentId) -> Option<BlogComment> {
        self.write().comments.iter().find(|c| c.id == id).cloned()
    }

    pub fn blog(&self, id: BlogId) -> Option<Blog> {
        self.write().blogs.iter().find(|b| b.id == id).cloned()
    }
}

pub fn published() -> BlogStatus {
    BlogStatus {
        is_published: true,
        ..BlogStatus::default()
    }
}

pub fn archived() -> BlogStatus {
    BlogStatus {
        is_published: true,
        is_archived: true,
        ..BlogStatus::default()
    }
}

#[async_trait]
impl BlogRepository for InMemoryStore {
    async fn find_by_id(&self, id: BlogId) -> FolioResult<Option<Blog>> {
        Ok(self.read().blogs.iter().find(|b| b.id == id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> FolioResult<Option<Blog>> {
        Ok(self.read().blogs.iter().find(|b| b.slug == slug).cloned())
    }

    async fn count_by_section(&self, section_id: SectionId, published_only: bool) -> FolioResult<u64> {
        let state = self.read();
        Ok(state
            .blogs
            .iter()
            .filter(|b| b.section_id == section_id && (!published_only || b.status.is_published))
            .count() as u64)
    }

    async fn find_by_section(
        &self,
        section_id: SectionId,
        published_only: bool,
        page: OffsetRequest,
    ) -> FolioResult<Vec<Blog>> {
        let state = self.read();
        let mut rows: Vec<Blog> = state
            .blogs
            .iter()
            .filter(|b| b.section_id == section_id && (!published_only || b.status.is_published))
            .cloned()
            .collect();
        newest_first(&mut rows);
        Ok(page_of(&rows, page))
    }

    async fn count_by_tag(&self, tag_id: TagId) -> FolioResult<u64> {
        let state = self.read();
        Ok(state
            .blogs
            .iter()
            .filter(|b| b.status.is_published && state.blog_tags.contains(&(b.id, tag_id)))
            .count() as u64)
    }

    async fn find_by_tag(&self, tag_id: TagId, page: OffsetRequest) -> FolioResult<Vec<Blog>> {
        let state = self.read();
        let mut rows: Vec<Blog> = state
            .blogs
            .iter()
            .filter(|b| b.status.is_published && state.blog_tags.contains(&(b.id, tag_id)))
            .cloned()
            .collect();
        newest_first(&mut rows);
        Ok(page_of(&rows, page))
    }

    async fn find_archived(&self, window: &KeysetWindow) -> FolioResult<Vec<Blog>> {
        let state = self.read();
        let rows = state
            .blogs
            .iter()
            .filter(|b| b.status.is_archived)
            .cloned()
            .collect();
        Ok(keyset_of(rows, window))
    }

    async fn find_adjacent(
        &self,
        section_id: SectionId,
        position: CursorPosition,
        direction: SortDirection,
    ) -> FolioResult<Option<Blog>> {
        let state = self.read();
        let rows = state
            .blogs
            .iter()
            .filter(|b| b.section_id == section_id && b.status.is_published)
            .cloned()
            .collect();
        let window = KeysetWindow {
            after: Some(position),
            direction,
            limit: 1,
        };
        Ok(keyset_of(rows, &window).into_iter().next())
    }

    async fn find_tags(&self, ids: &[BlogId]) -> FolioResult<Vec<BlogTag>> {
        Ok(self.read().blog_tags(ids))
    }

    async fn find_stats(&self, ids: &[BlogId]) -> FolioResult<HashMap<BlogId, BlogStats>> {
        let state = self.write();
        Ok(ids
            .iter()
            .filter_map(|id| state.stats.get(id).map(|stats| (*id, *stats)))
            .collect())
    }

    async fn monthly_counts(&self, section_id: SectionId, window: TimeWindow) -> FolioResult<MonthlyCounts> {
        let state = self.read();
        let blogs = state.blogs.iter().filter(|b| b.section_id == section_id);
        Ok(MonthlyCounts {
            created: blogs.clone().filter(|b| in_window(Some(b.created_at), window)).count() as u64,
            updated: blogs.filter(|b| in_window(b.updated_at, window)).count() as u64,
        })
    }

    async fn insert(&self, author: UserId, slug: &str, draft: &BlogDraft) -> FolioResult<Blog> {
        let mut state = self.write();
        if state.blogs.iter().any(|b| b.slug == slug) {
            return Err(FolioError::conflict(format!("Duplicate entry '{slug}'")));
        }
        let id = BlogId(state.next_id());
        let blog = Blog {
            id,
            user_id: Some(author),
            section_id: draft.section_id,
            slug: slug.to_string(),
            chinese_title: draft.chinese_title.clone(),
            english_title: Some(draft.english_title.clone()),
            chinese_description: draft.chinese_description.clone(),
            english_description: draft.english_description.clone(),
            chinese_content: draft.chinese_content.clone(),
            english_content: draft.english_content.clone(),
            status: BlogStatus::default(),
            created_at: self.tick(&mut state),
            updated_at: None,
        };
        state.blogs.push(blog.clone());
        state.stats.insert(id, BlogStats::default());
        for tag_id in &draft.tag_ids {
            state.blog_tags.push((id, *tag_id));
        }
        Ok(blog)
    }

    async fn update(&self, blog: &Blog) -> FolioResult<Blog> {
        let mut state = self.write();
        if state.blogs.iter().any(|b| b.slug == blog.slug && b.id != blog.id) {
            return Err(FolioError::conflict(format!("Duplicate entry '{}'", blog.slug)));
        }
        let now = self.tick(&mut state);
        let stored = state
            .blogs
            .iter_mut()
            .find(|b| b.id == blog.id)
            .ok_or_else(|| FolioError::not_found("Blog", blog.id))?;
        *stored = Blog {
            updated_at: Some(now),
            ..blog.clone()
        };
        Ok(stored.clone())
    }

    async fn replace_tags(&self, id: BlogId, tag_ids: &[TagId]) -> FolioResult<()> {
        let mut state = self.write();
        state.blog_tags.retain(|(blog_id, _)| *blog_id != id);
        state.blog_tags.extend(tag_ids.iter().map(|tag_id| (id, *tag_id)));
        Ok(())
    }

    async fn update_status(&self, id: BlogId, change: BlogStatusChange) -> FolioResult<()> {
        let mut state = self.write();
        if let Some(blog) = state.blogs.iter_mut().find(|b| b.id == id) {
            change.apply(&mut blog.status);
        }
        Ok(())
    }

    async fn delete(&self, id: BlogId) -> FolioResult<bool> {
        let mut state = self.write();
        let before = state.blogs.len();
        state.blogs.retain(|b| b.id != id);
        state.blog_tags.retain(|(blog_id, _)| *blog_id != id);
        state.saved.retain(|(_, blog_id, _)| *blog_id != id);
        state.comments.retain(|c| c.blog_id != id);
        state.stats.remove(&id);
        Ok(state.blogs.len() < before)
    }

    async fn toggle_saved(&self, user_id: UserId, id: BlogId) -> FolioResult<bool> {
        let mut state = self.write();
        let existing = state
            .saved
            .iter()
            .position(|(user, blog, _)| *user == user_id && *blog == id);
        let now = self.tick(&mut state);
        let saved = match existing {
            Some(index) => {
                state.saved.remove(index);
                false
            }
            None => {
                state.saved.push((user_id, id, now));
                true
            }
        };
        let stats = state.stats.entry(id).or_default();
        stats.saves = if saved { stats.saves + 1 } else { (stats.saves - 1).max(0) };
        Ok(saved)
    }

    async fn count_saved(&self, user_id: UserId) -> FolioResult<u64> {
        Ok(self
            .read()
            .saved
            .iter()
            .filter(|(user, _, _)| *user == user_id)
            .count() as u64)
    }

    async fn find_saved(&self, user_id: UserId, page: OffsetRequest) -> FolioResult<Vec<SavedBlog>> {
        let state = self.read();
        let mut rows: Vec<SavedBlog> = state
            .saved
            .iter()
            .filter(|(user, _, _)| *user == user_id)
            .filter_map(|(user, blog_id, saved_at)| {
                state.blogs.iter().find(|b| b.id == *blog_id).map(|blog| SavedBlog {
                    user_id: *user,
                    blog: blog.clone(),
                    saved_at: *saved_at,
                })
            })
            .collect();
        rows.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(page_of(&rows, page))
    }

    async fn count_saved_between(&self, user_id: UserId, window: TimeWindow) -> FolioResult<u64> {
        Ok(self
            .read()
            .saved
            .iter()
            .filter(|(user, _, at)| *user == user_id && in_window(Some(*at), window))
            .count() as u64)
    }

    async fn increment_views(&self, id: BlogId) -> FolioResult<()> {
        self.write().stats.entry(id).or_default().views += 1;
        Ok(())
    }

    async fn adjust_likes(&self, id: BlogId, delta: i64) -> FolioResult<()> {
        let mut state = self.write();
        let stats = state.stats.entry(id).or_default();
        stats.likes = (stats.likes + delta).max(0);
        Ok(())
    }

    async fn find_popular(&self, limit: u32) -> FolioResult<Vec<PopularBlog>> {
        let state = self.read();
        let mut rows: Vec<PopularBlog> = state
            .blogs
            .iter()
            .filter(|b| b.status.is_published)
            .map(|blog| PopularBlog {
                blog: blog.clone(),
                stats: state.stats.get(&blog.id).copied().unwrap_or_default(),
            })
            .collect();
        rows.sort_by(|a, b| {
            b.stats
                .popularity()
                .cmp(&a.stats.popularity())
                .then_with(|| KeysetPaginator::DESC.compare(&a.blog.position(), &b.blog.position()))
        });
        rows.truncate(limit as usize);
        Ok(rows)
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn find_roots(&self, blog_id: BlogId, window: &KeysetWindow) -> FolioResult<Vec<BlogComment>> {
        let state = self.read();
        let rows = state
            .comments
            .iter()
            .filter(|c| c.blog_id == blog_id && c.is_root() && !c.is_deleted)
            .cloned()
            .collect();
        Ok(keyset_of(rows, window))
    }

    async fn find_children(&self, parent_ids: &[CommentId]) -> FolioResult<Vec<BlogComment>> {
        let state = self.read();
        let mut rows: Vec<BlogComment> = state
            .comments
            .iter()
            .filter(|c| !c.is_deleted && c.parent_id.is_some_and(|p| parent_ids.contains(&p)))
            .cloned()
            .collect();
        rows.sort_by_key(|c| c.position());
        Ok(rows)
    }

    async fn find_by_id(&self, id: CommentId) -> FolioResult<Option<BlogComment>> {
        Ok(self.read().comments.iter().find(|c| c.id == id).cloned())
    }

    async fn insert(
        &self,
        blog_id: BlogId,
        user_id: UserId,
        parent_id: Option<CommentId>,
        text: &str,
    ) -> FolioResult<BlogComment> {
        self.check_counter_update()?;
        let mut state = self.write();
        let comment = BlogComment {
            id: CommentId(state.next_id()),
            blog_id,
            user_id,
            username: Some(format!("user{user_id}")),
            user_role: UserRole::User,
            comment: text.to_string(),
            is_deleted: false,
            parent_id,
            created_at: self.tick(&mut state),
            updated_at: None,
        };
        state.comments.push(comment.clone());
        state.stats.entry(blog_id).or_default().comments += 1;
        Ok(comment)
    }

    async fn update_text(&self, id: CommentId, text: &str) -> FolioResult<BlogComment> {
        let mut state = self.write();
        let now = self.tick(&mut state);
        let comment = state
            .comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| FolioError::not_found("Comment", id))?;
        comment.comment = text.to_string();
        comment.updated_at = Some(now);
        Ok(comment.clone())
    }

    async fn soft_delete(&self, id: CommentId) -> FolioResult<bool> {
        let mut state = self.write();
        let Some(comment) = state.comments.iter_mut().find(|c| c.id == id && !c.is_deleted) else {
            return Ok(false);
        };
        self.check_counter_update()?;
        comment.is_deleted = true;
        let blog_id = comment.blog_id;
        let stats = state.stats.entry(blog_id).or_default();
        stats.comments = (stats.comments - 1).max(0);
        Ok(true)
    }
}

#[async_trait]
impl TagRepository for InMemoryStore {
    async fn count(&self) -> FolioResult<u64> {
        Ok(self.read().tags.len() as u64)
    }

    async fn find_all(&self, page: OffsetRequest) -> FolioResult<Vec<Tag>> {
        let state = self.read();
        let mut rows = state.tags.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(page_of(&rows, page))
    }

    async fn find_by_id(&self, id: TagId) -> FolioResult<Option<Tag>> {
        Ok(self.read().tags.iter().find(|t| t.id == id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> FolioResult<Option<Tag>> {
        Ok(self.read().tags.iter().find(|t| t.slug == slug).cloned())
    }

    async fn exists_by_title(&self, chinese_title: &str, exclude: Option<TagId>) -> FolioResult<bool> {
        Ok(self
            .read()
            .tags
            .iter()
            .any(|t| t.chinese_title == chinese_title && Some(t.id) != exclude))
    }

    async fn insert(&self, chinese_title: &str, english_title: &str, slug: &str) -> FolioResult<Tag> {
        let mut state = self.write();
        if state.tags.iter().any(|t| t.slug == slug) {
            return Err(FolioError::conflict(format!("Duplicate entry '{slug}'")));
        }
        let tag = Tag {
            id: TagId(state.next_id()),
            chinese_title: chinese_title.to_string(),
            english_title: english_title.to_string(),
            slug: slug.to_string(),
            created_at: self.tick(&mut state),
            updated_at: None,
        };
        state.tags.push(tag.clone());
        Ok(tag)
    }

    async fn update(&self, tag: &Tag) -> FolioResult<Tag> {
        let mut state = self.write();
        let now = self.tick(&mut state);
        let stored = state
            .tags
            .iter_mut()
            .find(|t| t.id == tag.id)
            .ok_or_else(|| FolioError::not_found("Tag", tag.id))?;
        *stored = Tag {
            updated_at: Some(now),
            ..tag.clone()
        };
        Ok(stored.clone())
    }

    async fn delete(&self, id: TagId) -> FolioResult<bool> {
        let mut state = self.write();
        let before = state.tags.len();
        state.tags.retain(|t| t.id != id);
        state.blog_tags.retain(|(_, tag_id)| *tag_id != id);
        Ok(state.tags.len() < before)
    }

    async fn monthly_counts(&self, window: TimeWindow) -> FolioResult<MonthlyCounts> {
        let state = self.read();
        Ok(MonthlyCounts {
            created: state.tags.iter().filter(|t| in_window(Some(t.created_at), window)).count() as u64,
            updated: state.tags.iter().filter(|t| in_window(t.updated_at, window)).count() as u64,
        })
    }
}

#[async_trait]
impl SectionRepository for InMemoryStore {
    async fn find_active(&self) -> FolioResult<Vec<Section>> {
        let state = self.read();
        let mut rows: Vec<Section> = state.sections.iter().filter(|s| s.is_active).cloned().collect();
        rows.sort_by_key(|s| (s.parent_id, s.id));
        Ok(rows)
    }

    async fn find_by_id(&self, id: SectionId) -> FolioResult<Option<Section>> {
        Ok(self.read().sections.iter().find(|s| s.id == id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> FolioResult<Option<Section>> {
        Ok(self.read().sections.iter().find(|s| s.slug == slug).cloned())
    }

    async fn update(&self, section: &Section) -> FolioResult<Section> {
        let mut state = self.write();
        let now = self.tick(&mut state);
        let stored = state
            .sections
            .iter_mut()
            .find(|s| s.id == section.id)
            .ok_or_else(|| FolioError::not_found("Section", section.id))?;
        *stored = Section {
            updated_at: Some(now),
            ..section.clone()
        };
        Ok(stored.clone())
    }
}

#[async_trait]
impl ProjectRepository for InMemoryStore {
    async fn count(&self, published_only: bool) -> FolioResult<u64> {
        Ok(self
            .read()
            .projects
            .iter()
            .filter(|p| !published_only || p.is_published)
            .count() as u64)
    }

    async fn find_all(&self, published_only: bool, page: OffsetRequest) -> FolioResult<Vec<Project>> {
        let state = self.read();
        let mut rows: Vec<Project> = state
            .projects
            .iter()
            .filter(|p| !published_only || p.is_published)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(page_of(&rows, page))
    }

    async fn find_by_id(&self, id: ProjectId) -> FolioResult<Option<Project>> {
        Ok(self.read().projects.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> FolioResult<Option<Project>> {
        Ok(self.read().projects.iter().find(|p| p.slug == slug).cloned())
    }

    async fn exists_by_title(&self, chinese_title: &str, exclude: Option<ProjectId>) -> FolioResult<bool> {
        Ok(self
            .read()
            .projects
            .iter()
            .any(|p| p.chinese_title == chinese_title && Some(p.id) != exclude))
    }

    async fn insert(&self, slug: &str, draft: &ProjectDraft) -> FolioResult<Project> {
        let mut state = self.write();
        if state.projects.iter().any(|p| p.slug == slug) {
            return Err(FolioError::conflict(format!("Duplicate entry '{slug}'")));
        }
        let project = Project {
            id: ProjectId(state.next_id()),
            project_type: draft.project_type,
            section_id: draft.section_id,
            is_published: false,
            chinese_title: draft.chinese_title.clone(),
            english_title: Some(draft.english_title.clone()),
            slug: slug.to_string(),
            chinese_description: draft.chinese_description.clone(),
            english_description: draft.english_description.clone(),
            chinese_content: draft.chinese_content.clone(),
            english_content: draft.english_content.clone(),
            created_at: self.tick(&mut state),
            updated_at: None,
        };
        state.projects.push(project.clone());
        Ok(project)
    }

    async fn update(&self, project: &Project) -> FolioResult<Project> {
        let mut state = self.write();
        let now = self.tick(&mut state);
        let stored = state
            .projects
            .iter_mut()
            .find(|p| p.id == project.id)
            .ok_or_else(|| FolioError::not_found("Project", project.id))?;
        *stored = Project {
            updated_at: Some(now),
            ..project.clone()
        };
        Ok(stored.clone())
    }

    async fn set_published(&self, id: ProjectId, published: bool) -> FolioResult<bool> {
        let mut state = self.write();
        Ok(state
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .map(|p| p.is_published = published)
            .is_some())
    }

    async fn delete(&self, id: ProjectId) -> FolioResult<bool> {
        let mut state = self.write();
        let before = state.projects.len();
        state.projects.retain(|p| p.id != id);
        Ok(state.projects.len() < before)
    }

    async fn monthly_counts(&self, window: TimeWindow) -> FolioResult<MonthlyCounts> {
        let state = self.read();
        Ok(MonthlyCounts {
            created: state.projects.iter().filter(|p| in_window(Some(p.created_at), window)).count() as u64,
            updated: state.projects.iter().filter(|p| in_window(p.updated_at, window)).count() as u64,
        })
    }
}

/// A cache whose backend is always down.
#[derive(Debug, Default)]
pub struct FailingCache;

#[async_trait]
impl CacheInterface for FailingCache {
    async fn get_raw(&self, _key: &str) -> FolioResult<Option<String>> {
        Err(FolioError::Cache("connection refused".to_string()))
    }

    async fn set_raw(&self, _key: &str, _value: &str, _ttl: std::time::Duration) -> FolioResult<()> {
        Err(FolioError::Cache("connection refused".to_string()))
    }

    async fn delete(&self, _key: &str) -> FolioResult<bool> {
        Err(FolioError::Cache("connection refused".to_string()))
    }

    async fn exists(&self, _key: &str) -> FolioResult<bool> {
        Err(FolioError::Cache("connection refused".to_string()))
    }

    async fn delete_pattern(&self, _pattern: &str) -> FolioResult<u64> {
        Err(FolioError::Cache("connection refused".to_string()))
    }

    fn is_enabled(&self) -> bool {
        true
    }
}
