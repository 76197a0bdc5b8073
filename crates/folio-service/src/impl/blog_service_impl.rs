//! Blog service implementation.

use crate::blog_service::BlogService;
use crate::cache::{cache_keys, CacheExt, CacheInterface};
use crate::dto::{
    BlogDetail, BlogListItem, BlogNavigation, NavigationEntry, PopularBlogItem, SavedBlogItem,
    UpdateBlogStatusRequest,
};
use crate::settings::ServiceSettings;
use async_trait::async_trait;
use chrono::Utc;
use folio_core::{
    month_window, slugify, Actor, Blog, BlogDraft, BlogId, BlogStats, FolioError, FolioResult,
    KeysetPage, KeysetPaginator, KeysetRow, Language, OffsetPage, OffsetRequest, SectionId,
    SortDirection, UserId, ValidateExt, Visitor, BLOG_SLUG_MAX_LEN,
};
use folio_repository::{BlogRepository, KeysetWindow, SectionRepository, TagRepository};
use futures::future::try_join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Size of the popular blogs ranking.
pub const POPULAR_BLOG_LIMIT: u32 = 9;

/// How long a like blocks the same address from liking again.
pub const LIKE_MARKER_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// How long the last reader of a blog is remembered.
pub const VIEW_MARKER_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Blog service backed by the blog, tag and section repositories.
pub struct BlogServiceImpl {
    blogs: Arc<dyn BlogRepository>,
    tags: Arc<dyn TagRepository>,
    sections: Arc<dyn SectionRepository>,
    cache: Arc<dyn CacheInterface>,
    settings: ServiceSettings,
}

impl BlogServiceImpl {
    /// Creates a new blog service.
    pub fn new(
        blogs: Arc<dyn BlogRepository>,
        tags: Arc<dyn TagRepository>,
        sections: Arc<dyn SectionRepository>,
        cache: Arc<dyn CacheInterface>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            blogs,
            tags,
            sections,
            cache,
            settings,
        }
    }

    /// Fills in the live counters. Listings are cached without them.
    async fn attach_stats(&self, items: &mut [BlogListItem]) -> FolioResult<()> {
        if items.is_empty() {
            return Ok(());
        }
        let ids: Vec<BlogId> = items.iter().map(|item| item.blog_id).collect();
        let stats = self.blogs.find_stats(&ids).await?;
        for item in items {
            item.stats = Some(stats.get(&item.blog_id).copied().unwrap_or_default());
        }
        Ok(())
    }

    async fn list_items(
        &self,
        blogs: OffsetPage<Blog>,
        admin: bool,
        language: Language,
    ) -> FolioResult<OffsetPage<BlogListItem>> {
        let ids: Vec<BlogId> = blogs.items.iter().map(|blog| blog.id).collect();
        let tags = self.blogs.find_tags(&ids).await?;
        Ok(blogs.map(|blog| {
            if admin {
                BlogListItem::admin(&blog, &tags, language)
            } else {
                BlogListItem::public(&blog, &tags, language)
            }
        }))
    }

    async fn section_slugs(&self, mut ids: Vec<SectionId>) -> FolioResult<HashMap<SectionId, String>> {
        ids.sort_unstable();
        ids.dedup();
        let sections = try_join_all(ids.into_iter().map(|id| self.sections.find_by_id(id))).await?;
        Ok(sections
            .into_iter()
            .flatten()
            .map(|section| (section.id, section.slug))
            .collect())
    }

    async fn find_blog(&self, id: BlogId) -> FolioResult<Blog> {
        self.blogs
            .find_by_id(id)
            .await?
            .ok_or_else(|| FolioError::not_found("Blog", id))
    }

    async fn detail(&self, blog: &Blog) -> FolioResult<BlogDetail> {
        let tags = self.blogs.find_tags(&[blog.id]).await?;
        Ok(BlogDetail::new(blog, &tags, Language::default()))
    }

    /// Authors may edit and delete their own blogs, admins any blog.
    /// Everyone else gets the same answer as for a missing blog.
    fn check_owner(actor: Actor, blog: &Blog) -> FolioResult<()> {
        if actor.is_admin() || blog.user_id == Some(actor.user_id) {
            Ok(())
        } else {
            Err(FolioError::not_found("Blog", blog.id))
        }
    }
}

impl std::fmt::Debug for BlogServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlogServiceImpl")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl BlogService for BlogServiceImpl {
    async fn list_blogs(
        &self,
        section_id: SectionId,
        page: OffsetRequest,
        published_only: bool,
        language: Language,
    ) -> FolioResult<OffsetPage<BlogListItem>> {
        let page = self.settings.offset_request(page)?;
        debug!(%section_id, page = page.page, size = page.size, published_only, "Listing blogs");

        let key = cache_keys::blog_list(section_id, language, page, published_only);
        let mut listing = self
            .cache
            .get_or_set(&key, self.settings.ttl, || async move {
                let blogs = self
                    .settings
                    .offset
                    .paginate(
                        page,
                        self.blogs.count_by_section(section_id, published_only),
                        |request| self.blogs.find_by_section(section_id, published_only, request),
                    )
                    .await?;
                let mut listing = self.list_items(blogs, !published_only, language).await?;

                if !published_only {
                    let counts = self
                        .blogs
                        .monthly_counts(section_id, month_window(Utc::now()))
                        .await?;
                    listing.pagination = listing
                        .pagination
                        .with_monthly_counts(counts.created, counts.updated);
                }
                Ok(listing)
            })
            .await?;

        self.attach_stats(&mut listing.items).await?;
        Ok(listing)
    }

    async fn list_blogs_by_tag(
        &self,
        tag_slug: &str,
        page: OffsetRequest,
        language: Language,
    ) -> FolioResult<OffsetPage<BlogListItem>> {
        let page = self.settings.offset_request(page)?;
        debug!(tag_slug, page = page.page, size = page.size, "Listing blogs by tag");

        let key = cache_keys::blog_list_by_tag(tag_slug, language, page);
        let mut listing = self
            .cache
            .get_or_set(&key, self.settings.ttl, || async move {
                let tag = self
                    .tags
                    .find_by_slug(tag_slug)
                    .await?
                    .ok_or_else(|| FolioError::not_found("Tag", tag_slug))?;
                let blogs = self
                    .settings
                    .offset
                    .paginate(page, self.blogs.count_by_tag(tag.id), |request| {
                        self.blogs.find_by_tag(tag.id, request)
                    })
                    .await?;
                self.list_items(blogs, false, language).await
            })
            .await?;

        self.attach_stats(&mut listing.items).await?;
        Ok(listing)
    }

    async fn list_archived_blogs(
        &self,
        cursor: Option<&str>,
        limit: Option<u32>,
        language: Language,
    ) -> FolioResult<KeysetPage<BlogListItem>> {
        let limit = self.settings.keyset_limit(limit);
        debug!(?cursor, limit, "Listing archived blogs");

        let key = cache_keys::archived_blog_list(language, limit, cursor);
        self.cache
            .get_or_set(&key, self.settings.ttl, || async move {
                let paginator = KeysetPaginator::DESC;
                let window = KeysetWindow::new(&paginator, cursor, limit);
                let rows = self.blogs.find_archived(&window).await?;
                let prev_cursor = window.after.and(cursor).map(str::to_string);
                let page = paginator.finish(rows, limit, prev_cursor);

                let ids: Vec<BlogId> = page.items.iter().map(|blog| blog.id).collect();
                let tags = self.blogs.find_tags(&ids).await?;
                Ok(page.map(|blog| BlogListItem::public(&blog, &tags, language)))
            })
            .await
    }

    async fn list_saved_blogs(
        &self,
        user_id: UserId,
        page: OffsetRequest,
        language: Language,
    ) -> FolioResult<OffsetPage<SavedBlogItem>> {
        let page = self.settings.offset_request(page)?;
        debug!(%user_id, page = page.page, size = page.size, "Listing saved blogs");

        let key = cache_keys::saved_blog_list(user_id, language, page);
        self.cache
            .get_or_set(&key, self.settings.ttl, || async move {
                let saved = self
                    .settings
                    .offset
                    .paginate(page, self.blogs.count_saved(user_id), |request| {
                        self.blogs.find_saved(user_id, request)
                    })
                    .await?;
                let slugs = self
                    .section_slugs(saved.items.iter().map(|s| s.blog.section_id).collect())
                    .await?;
                let new_items = self
                    .blogs
                    .count_saved_between(user_id, month_window(Utc::now()))
                    .await?;

                let mut listing = saved.map(|s| SavedBlogItem {
                    blog_id: s.blog.id,
                    blog_slug: s.blog.slug.clone(),
                    section_slug: slugs.get(&s.blog.section_id).cloned(),
                    blog_title: s.blog.title(language).map(str::to_string),
                    saved_at: s.saved_at,
                });
                listing.pagination.new_items_this_month = Some(new_items);
                Ok(listing)
            })
            .await
    }

    async fn get_blog(&self, slug: &str, language: Language) -> FolioResult<BlogDetail> {
        debug!(slug, "Getting blog");

        let key = cache_keys::blog_details(slug, language);
        let mut detail: BlogDetail = self
            .cache
            .get_or_set(&key, self.settings.ttl, || async move {
                let blog = self
                    .blogs
                    .find_by_slug(slug)
                    .await?
                    .ok_or_else(|| FolioError::not_found("Blog", slug))?;
                let tags = self.blogs.find_tags(&[blog.id]).await?;
                Ok(BlogDetail::new(&blog, &tags, language))
            })
            .await?;

        let mut stats = self.blogs.find_stats(&[detail.blog_id]).await?;
        detail.stats = Some(stats.remove(&detail.blog_id).unwrap_or_default());
        Ok(detail)
    }

    async fn view_blog(
        &self,
        slug: &str,
        language: Language,
        visitor: &Visitor,
        is_editor: bool,
    ) -> FolioResult<BlogDetail> {
        let mut detail = self.get_blog(slug, language).await?;

        let key = cache_keys::blog_view_marker(detail.blog_id);
        let fingerprint = visitor.view_fingerprint(is_editor).to_string();
        let last = self.cache.get::<String>(&key).await.unwrap_or_else(|e| {
            warn!(key = %key, error = %e, "Cache read failed, counting the view");
            None
        });
        if last.as_deref() == Some(fingerprint.as_str()) {
            return Ok(detail);
        }

        self.blogs.increment_views(detail.blog_id).await?;
        if let Some(stats) = detail.stats.as_mut() {
            stats.views += 1;
        }
        if let Err(e) = self.cache.set(&key, &fingerprint, VIEW_MARKER_TTL).await {
            warn!(key = %key, error = %e, "Failed to store view marker");
        }
        debug!(blog_id = %detail.blog_id, "View counted");
        Ok(detail)
    }

    async fn list_popular_blogs(&self, language: Language) -> FolioResult<Vec<PopularBlogItem>> {
        debug!(%language, "Listing popular blogs");

        let key = cache_keys::popular_blogs(language);
        self.cache
            .get_or_set(&key, self.settings.ttl, || async move {
                let popular = self.blogs.find_popular(POPULAR_BLOG_LIMIT).await?;
                let ids: Vec<BlogId> = popular.iter().map(|entry| entry.blog.id).collect();
                let tags = self.blogs.find_tags(&ids).await?;
                let slugs = self
                    .section_slugs(popular.iter().map(|entry| entry.blog.section_id).collect())
                    .await?;

                Ok(popular
                    .iter()
                    .map(|entry| {
                        let section_slug = slugs.get(&entry.blog.section_id).cloned();
                        PopularBlogItem::new(entry, &tags, section_slug, language)
                    })
                    .collect())
            })
            .await
    }

    async fn get_blog_navigation(&self, id: BlogId, language: Language) -> FolioResult<BlogNavigation> {
        debug!(blog_id = %id, "Getting blog navigation");

        let key = cache_keys::blog_navigation(id, language);
        self.cache
            .get_or_set(&key, self.settings.ttl, || async move {
                let blog = self.find_blog(id).await?;
                let section_slug = self
                    .sections
                    .find_by_id(blog.section_id)
                    .await?
                    .map(|section| section.slug)
                    .unwrap_or_default();

                let position = blog.position();
                let (previous, next) = futures::try_join!(
                    self.blogs
                        .find_adjacent(blog.section_id, position, SortDirection::Desc),
                    self.blogs
                        .find_adjacent(blog.section_id, position, SortDirection::Asc),
                )?;

                let entry = |neighbour: Blog| NavigationEntry {
                    section_slug: section_slug.clone(),
                    blog_title: neighbour.title(language).map(str::to_string),
                    blog_slug: neighbour.slug,
                };
                Ok(BlogNavigation {
                    previous: previous.map(&entry),
                    next: next.map(&entry),
                })
            })
            .await
    }

    async fn get_blog_stats(&self, id: BlogId) -> FolioResult<BlogStats> {
        self.find_blog(id).await?;
        let mut stats = self.blogs.find_stats(&[id]).await?;
        Ok(stats.remove(&id).unwrap_or_default())
    }

    async fn create_blog(&self, actor: Actor, draft: BlogDraft) -> FolioResult<BlogDetail> {
        debug!(user_id = %actor.user_id, "Creating blog");

        draft.validate_request()?;
        let slug = slugify(&draft.english_title, BLOG_SLUG_MAX_LEN);
        if slug.is_empty() {
            return Err(FolioError::validation(
                "english_title: must contain at least one ASCII letter or digit",
            ));
        }
        self.sections
            .find_by_id(draft.section_id)
            .await?
            .ok_or_else(|| FolioError::not_found("Section", draft.section_id))?;

        let blog = self.blogs.insert(actor.user_id, &slug, &draft).await?;
        info!(blog_id = %blog.id, slug = %blog.slug, "Blog created");

        self.cache
            .invalidate(&[cache_keys::blog_list_section_pattern(blog.section_id)])
            .await;

        self.detail(&blog).await
    }

    async fn update_blog(&self, actor: Actor, id: BlogId, draft: BlogDraft) -> FolioResult<BlogDetail> {
        debug!(blog_id = %id, user_id = %actor.user_id, "Updating blog");

        draft.validate_request()?;
        let mut blog = self.find_blog(id).await?;
        Self::check_owner(actor, &blog)?;

        let old_slug = blog.slug.clone();
        if blog.english_title.as_deref() != Some(draft.english_title.as_str()) {
            let slug = slugify(&draft.english_title, BLOG_SLUG_MAX_LEN);
            if slug.is_empty() {
                return Err(FolioError::validation(
                    "english_title: must contain at least one ASCII letter or digit",
                ));
            }
            blog.slug = slug;
        }
        if draft.section_id != blog.section_id {
            self.sections
                .find_by_id(draft.section_id)
                .await?
                .ok_or_else(|| FolioError::not_found("Section", draft.section_id))?;
        }

        blog.section_id = draft.section_id;
        blog.chinese_title = draft.chinese_title;
        blog.english_title = Some(draft.english_title);
        blog.chinese_description = draft.chinese_description;
        blog.english_description = draft.english_description;
        blog.chinese_content = draft.chinese_content;
        blog.english_content = draft.english_content;

        let blog = self.blogs.update(&blog).await?;
        if !draft.tag_ids.is_empty() {
            self.blogs.replace_tags(id, &draft.tag_ids).await?;
        }
        info!(blog_id = %id, slug = %blog.slug, "Blog updated");

        let mut patterns = vec![
            cache_keys::blog_list_pattern(),
            cache_keys::blog_list_by_tag_pattern(),
            cache_keys::archived_blog_list_pattern(),
            cache_keys::saved_blog_list_pattern(),
            cache_keys::blog_navigation_pattern(),
            cache_keys::popular_blogs_pattern(),
            cache_keys::blog_details_slug_pattern(&old_slug),
        ];
        if blog.slug != old_slug {
            patterns.push(cache_keys::blog_details_slug_pattern(&blog.slug));
        }
        self.cache.invalidate(&patterns).await;

        self.detail(&blog).await
    }

    async fn update_blog_status(
        &self,
        actor: Actor,
        id: BlogId,
        request: UpdateBlogStatusRequest,
    ) -> FolioResult<()> {
        actor.require_admin()?;
        let change = request.change()?;
        let blog = self.find_blog(id).await?;

        self.blogs.update_status(id, change).await?;
        info!(blog_id = %id, flag = change.column(), value = change.value(), "Blog status updated");

        self.cache
            .invalidate(&[
                cache_keys::blog_list_pattern(),
                cache_keys::blog_list_by_tag_pattern(),
                cache_keys::archived_blog_list_pattern(),
                cache_keys::blog_navigation_pattern(),
                cache_keys::popular_blogs_pattern(),
                cache_keys::blog_details_slug_pattern(&blog.slug),
            ])
            .await;
        Ok(())
    }

    async fn delete_blog(&self, actor: Actor, id: BlogId) -> FolioResult<()> {
        let blog = self.find_blog(id).await?;
        Self::check_owner(actor, &blog)?;

        if !self.blogs.delete(id).await? {
            return Err(FolioError::not_found("Blog", id));
        }
        info!(blog_id = %id, "Blog deleted");

        let [view_marker, like_markers] = cache_keys::blog_marker_patterns(id);
        self.cache
            .invalidate(&[
                cache_keys::blog_list_pattern(),
                cache_keys::blog_list_by_tag_pattern(),
                cache_keys::archived_blog_list_pattern(),
                cache_keys::saved_blog_list_pattern(),
                cache_keys::blog_navigation_pattern(),
                cache_keys::popular_blogs_pattern(),
                cache_keys::blog_details_slug_pattern(&blog.slug),
                cache_keys::comment_list_pattern(id),
                view_marker,
                like_markers,
            ])
            .await;
        Ok(())
    }

    async fn toggle_saved_blog(&self, user_id: UserId, id: BlogId) -> FolioResult<bool> {
        self.find_blog(id).await?;

        let saved = self.blogs.toggle_saved(user_id, id).await?;
        info!(%user_id, blog_id = %id, saved, "Saved blog toggled");

        self.cache
            .invalidate(&[cache_keys::saved_blog_list_user_pattern(user_id)])
            .await;
        Ok(saved)
    }

    async fn toggle_blog_like(&self, id: BlogId, visitor: &Visitor) -> FolioResult<bool> {
        self.find_blog(id).await?;

        let key = cache_keys::blog_like_marker(id, visitor.address_fingerprint());
        let liked_before = self.cache.exists(&key).await.unwrap_or_else(|e| {
            warn!(key = %key, error = %e, "Cache read failed, treating blog as not liked");
            false
        });

        if liked_before {
            self.blogs.adjust_likes(id, -1).await?;
            if let Err(e) = self.cache.delete(&key).await {
                warn!(key = %key, error = %e, "Failed to clear like marker");
            }
        } else {
            self.blogs.adjust_likes(id, 1).await?;
            if let Err(e) = self.cache.set(&key, &true, LIKE_MARKER_TTL).await {
                warn!(key = %key, error = %e, "Failed to store like marker");
            }
        }
        info!(blog_id = %id, liked = !liked_before, "Blog like toggled");
        Ok(!liked_before)
    }
}
