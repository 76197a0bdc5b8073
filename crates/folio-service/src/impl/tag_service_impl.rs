//! Tag service implementation.

use crate::cache::{cache_keys, CacheExt, CacheInterface};
use crate::dto::{CreateTagRequest, TagResponse, UpdateTagRequest};
use crate::settings::ServiceSettings;
use crate::tag_service::TagService;
use async_trait::async_trait;
use chrono::Utc;
use folio_core::{
    month_window, slugify, Actor, FolioError, FolioResult, Language, OffsetPage, OffsetRequest,
    TagId, ValidateExt, TAG_SLUG_MAX_LEN,
};
use folio_repository::TagRepository;
use std::sync::Arc;
use tracing::{debug, info};

/// Tag service backed by the tag repository.
pub struct TagServiceImpl {
    tags: Arc<dyn TagRepository>,
    cache: Arc<dyn CacheInterface>,
    settings: ServiceSettings,
}

impl TagServiceImpl {
    /// Creates a new tag service.
    pub fn new(tags: Arc<dyn TagRepository>, cache: Arc<dyn CacheInterface>, settings: ServiceSettings) -> Self {
        Self {
            tags,
            cache,
            settings,
        }
    }

    fn tag_slug(english_title: &str) -> FolioResult<String> {
        let slug = slugify(english_title, TAG_SLUG_MAX_LEN);
        if slug.is_empty() {
            return Err(FolioError::validation(
                "english_title: must contain at least one ASCII letter or digit",
            ));
        }
        Ok(slug)
    }

    /// Tag titles appear in every blog listing and detail view.
    async fn invalidate(&self) {
        self.cache
            .invalidate(&[
                cache_keys::tag_list_pattern(),
                cache_keys::blog_list_by_tag_pattern(),
                cache_keys::blog_list_pattern(),
                cache_keys::archived_blog_list_pattern(),
                cache_keys::blog_details_pattern(),
                cache_keys::popular_blogs_pattern(),
            ])
            .await;
    }
}

impl std::fmt::Debug for TagServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagServiceImpl")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TagService for TagServiceImpl {
    async fn list_tags(&self, page: OffsetRequest, language: Language) -> FolioResult<OffsetPage<TagResponse>> {
        let page = self.settings.offset_request(page)?;
        debug!(page = page.page, size = page.size, "Listing tags");

        let key = cache_keys::tag_list(language, page);
        self.cache
            .get_or_set(&key, self.settings.ttl, || async move {
                let tags = self
                    .settings
                    .offset
                    .paginate(page, self.tags.count(), |request| self.tags.find_all(request))
                    .await?;
                let counts = self.tags.monthly_counts(month_window(Utc::now())).await?;

                let mut listing = tags.map(|tag| TagResponse::new(&tag, language));
                listing.pagination = listing
                    .pagination
                    .with_monthly_counts(counts.created, counts.updated);
                Ok(listing)
            })
            .await
    }

    async fn create_tag(&self, actor: Actor, request: CreateTagRequest) -> FolioResult<TagResponse> {
        actor.require_admin()?;
        request.validate_request()?;

        let chinese_title = request.chinese_title.trim();
        let english_title = request.english_title.trim();
        if self.tags.exists_by_title(chinese_title, None).await? {
            return Err(FolioError::conflict(format!("Tag '{chinese_title}' already exists")));
        }
        let slug = Self::tag_slug(english_title)?;

        let tag = self.tags.insert(chinese_title, english_title, &slug).await?;
        info!(tag_id = %tag.id, slug = %tag.slug, "Tag created");

        self.cache.invalidate(&[cache_keys::tag_list_pattern()]).await;
        Ok(TagResponse::new(&tag, Language::default()))
    }

    async fn update_tag(&self, actor: Actor, id: TagId, request: UpdateTagRequest) -> FolioResult<TagResponse> {
        actor.require_admin()?;
        request.validate_request()?;

        let mut tag = self
            .tags
            .find_by_id(id)
            .await?
            .ok_or_else(|| FolioError::not_found("Tag", id))?;

        let chinese_title = request.chinese_title.trim();
        if self.tags.exists_by_title(chinese_title, Some(id)).await? {
            return Err(FolioError::conflict(format!("Tag '{chinese_title}' already exists")));
        }
        tag.slug = Self::tag_slug(request.english_title.trim())?;
        tag.chinese_title = chinese_title.to_string();
        tag.english_title = request.english_title.trim().to_string();

        let tag = self.tags.update(&tag).await?;
        info!(tag_id = %id, slug = %tag.slug, "Tag updated");

        self.invalidate().await;
        Ok(TagResponse::new(&tag, Language::default()))
    }

    async fn delete_tag(&self, actor: Actor, id: TagId) -> FolioResult<()> {
        actor.require_admin()?;

        if !self.tags.delete(id).await? {
            return Err(FolioError::not_found("Tag", id));
        }
        info!(tag_id = %id, "Tag deleted");

        self.invalidate().await;
        Ok(())
    }
}
