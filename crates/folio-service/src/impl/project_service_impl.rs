//! Project service implementation.

use crate::cache::{cache_keys, CacheExt, CacheInterface};
use crate::dto::{ProjectDetail, ProjectListItem};
use crate::project_service::ProjectService;
use crate::settings::ServiceSettings;
use async_trait::async_trait;
use chrono::Utc;
use folio_core::{
    month_window, slugify, Actor, FolioError, FolioResult, Language, OffsetPage, OffsetRequest,
    ProjectDraft, ProjectId, ValidateExt, PROJECT_SLUG_MAX_LEN,
};
use folio_repository::ProjectRepository;
use std::sync::Arc;
use tracing::{debug, info};

/// Project service backed by the project repository.
pub struct ProjectServiceImpl {
    projects: Arc<dyn ProjectRepository>,
    cache: Arc<dyn CacheInterface>,
    settings: ServiceSettings,
}

impl ProjectServiceImpl {
    /// Creates a new project service.
    pub fn new(
        projects: Arc<dyn ProjectRepository>,
        cache: Arc<dyn CacheInterface>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            projects,
            cache,
            settings,
        }
    }

    fn project_slug(english_title: &str) -> FolioResult<String> {
        let slug = slugify(english_title, PROJECT_SLUG_MAX_LEN);
        if slug.is_empty() {
            return Err(FolioError::validation(
                "english_title: must contain at least one ASCII letter or digit",
            ));
        }
        Ok(slug)
    }

    async fn invalidate(&self) {
        self.cache
            .invalidate(&[
                cache_keys::project_list_pattern(),
                cache_keys::project_details_pattern(),
            ])
            .await;
    }
}

impl std::fmt::Debug for ProjectServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectServiceImpl")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ProjectService for ProjectServiceImpl {
    async fn list_projects(
        &self,
        page: OffsetRequest,
        published_only: bool,
        language: Language,
    ) -> FolioResult<OffsetPage<ProjectListItem>> {
        let page = self.settings.offset_request(page)?;
        debug!(page = page.page, size = page.size, published_only, "Listing projects");

        let key = cache_keys::project_list(language, page, published_only);
        self.cache
            .get_or_set(&key, self.settings.ttl, || async move {
                let projects = self
                    .settings
                    .offset
                    .paginate(page, self.projects.count(published_only), |request| {
                        self.projects.find_all(published_only, request)
                    })
                    .await?;

                if published_only {
                    return Ok(projects.map(|project| ProjectListItem::public(&project, language)));
                }

                let counts = self.projects.monthly_counts(month_window(Utc::now())).await?;
                let mut listing = projects.map(|project| ProjectListItem::admin(&project, language));
                listing.pagination = listing
                    .pagination
                    .with_monthly_counts(counts.created, counts.updated);
                Ok(listing)
            })
            .await
    }

    async fn get_project(&self, slug: &str, language: Language) -> FolioResult<ProjectDetail> {
        debug!(slug, "Getting project");

        let key = cache_keys::project_details(slug, language);
        self.cache
            .get_or_set(&key, self.settings.ttl, || async move {
                let project = self
                    .projects
                    .find_by_slug(slug)
                    .await?
                    .ok_or_else(|| FolioError::not_found("Project", slug))?;
                Ok(ProjectDetail::new(&project, language))
            })
            .await
    }

    async fn create_project(&self, actor: Actor, draft: ProjectDraft) -> FolioResult<ProjectDetail> {
        actor.require_admin()?;
        draft.validate_request()?;

        if self.projects.exists_by_title(&draft.chinese_title, None).await? {
            return Err(FolioError::conflict(format!(
                "Project '{}' already exists",
                draft.chinese_title
            )));
        }
        let slug = Self::project_slug(&draft.english_title)?;

        let project = self.projects.insert(&slug, &draft).await?;
        info!(project_id = %project.id, slug = %project.slug, "Project created");

        self.cache.invalidate(&[cache_keys::project_list_pattern()]).await;
        Ok(ProjectDetail::new(&project, Language::default()))
    }

    async fn update_project(
        &self,
        actor: Actor,
        id: ProjectId,
        draft: ProjectDraft,
    ) -> FolioResult<ProjectDetail> {
        actor.require_admin()?;
        draft.validate_request()?;

        let mut project = self
            .projects
            .find_by_id(id)
            .await?
            .ok_or_else(|| FolioError::not_found("Project", id))?;
        if self.projects.exists_by_title(&draft.chinese_title, Some(id)).await? {
            return Err(FolioError::conflict(format!(
                "Project '{}' already exists",
                draft.chinese_title
            )));
        }

        if project.english_title.as_deref() != Some(draft.english_title.as_str()) {
            project.slug = Self::project_slug(&draft.english_title)?;
        }
        project.project_type = draft.project_type;
        project.section_id = draft.section_id;
        project.chinese_title = draft.chinese_title;
        project.english_title = Some(draft.english_title);
        project.chinese_description = draft.chinese_description;
        project.english_description = draft.english_description;
        project.chinese_content = draft.chinese_content;
        project.english_content = draft.english_content;

        let project = self.projects.update(&project).await?;
        info!(project_id = %id, slug = %project.slug, "Project updated");

        self.invalidate().await;
        Ok(ProjectDetail::new(&project, Language::default()))
    }

    async fn set_project_published(&self, actor: Actor, id: ProjectId, published: bool) -> FolioResult<()> {
        actor.require_admin()?;

        if !self.projects.set_published(id, published).await? {
            return Err(FolioError::not_found("Project", id));
        }
        info!(project_id = %id, published, "Project publication changed");

        self.invalidate().await;
        Ok(())
    }

    async fn delete_project(&self, actor: Actor, id: ProjectId) -> FolioResult<()> {
        actor.require_admin()?;

        if !self.projects.delete(id).await? {
            return Err(FolioError::not_found("Project", id));
        }
        info!(project_id = %id, "Project deleted");

        self.invalidate().await;
        Ok(())
    }
}
