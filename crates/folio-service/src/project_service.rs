//! Project service trait definition.

use crate::dto::{ProjectDetail, ProjectListItem};
use async_trait::async_trait;
use folio_core::{
    Actor, FolioResult, Interface, Language, OffsetPage, OffsetRequest, ProjectDraft, ProjectId,
};

/// Project service trait.
#[async_trait]
pub trait ProjectService: Interface + Send + Sync {
    /// Lists projects. The unfiltered listing is the admin view.
    async fn list_projects(
        &self,
        page: OffsetRequest,
        published_only: bool,
        language: Language,
    ) -> FolioResult<OffsetPage<ProjectListItem>>;

    /// Gets a project by slug.
    async fn get_project(&self, slug: &str, language: Language) -> FolioResult<ProjectDetail>;

    /// Creates an unpublished project.
    async fn create_project(&self, actor: Actor, draft: ProjectDraft) -> FolioResult<ProjectDetail>;

    /// Replaces the content of a project.
    async fn update_project(
        &self,
        actor: Actor,
        id: ProjectId,
        draft: ProjectDraft,
    ) -> FolioResult<ProjectDetail>;

    /// Publishes or unpublishes a project.
    async fn set_project_published(&self, actor: Actor, id: ProjectId, published: bool) -> FolioResult<()>;

    /// Deletes a project.
    async fn delete_project(&self, actor: Actor, id: ProjectId) -> FolioResult<()>;
}
