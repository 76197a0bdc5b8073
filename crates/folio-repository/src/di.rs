//! Dependency injection module using Shaku.
//!
//! [`RepositoryModule`] owns the pool and one MySQL repository per
//! aggregate; services take the resolved trait objects through
//! [`Repositories`].

use crate::{
    BlogRepository, CommentRepository, DatabasePool, DatabasePoolInterface, DatabasePoolParameters,
    MySqlBlogRepository, MySqlCommentRepository, MySqlProjectRepository, MySqlSectionRepository,
    MySqlTagRepository, ProjectRepository, SectionRepository, TagRepository,
};
use folio_config::DatabaseConfig;
use folio_core::FolioResult;
use shaku::{module, HasComponent};
use std::sync::Arc;

module! {
    pub RepositoryModule {
        components = [
            DatabasePool,
            MySqlBlogRepository,
            MySqlCommentRepository,
            MySqlTagRepository,
            MySqlSectionRepository,
            MySqlProjectRepository,
        ],
        providers = [],
    }
}

/// Builds the module around an already connected pool.
#[must_use]
pub fn repository_module(pool: &DatabasePool) -> RepositoryModule {
    RepositoryModule::builder()
        .with_component_parameters::<DatabasePool>(DatabasePoolParameters {
            pool: pool.inner().clone(),
        })
        .build()
}

/// Connects to MySQL (migrating when configured) and builds the module.
///
/// # Errors
///
/// See [`DatabasePool::new`].
pub async fn build_repository_module(config: &DatabaseConfig) -> FolioResult<Arc<RepositoryModule>> {
    let pool = DatabasePool::new(config).await?;
    Ok(Arc::new(repository_module(&pool)))
}

/// The repositories resolved from a [`RepositoryModule`].
#[derive(Clone)]
pub struct Repositories {
    pub pool: Arc<dyn DatabasePoolInterface>,
    pub blogs: Arc<dyn BlogRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub sections: Arc<dyn SectionRepository>,
    pub projects: Arc<dyn ProjectRepository>,
}

impl Repositories {
    /// Resolves every repository; they all share the module's pool.
    #[must_use]
    pub fn resolve(module: &RepositoryModule) -> Self {
        Self {
            pool: module.resolve(),
            blogs: module.resolve(),
            comments: module.resolve(),
            tags: module.resolve(),
            sections: module.resolve(),
            projects: module.resolve(),
        }
    }
}

impl std::fmt::Debug for Repositories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repositories").finish_non_exhaustive()
    }
}
