//! MySQL project repository implementation.

use crate::query::{from_sql_count, push_keyset_order, push_offset_window};
use crate::{traits::ProjectRepository, DatabasePoolInterface, TimeWindow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use folio_core::{
    FolioError, FolioResult, MonthlyCounts, OffsetRequest, Project, ProjectDraft, ProjectId,
    ProjectType, SectionId, SortDirection,
};
use shaku::Component;
use sqlx::{FromRow, MySql, QueryBuilder};
use std::sync::Arc;
use tracing::debug;

const PROJECT_SELECT: &str = r#"
    SELECT p.id, p.project_type, p.section_id, p.is_published, p.chinese_title, p.english_title,
           p.slug, p.chinese_description, p.english_description,
           p.chinese_content, p.english_content, p.created_at, p.updated_at
    FROM projects p
"#;

/// MySQL project repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = ProjectRepository)]
pub struct MySqlProjectRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlProjectRepository {
    /// Creates a new MySQL project repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(&self, column: &str, value: ProjectKey<'_>) -> FolioResult<Option<Project>> {
        let mut builder = QueryBuilder::<MySql>::new(PROJECT_SELECT);
        builder.push(" WHERE p.").push(column).push(" = ");
        match value {
            ProjectKey::Id(id) => builder.push_bind(id.0),
            ProjectKey::Slug(slug) => builder.push_bind(slug),
        };

        let row = builder
            .build_query_as::<ProjectRow>()
            .fetch_optional(self.pool.inner())
            .await?;
        row.map(Project::try_from).transpose()
    }
}

enum ProjectKey<'a> {
    Id(ProjectId),
    Slug(&'a str),
}

/// Database row representation of a project.
#[derive(Debug, FromRow)]
struct ProjectRow {
    id: i64,
    project_type: i16,
    section_id: Option<i64>,
    is_published: bool,
    chinese_title: String,
    english_title: Option<String>,
    slug: String,
    chinese_description: String,
    english_description: Option<String>,
    chinese_content: serde_json::Value,
    english_content: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<ProjectRow> for Project {
    type Error = FolioError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        Ok(Project {
            id: ProjectId(row.id),
            project_type: ProjectType::try_from(row.project_type)?,
            section_id: row.section_id.map(SectionId),
            is_published: row.is_published,
            chinese_title: row.chinese_title,
            english_title: row.english_title,
            slug: row.slug,
            chinese_description: row.chinese_description,
            english_description: row.english_description,
            chinese_content: row.chinese_content,
            english_content: row.english_content,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl ProjectRepository for MySqlProjectRepository {
    async fn count(&self, published_only: bool) -> FolioResult<u64> {
        let sql = if published_only {
            "SELECT COUNT(*) FROM projects WHERE is_published = TRUE"
        } else {
            "SELECT COUNT(*) FROM projects"
        };
        let total: i64 = sqlx::query_scalar(sql).fetch_one(self.pool.inner()).await?;
        Ok(from_sql_count(total))
    }

    async fn find_all(&self, published_only: bool, page: OffsetRequest) -> FolioResult<Vec<Project>> {
        debug!(published_only, page = page.page, size = page.size, "Listing projects");

        let mut builder = QueryBuilder::<MySql>::new(PROJECT_SELECT);
        if published_only {
            builder.push(" WHERE p.is_published = TRUE");
        }
        push_keyset_order(&mut builder, "p", SortDirection::Desc);
        push_offset_window(&mut builder, page);

        let rows = builder
            .build_query_as::<ProjectRow>()
            .fetch_all(self.pool.inner())
            .await?;
        rows.into_iter().map(Project::try_from).collect()
    }

    async fn find_by_id(&self, id: ProjectId) -> FolioResult<Option<Project>> {
        self.fetch_one_where("id", ProjectKey::Id(id)).await
    }

    async fn find_by_slug(&self, slug: &str) -> FolioResult<Option<Project>> {
        debug!("Finding project by slug: {}", slug);
        self.fetch_one_where("slug", ProjectKey::Slug(slug)).await
    }

    async fn exists_by_title(&self, chinese_title: &str, exclude: Option<ProjectId>) -> FolioResult<bool> {
        let mut builder =
            QueryBuilder::<MySql>::new("SELECT COUNT(*) FROM projects WHERE chinese_title = ");
        builder.push_bind(chinese_title);
        if let Some(id) = exclude {
            builder.push(" AND id <> ").push_bind(id.0);
        }
        let total: i64 = builder
            .build_query_scalar::<i64>()
            .fetch_one(self.pool.inner())
            .await?;
        Ok(total > 0)
    }

    async fn insert(&self, slug: &str, draft: &ProjectDraft) -> FolioResult<Project> {
        debug!("Inserting project: {}", slug);

        let result = sqlx::query(
            r#"
            INSERT INTO projects (project_type, section_id, is_published, chinese_title, english_title,
                                  slug, chinese_description, english_description,
                                  chinese_content, english_content, created_at)
            VALUES (?, ?, FALSE, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(draft.project_type.code())
        .bind(draft.section_id.map(|id| id.0))
        .bind(&draft.chinese_title)
        .bind(&draft.english_title)
        .bind(slug)
        .bind(&draft.chinese_description)
        .bind(&draft.english_description)
        .bind(&draft.chinese_content)
        .bind(&draft.english_content)
        .bind(Utc::now())
        .execute(self.pool.inner())
        .await?;

        let id = ProjectId(i64::try_from(result.last_insert_id()).map_err(|e| {
            FolioError::Internal(format!("Project id out of range: {}", e))
        })?);

        self.find_by_id(id)
            .await?
            .ok_or_else(|| FolioError::Internal("Failed to fetch inserted project".to_string()))
    }

    async fn update(&self, project: &Project) -> FolioResult<Project> {
        debug!("Updating project: {}", project.id);

        sqlx::query(
            r#"
            UPDATE projects
            SET project_type = ?, section_id = ?, chinese_title = ?, english_title = ?, slug = ?,
                chinese_description = ?, english_description = ?,
                chinese_content = ?, english_content = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(project.project_type.code())
        .bind(project.section_id.map(|id| id.0))
        .bind(&project.chinese_title)
        .bind(&project.english_title)
        .bind(&project.slug)
        .bind(&project.chinese_description)
        .bind(&project.english_description)
        .bind(&project.chinese_content)
        .bind(&project.english_content)
        .bind(project.updated_at.unwrap_or_else(Utc::now))
        .bind(project.id.0)
        .execute(self.pool.inner())
        .await?;

        self.find_by_id(project.id)
            .await?
            .ok_or_else(|| FolioError::not_found("Project", project.id))
    }

    async fn set_published(&self, id: ProjectId, published: bool) -> FolioResult<bool> {
        debug!(project_id = %id, published, "Setting project visibility");

        let result = sqlx::query("UPDATE projects SET is_published = ?, updated_at = ? WHERE id = ?")
            .bind(published)
            .bind(Utc::now())
            .bind(id.0)
            .execute(self.pool.inner())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: ProjectId) -> FolioResult<bool> {
        debug!("Deleting project: {}", id);

        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id.0)
            .execute(self.pool.inner())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn monthly_counts(&self, window: TimeWindow) -> FolioResult<MonthlyCounts> {
        let (start, end) = window;
        let (created, updated): (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM projects WHERE created_at >= ? AND created_at < ?),
                (SELECT COUNT(*) FROM projects WHERE updated_at >= ? AND updated_at < ?)
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(start)
        .bind(end)
        .fetch_one(self.pool.inner())
        .await?;

        Ok(MonthlyCounts {
            created: from_sql_count(created),
            updated: from_sql_count(updated),
        })
    }
}

impl std::fmt::Debug for MySqlProjectRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlProjectRepository").finish_non_exhaustive()
    }
}
