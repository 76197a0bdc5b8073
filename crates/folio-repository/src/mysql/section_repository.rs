//! MySQL section repository implementation.

use crate::{traits::SectionRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use folio_core::{FolioError, FolioResult, Section, SectionId, SectionType};
use shaku::Component;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

const SECTION_SELECT: &str = r#"
    SELECT id, section_type, slug, chinese_title, english_title,
           chinese_description, english_description, is_active, parent_id,
           created_at, updated_at
    FROM sections
"#;

/// MySQL section repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = SectionRepository)]
pub struct MySqlSectionRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlSectionRepository {
    /// Creates a new MySQL section repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a section.
#[derive(Debug, FromRow)]
struct SectionRow {
    id: i64,
    section_type: i16,
    slug: String,
    chinese_title: String,
    english_title: Option<String>,
    chinese_description: Option<String>,
    english_description: Option<String>,
    is_active: bool,
    parent_id: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<SectionRow> for Section {
    type Error = FolioError;

    fn try_from(row: SectionRow) -> Result<Self, Self::Error> {
        Ok(Section {
            id: SectionId(row.id),
            section_type: SectionType::try_from(row.section_type)?,
            slug: row.slug,
            chinese_title: row.chinese_title,
            english_title: row.english_title,
            chinese_description: row.chinese_description,
            english_description: row.english_description,
            is_active: row.is_active,
            parent_id: row.parent_id.map(SectionId),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl SectionRepository for MySqlSectionRepository {
    async fn find_active(&self) -> FolioResult<Vec<Section>> {
        debug!("Listing active sections");

        // MySQL sorts NULL first, so roots precede their children.
        let rows = sqlx::query_as::<_, SectionRow>(&format!(
            "{SECTION_SELECT} WHERE is_active = TRUE ORDER BY parent_id ASC, id ASC"
        ))
        .fetch_all(self.pool.inner())
        .await?;

        rows.into_iter().map(Section::try_from).collect()
    }

    async fn find_by_id(&self, id: SectionId) -> FolioResult<Option<Section>> {
        let row = sqlx::query_as::<_, SectionRow>(&format!("{SECTION_SELECT} WHERE id = ?"))
            .bind(id.0)
            .fetch_optional(self.pool.inner())
            .await?;
        row.map(Section::try_from).transpose()
    }

    async fn find_by_slug(&self, slug: &str) -> FolioResult<Option<Section>> {
        debug!("Finding section by slug: {}", slug);

        let row = sqlx::query_as::<_, SectionRow>(&format!("{SECTION_SELECT} WHERE slug = ?"))
            .bind(slug)
            .fetch_optional(self.pool.inner())
            .await?;
        row.map(Section::try_from).transpose()
    }

    async fn update(&self, section: &Section) -> FolioResult<Section> {
        debug!("Updating section: {}", section.id);

        sqlx::query(
            r#"
            UPDATE sections
            SET slug = ?, chinese_title = ?, english_title = ?,
                chinese_description = ?, english_description = ?,
                is_active = ?, parent_id = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&section.slug)
        .bind(&section.chinese_title)
        .bind(&section.english_title)
        .bind(&section.chinese_description)
        .bind(&section.english_description)
        .bind(section.is_active)
        .bind(section.parent_id.map(|id| id.0))
        .bind(section.updated_at.unwrap_or_else(Utc::now))
        .bind(section.id.0)
        .execute(self.pool.inner())
        .await?;

        self.find_by_id(section.id)
            .await?
            .ok_or_else(|| FolioError::not_found("Section", section.id))
    }
}

impl std::fmt::Debug for MySqlSectionRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlSectionRepository").finish_non_exhaustive()
    }
}
