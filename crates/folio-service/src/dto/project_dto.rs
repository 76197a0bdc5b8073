//! Project-related DTOs.

use chrono::{DateTime, Utc};
use folio_core::{Language, Project, ProjectId, ProjectType, SectionId};
use serde::{Deserialize, Serialize};

/// One row of a project listing.
///
/// The admin listing adds the publication flag and a type label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectListItem {
    pub project_id: ProjectId,
    pub project_slug: String,
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    pub title: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_label: Option<String>,
}

impl ProjectListItem {
    #[must_use]
    pub fn public(project: &Project, language: Language) -> Self {
        Self {
            project_id: project.id,
            project_slug: project.slug.clone(),
            project_type: project.project_type,
            title: project.title(language).map(str::to_string),
            description: project.description(language).map(str::to_string),
            created_at: project.created_at,
            updated_at: project.updated_at,
            is_published: None,
            type_label: None,
        }
    }

    #[must_use]
    pub fn admin(project: &Project, language: Language) -> Self {
        Self {
            is_published: Some(project.is_published),
            type_label: Some(project.project_type.label(language).to_string()),
            ..Self::public(project, language)
        }
    }
}

/// Full project view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDetail {
    pub project_id: ProjectId,
    pub project_slug: String,
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    pub section_id: Option<SectionId>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<serde_json::Value>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProjectDetail {
    #[must_use]
    pub fn new(project: &Project, language: Language) -> Self {
        let content = match language {
            Language::ZhCn => Some(project.chinese_content.clone()),
            Language::EnUs => project.english_content.clone(),
        };
        Self {
            project_id: project.id,
            project_slug: project.slug.clone(),
            project_type: project.project_type,
            section_id: project.section_id,
            title: project.title(language).map(str::to_string),
            description: project.description(language).map(str::to_string),
            content,
            is_published: project.is_published,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}
