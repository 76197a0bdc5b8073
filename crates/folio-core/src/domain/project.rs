//! Portfolio project entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use crate::{FolioError, Language, ProjectId, SectionId};

/// Maximum length of a generated project slug.
pub const PROJECT_SLUG_MAX_LEN: usize = 255;

/// Kind of project. Stored as a small integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    /// Web application.
    #[default]
    Web,
    /// Mobile application.
    Mobile,
    /// Desktop application.
    Desktop,
    /// Anything else.
    Other,
}

impl ProjectType {
    /// Stored integer code.
    #[must_use]
    pub const fn code(self) -> i16 {
        match self {
            Self::Web => 1,
            Self::Mobile => 2,
            Self::Desktop => 3,
            Self::Other => 4,
        }
    }

    /// Human readable label in the requested language.
    #[must_use]
    pub const fn label(self, language: Language) -> &'static str {
        match (language, self) {
            (Language::ZhCn, Self::Web) => "网页应用",
            (Language::ZhCn, Self::Mobile) => "移动应用",
            (Language::ZhCn, Self::Desktop) => "桌面应用",
            (Language::ZhCn, Self::Other) => "其他应用",
            (Language::EnUs, Self::Web) => "Web",
            (Language::EnUs, Self::Mobile) => "Mobile",
            (Language::EnUs, Self::Desktop) => "Desktop",
            (Language::EnUs, Self::Other) => "Other",
        }
    }
}

impl TryFrom<i16> for ProjectType {
    type Error = FolioError;

    fn try_from(code: i16) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Web),
            2 => Ok(Self::Mobile),
            3 => Ok(Self::Desktop),
            4 => Ok(Self::Other),
            other => Err(FolioError::internal(format!("unknown project type {other}"))),
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Web => "web",
            Self::Mobile => "mobile",
            Self::Desktop => "desktop",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// A portfolio project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier.
    pub id: ProjectId,
    /// Project kind.
    pub project_type: ProjectType,
    /// Owning section.
    pub section_id: Option<SectionId>,
    /// Visible on public listings.
    pub is_published: bool,
    /// Chinese title, unique.
    pub chinese_title: String,
    /// English title.
    pub english_title: Option<String>,
    /// URL slug, unique.
    pub slug: String,
    /// Chinese description.
    pub chinese_description: String,
    /// English description.
    pub english_description: Option<String>,
    /// Rich-text body, Chinese.
    pub chinese_content: serde_json::Value,
    /// Rich-text body, English.
    pub english_content: Option<serde_json::Value>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Project {
    /// Title in the requested language.
    #[must_use]
    pub fn title(&self, language: Language) -> Option<&str> {
        match language {
            Language::ZhCn => Some(self.chinese_title.as_str()),
            Language::EnUs => self.english_title.as_deref(),
        }
    }

    /// Description in the requested language.
    #[must_use]
    pub fn description(&self, language: Language) -> Option<&str> {
        match language {
            Language::ZhCn => Some(self.chinese_description.as_str()),
            Language::EnUs => self.english_description.as_deref(),
        }
    }
}

/// Fields of a new or edited project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProjectDraft {
    /// Project kind.
    pub project_type: ProjectType,
    /// Owning section.
    pub section_id: Option<SectionId>,
    /// Chinese title.
    #[validate(length(min = 1, max = 200))]
    pub chinese_title: String,
    /// English title, also the slug source.
    #[validate(length(min = 1, max = 200))]
    pub english_title: String,
    /// Chinese description.
    #[validate(length(min = 1, max = 300))]
    pub chinese_description: String,
    /// English description.
    #[validate(length(max = 300))]
    pub english_description: Option<String>,
    /// Rich-text body, Chinese.
    pub chinese_content: serde_json::Value,
    /// Rich-text body, English.
    pub english_content: Option<serde_json::Value>,
}
