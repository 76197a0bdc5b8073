//! Site section entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{FolioError, Language, SectionId};

/// Kind of content a section hosts. Stored as a small integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    /// Blog post listing.
    Blog,
    /// Portfolio projects.
    Project,
    /// Message board.
    Board,
    /// Friend links.
    Friend,
    /// About page.
    About,
}

impl SectionType {
    /// Stored integer code.
    #[must_use]
    pub const fn code(self) -> i16 {
        match self {
            Self::Blog => 1,
            Self::Project => 2,
            Self::Board => 3,
            Self::Friend => 4,
            Self::About => 5,
        }
    }
}

impl TryFrom<i16> for SectionType {
    type Error = FolioError;

    fn try_from(code: i16) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Blog),
            2 => Ok(Self::Project),
            3 => Ok(Self::Board),
            4 => Ok(Self::Friend),
            5 => Ok(Self::About),
            other => Err(FolioError::internal(format!("unknown section type {other}"))),
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Blog => "blog",
            Self::Project => "project",
            Self::Board => "board",
            Self::Friend => "friend",
            Self::About => "about",
        };
        f.write_str(name)
    }
}

/// A navigable section of the site. Sections form a tree through `parent_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Unique identifier.
    pub id: SectionId,
    /// Content kind.
    pub section_type: SectionType,
    /// URL slug, unique.
    pub slug: String,
    /// Chinese title.
    pub chinese_title: String,
    /// English title.
    pub english_title: Option<String>,
    /// Chinese description.
    pub chinese_description: Option<String>,
    /// English description.
    pub english_description: Option<String>,
    /// Inactive sections are hidden everywhere.
    pub is_active: bool,
    /// Parent section.
    pub parent_id: Option<SectionId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Section {
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
        language
            .pick(&self.chinese_description, &self.english_description)
            .as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_type_codes() {
        for ty in [
            SectionType::Blog,
            SectionType::Project,
            SectionType::Board,
            SectionType::Friend,
            SectionType::About,
        ] {
            assert_eq!(SectionType::try_from(ty.code()).ok(), Some(ty));
        }
        assert!(SectionType::try_from(9).is_err());
        assert_eq!(SectionType::Friend.to_string(), "friend");
    }
}
