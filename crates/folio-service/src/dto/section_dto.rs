//! Section-related DTOs.

use folio_core::{Language, Section, SectionId, SectionType};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to edit a section (admin only).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateSectionRequest {
    #[validate(
        length(min = 1, max = 100, message = "Chinese title must be 1-100 characters"),
        custom(function = "folio_core::rules::not_blank")
    )]
    pub chinese_title: String,

    #[validate(
        length(min = 1, max = 100, message = "English title must be 1-100 characters"),
        custom(function = "folio_core::rules::not_blank")
    )]
    pub english_title: String,

    #[validate(length(max = 500))]
    pub chinese_description: Option<String>,

    #[validate(length(max = 500))]
    pub english_description: Option<String>,

    pub is_active: Option<bool>,
}

/// A node of the section navigation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionNode {
    pub section_id: SectionId,
    #[serde(rename = "type")]
    pub section_type: SectionType,
    pub title: Option<String>,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SectionNode>,
}

impl SectionNode {
    #[must_use]
    pub fn new(section: &Section, language: Language) -> Self {
        Self {
            section_id: section.id,
            section_type: section.section_type,
            title: section.title(language).map(str::to_string),
            slug: section.slug.clone(),
            children: Vec::new(),
        }
    }
}

/// Full section view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionDetail {
    pub section_id: SectionId,
    #[serde(rename = "type")]
    pub section_type: SectionType,
    pub slug: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub parent_id: Option<SectionId>,
}

impl SectionDetail {
    #[must_use]
    pub fn new(section: &Section, language: Language) -> Self {
        Self {
            section_id: section.id,
            section_type: section.section_type,
            slug: section.slug.clone(),
            title: section.title(language).map(str::to_string),
            description: section.description(language).map(str::to_string),
            is_active: section.is_active,
            parent_id: section.parent_id,
        }
    }
}
