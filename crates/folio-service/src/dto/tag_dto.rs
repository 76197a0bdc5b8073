//! Tag-related DTOs.

use chrono::{DateTime, Utc};
use folio_core::{Language, Tag, TagId};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to create a tag (admin only).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTagRequest {
    #[validate(
        length(min = 1, max = 40, message = "Chinese title must be 1-40 characters"),
        custom(function = "folio_core::rules::not_blank")
    )]
    pub chinese_title: String,

    #[validate(
        length(min = 1, max = 40, message = "English title must be 1-40 characters"),
        custom(function = "folio_core::rules::not_blank")
    )]
    pub english_title: String,
}

/// Request to rename a tag (admin only). The slug follows the English title.
pub type UpdateTagRequest = CreateTagRequest;

/// Tag response DTO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagResponse {
    pub tag_id: TagId,
    pub slug: String,
    pub title: String,
    pub chinese_title: String,
    pub english_title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TagResponse {
    #[must_use]
    pub fn new(tag: &Tag, language: Language) -> Self {
        Self {
            tag_id: tag.id,
            slug: tag.slug.clone(),
            title: tag.title(language).to_string(),
            chinese_title: tag.chinese_title.clone(),
            english_title: tag.english_title.clone(),
            created_at: tag.created_at,
            updated_at: tag.updated_at,
        }
    }
}
