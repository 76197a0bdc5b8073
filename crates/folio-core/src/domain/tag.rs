//! Tag entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Language, TagId};

/// Maximum length of a generated tag slug.
pub const TAG_SLUG_MAX_LEN: usize = 40;

/// A tag. The Chinese title is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Unique identifier.
    pub id: TagId,
    /// Chinese title, unique.
    pub chinese_title: String,
    /// English title.
    pub english_title: String,
    /// URL slug, unique.
    pub slug: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Tag {
    /// Title in the requested language.
    #[must_use]
    pub fn title(&self, language: Language) -> &str {
        language.pick(self.chinese_title.as_str(), self.english_title.as_str())
    }
}
