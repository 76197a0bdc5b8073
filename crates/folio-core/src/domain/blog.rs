//! Blog post entity and its satellite rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    BlogId, CursorPosition, FolioError, FolioResult, KeysetRow, Language, SectionId, TagId,
    UserId,
};

/// Maximum length of a generated blog slug.
pub const BLOG_SLUG_MAX_LEN: usize = 255;

/// A blog post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blog {
    /// Unique identifier.
    pub id: BlogId,
    /// Author.
    pub user_id: Option<UserId>,
    /// Section the post is listed under.
    pub section_id: SectionId,
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
    /// Rich-text body (editor JSON), Chinese.
    pub chinese_content: serde_json::Value,
    /// Rich-text body (editor JSON), English.
    pub english_content: Option<serde_json::Value>,
    /// Publication flags.
    pub status: BlogStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Blog {
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

    /// Body in the requested language.
    #[must_use]
    pub fn content(&self, language: Language) -> Option<&serde_json::Value> {
        match language {
            Language::ZhCn => Some(&self.chinese_content),
            Language::EnUs => self.english_content.as_ref(),
        }
    }
}

impl KeysetRow for Blog {
    fn position(&self) -> CursorPosition {
        CursorPosition::new(self.created_at, self.id.0)
    }
}

/// Publication flags of a blog post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogStatus {
    /// Visible on public listings.
    pub is_published: bool,
    /// Listed in the archive.
    pub is_archived: bool,
    /// Highlighted on the home page.
    pub is_featured: bool,
}

/// A single status flag change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlogStatusChange {
    /// Sets `is_published`.
    Published(bool),
    /// Sets `is_archived`.
    Archived(bool),
    /// Sets `is_featured`.
    Featured(bool),
}

impl BlogStatusChange {
    /// Builds a change from optional flags. Exactly one flag must be set.
    ///
    /// # Errors
    ///
    /// Returns a validation error when zero or several flags are given.
    pub fn from_flags(
        is_published: Option<bool>,
        is_archived: Option<bool>,
        is_featured: Option<bool>,
    ) -> FolioResult<Self> {
        match (is_published, is_archived, is_featured) {
            (Some(v), None, None) => Ok(Self::Published(v)),
            (None, Some(v), None) => Ok(Self::Archived(v)),
            (None, None, Some(v)) => Ok(Self::Featured(v)),
            _ => Err(FolioError::validation(
                "Exactly one status flag must be updated",
            )),
        }
    }

    /// Column updated by this change.
    #[must_use]
    pub const fn column(&self) -> &'static str {
        match self {
            Self::Published(_) => "is_published",
            Self::Archived(_) => "is_archived",
            Self::Featured(_) => "is_featured",
        }
    }

    /// New value of the flag.
    #[must_use]
    pub const fn value(&self) -> bool {
        match self {
            Self::Published(v) | Self::Archived(v) | Self::Featured(v) => *v,
        }
    }

    /// Applies the change to a status.
    pub fn apply(&self, status: &mut BlogStatus) {
        match *self {
            Self::Published(v) => status.is_published = v,
            Self::Archived(v) => status.is_archived = v,
            Self::Featured(v) => status.is_featured = v,
        }
    }
}

/// Live engagement counters of a blog post.
///
/// These change on every view and are never cached with listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogStats {
    /// Page views.
    pub views: i64,
    /// Likes.
    pub likes: i64,
    /// Visible comments.
    pub comments: i64,
    /// Bookmarks.
    pub saves: i64,
}

impl BlogStats {
    /// Sum of every counter; ranks the popular blogs.
    #[must_use]
    pub const fn popularity(&self) -> i64 {
        self.views + self.likes + self.comments + self.saves
    }
}

/// A published blog with the counters it was ranked by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularBlog {
    pub blog: Blog,
    pub stats: BlogStats,
}

/// A tag attached to a blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogTag {
    /// Tagged post.
    pub blog_id: BlogId,
    /// Tag.
    pub tag_id: TagId,
    /// Tag slug.
    pub slug: String,
    /// Chinese tag title.
    pub chinese_title: String,
    /// English tag title.
    pub english_title: String,
}

impl BlogTag {
    /// Title in the requested language.
    #[must_use]
    pub fn title(&self, language: Language) -> &str {
        language.pick(self.chinese_title.as_str(), self.english_title.as_str())
    }
}

/// A bookmark of a blog post by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedBlog {
    /// Bookmarking user.
    pub user_id: UserId,
    /// Bookmarked post.
    pub blog: Blog,
    /// When the bookmark was created.
    pub saved_at: DateTime<Utc>,
}

/// Fields of a new or edited blog post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct BlogDraft {
    /// Section the post is listed under.
    pub section_id: SectionId,
    /// Chinese title.
    #[validate(length(min = 1, max = 200))]
    pub chinese_title: String,
    /// English title, also the slug source.
    #[validate(length(min = 1, max = 200))]
    pub english_title: String,
    /// Chinese description.
    #[validate(length(max = 500))]
    pub chinese_description: Option<String>,
    /// English description.
    #[validate(length(max = 500))]
    pub english_description: Option<String>,
    /// Rich-text body, Chinese.
    pub chinese_content: serde_json::Value,
    /// Rich-text body, English.
    pub english_content: Option<serde_json::Value>,
    /// Tags to attach.
    #[serde(default)]
    pub tag_ids: Vec<TagId>,
}
