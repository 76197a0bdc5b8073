//! Blog-related DTOs.

use chrono::{DateTime, Utc};
use folio_core::{
    Blog, BlogId, BlogStats, BlogStatus, BlogStatusChange, BlogTag, FolioResult, Language,
    PopularBlog, SectionId, TagId,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to flip exactly one status flag of a blog.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateBlogStatusRequest {
    pub is_published: Option<bool>,
    pub is_archived: Option<bool>,
    pub is_featured: Option<bool>,
}

impl UpdateBlogStatusRequest {
    /// Resolves the single requested change.
    pub fn change(&self) -> FolioResult<BlogStatusChange> {
        BlogStatusChange::from_flags(self.is_published, self.is_archived, self.is_featured)
    }
}

/// Tag as shown next to a blog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSummary {
    pub tag_id: TagId,
    pub slug: String,
    pub title: String,
}

impl TagSummary {
    #[must_use]
    pub fn from_tag(tag: &BlogTag, language: Language) -> Self {
        Self {
            tag_id: tag.tag_id,
            slug: tag.slug.clone(),
            title: tag.title(language).to_string(),
        }
    }
}

/// One row of a blog listing.
///
/// `stats` is never cached; listings fill it from the live counters on every
/// call. Admin listings also carry the raw titles and the status flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogListItem {
    pub blog_id: BlogId,
    pub section_id: SectionId,
    pub blog_slug: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<TagSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<BlogStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BlogStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chinese_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english_title: Option<String>,
}

impl BlogListItem {
    /// Public view: language-resolved text only.
    #[must_use]
    pub fn public(blog: &Blog, tags: &[BlogTag], language: Language) -> Self {
        Self {
            blog_id: blog.id,
            section_id: blog.section_id,
            blog_slug: blog.slug.clone(),
            title: blog.title(language).map(str::to_string),
            description: blog.description(language).map(str::to_string),
            tags: tags
                .iter()
                .filter(|tag| tag.blog_id == blog.id)
                .map(|tag| TagSummary::from_tag(tag, language))
                .collect(),
            created_at: blog.created_at,
            updated_at: blog.updated_at,
            stats: None,
            status: None,
            chinese_title: None,
            english_title: None,
        }
    }

    /// Admin view: adds both titles and the status flags.
    #[must_use]
    pub fn admin(blog: &Blog, tags: &[BlogTag], language: Language) -> Self {
        Self {
            status: Some(blog.status),
            chinese_title: Some(blog.chinese_title.clone()),
            english_title: blog.english_title.clone(),
            ..Self::public(blog, tags, language)
        }
    }
}

/// Full blog view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogDetail {
    pub blog_id: BlogId,
    pub section_id: SectionId,
    pub blog_slug: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<serde_json::Value>,
    pub tags: Vec<TagSummary>,
    pub status: BlogStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<BlogStats>,
}

impl BlogDetail {
    #[must_use]
    pub fn new(blog: &Blog, tags: &[BlogTag], language: Language) -> Self {
        Self {
            blog_id: blog.id,
            section_id: blog.section_id,
            blog_slug: blog.slug.clone(),
            title: blog.title(language).map(str::to_string),
            description: blog.description(language).map(str::to_string),
            content: blog.content(language).cloned(),
            tags: tags
                .iter()
                .filter(|tag| tag.blog_id == blog.id)
                .map(|tag| TagSummary::from_tag(tag, language))
                .collect(),
            status: blog.status,
            created_at: blog.created_at,
            updated_at: blog.updated_at,
            stats: None,
        }
    }
}

/// Link to a neighbouring blog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationEntry {
    pub section_slug: String,
    pub blog_slug: String,
    pub blog_title: Option<String>,
}

/// Previous (older) and next (newer) published blogs of the same section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogNavigation {
    pub previous: Option<NavigationEntry>,
    pub next: Option<NavigationEntry>,
}

/// One entry of the popular blogs ranking.
///
/// Unlike listings, the counters are cached with the ranking they produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopularBlogItem {
    pub blog_id: BlogId,
    pub section_slug: Option<String>,
    pub blog_slug: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<TagSummary>,
    pub stats: BlogStats,
}

impl PopularBlogItem {
    #[must_use]
    pub fn new(popular: &PopularBlog, tags: &[BlogTag], section_slug: Option<String>, language: Language) -> Self {
        let blog = &popular.blog;
        Self {
            blog_id: blog.id,
            section_slug,
            blog_slug: blog.slug.clone(),
            title: blog.title(language).map(str::to_string),
            description: blog.description(language).map(str::to_string),
            tags: tags
                .iter()
                .filter(|tag| tag.blog_id == blog.id)
                .map(|tag| TagSummary::from_tag(tag, language))
                .collect(),
            stats: popular.stats,
        }
    }
}

/// One row of a user's saved blogs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedBlogItem {
    pub blog_id: BlogId,
    pub blog_slug: String,
    pub section_slug: Option<String>,
    pub blog_title: Option<String>,
    pub saved_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn blog() -> Blog {
        Blog {
            id: BlogId(1),
            user_id: None,
            section_id: SectionId(2),
            slug: "hello".to_string(),
            chinese_title: "你好".to_string(),
            english_title: Some("Hello".to_string()),
            chinese_description: Some("描述".to_string()),
            english_description: None,
            chinese_content: json!({"zh": true}),
            english_content: None,
            status: BlogStatus::default(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            updated_at: None,
        }
    }

    fn tags() -> Vec<BlogTag> {
        vec![
            BlogTag {
                blog_id: BlogId(1),
                tag_id: TagId(7),
                slug: "rust".to_string(),
                chinese_title: "锈".to_string(),
                english_title: "Rust".to_string(),
            },
            BlogTag {
                blog_id: BlogId(99),
                tag_id: TagId(8),
                slug: "other".to_string(),
                chinese_title: "其他".to_string(),
                english_title: "Other".to_string(),
            },
        ]
    }

    #[test]
    fn test_public_item_resolves_language() {
        let item = BlogListItem::public(&blog(), &tags(), Language::EnUs);
        assert_eq!(item.title.as_deref(), Some("Hello"));
        assert!(item.description.is_none());
        assert_eq!(item.tags.len(), 1);
        assert_eq!(item.tags[0].title, "Rust");

        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("status").is_none());
        assert!(json.get("stats").is_none());
    }

    #[test]
    fn test_admin_item_has_raw_titles() {
        let item = BlogListItem::admin(&blog(), &tags(), Language::ZhCn);
        assert_eq!(item.title.as_deref(), Some("你好"));
        assert_eq!(item.english_title.as_deref(), Some("Hello"));
        assert_eq!(item.status, Some(BlogStatus::default()));
    }

    #[test]
    fn test_status_request_requires_one_flag() {
        let request = UpdateBlogStatusRequest {
            is_featured: Some(true),
            ..Default::default()
        };
        assert_eq!(request.change().unwrap(), BlogStatusChange::Featured(true));
        assert!(UpdateBlogStatusRequest::default().change().is_err());
    }
}
