//! Cache key generators for consistent key naming.
//!
//! Every list key embeds all inputs that shape the result, so two requests
//! share an entry only when they would produce the same payload. Each
//! invalidation pattern sits next to the keys it has to match.

use folio_core::{BlogId, Language, OffsetRequest, SectionId, UserId};
use uuid::Uuid;

/// Prefix for all cache keys to namespace them.
const CACHE_PREFIX: &str = "folio";

// ============ Blog lists ============

/// Offset listing of a section's blogs.
#[must_use]
pub fn blog_list(section_id: SectionId, language: Language, page: OffsetRequest, published_only: bool) -> String {
    format!(
        "{}:blog_lists:{}:lang={}:page={}:size={}:published_only={}",
        CACHE_PREFIX, section_id, language, page.page, page.size, published_only
    )
}

/// Every blog listing of one section.
#[must_use]
pub fn blog_list_section_pattern(section_id: SectionId) -> String {
    format!("{}:blog_lists:{}:*", CACHE_PREFIX, section_id)
}

/// Every section blog listing.
#[must_use]
pub fn blog_list_pattern() -> String {
    format!("{}:blog_lists:*", CACHE_PREFIX)
}

/// Offset listing of the published blogs carrying a tag.
#[must_use]
pub fn blog_list_by_tag(tag_slug: &str, language: Language, page: OffsetRequest) -> String {
    format!(
        "{}:blog_lists_by_tag_slug:{}:lang={}:page={}:size={}",
        CACHE_PREFIX, tag_slug, language, page.page, page.size
    )
}

/// Every tag-filtered blog listing.
#[must_use]
pub fn blog_list_by_tag_pattern() -> String {
    format!("{}:blog_lists_by_tag_slug:*", CACHE_PREFIX)
}

/// Keyset listing of archived blogs. The first page uses an empty cursor.
#[must_use]
pub fn archived_blog_list(language: Language, limit: u32, cursor: Option<&str>) -> String {
    format!(
        "{}:blog_archived_lists:lang={}:limit={}:cursor={}",
        CACHE_PREFIX,
        language,
        limit,
        cursor.unwrap_or_default()
    )
}

/// Every archived blog listing.
#[must_use]
pub fn archived_blog_list_pattern() -> String {
    format!("{}:blog_archived_lists:*", CACHE_PREFIX)
}

/// Offset listing of a user's saved blogs.
#[must_use]
pub fn saved_blog_list(user_id: UserId, language: Language, page: OffsetRequest) -> String {
    format!(
        "{}:user_saved_blogs:{}:lang={}:page={}:size={}",
        CACHE_PREFIX, user_id, language, page.page, page.size
    )
}

/// Every saved blog listing of one user.
#[must_use]
pub fn saved_blog_list_user_pattern(user_id: UserId) -> String {
    format!("{}:user_saved_blogs:{}:*", CACHE_PREFIX, user_id)
}

/// Every saved blog listing.
#[must_use]
pub fn saved_blog_list_pattern() -> String {
    format!("{}:user_saved_blogs:*", CACHE_PREFIX)
}

// ============ Blog details ============

/// Detail view of one blog.
#[must_use]
pub fn blog_details(slug: &str, language: Language) -> String {
    format!("{}:blog_details:{}:lang={}", CACHE_PREFIX, slug, language)
}

/// Detail views of one blog in every language.
#[must_use]
pub fn blog_details_slug_pattern(slug: &str) -> String {
    format!("{}:blog_details:{}:*", CACHE_PREFIX, slug)
}

/// Every blog detail view.
#[must_use]
pub fn blog_details_pattern() -> String {
    format!("{}:blog_details:*", CACHE_PREFIX)
}

/// Previous/next links of one blog.
#[must_use]
pub fn blog_navigation(blog_id: BlogId, language: Language) -> String {
    format!("{}:blog_navigation:{}:lang={}", CACHE_PREFIX, blog_id, language)
}

/// Navigation entries of one blog in every language.
#[must_use]
pub fn blog_navigation_blog_pattern(blog_id: BlogId) -> String {
    format!("{}:blog_navigation:{}:*", CACHE_PREFIX, blog_id)
}

/// Every navigation entry.
#[must_use]
pub fn blog_navigation_pattern() -> String {
    format!("{}:blog_navigation:*", CACHE_PREFIX)
}

/// Most popular published blogs in one language.
#[must_use]
pub fn popular_blogs(language: Language) -> String {
    format!("{}:blog_popular:lang={}", CACHE_PREFIX, language)
}

/// Popular blog rankings in every language.
#[must_use]
pub fn popular_blogs_pattern() -> String {
    format!("{}:blog_popular:*", CACHE_PREFIX)
}

// ============ Reader markers ============

/// Fingerprint of the last reader counted as a view of a blog.
#[must_use]
pub fn blog_view_marker(blog_id: BlogId) -> String {
    format!("{}:blog_view_marker:{}", CACHE_PREFIX, blog_id)
}

/// Set while the client address `address` has a like on a blog.
#[must_use]
pub fn blog_like_marker(blog_id: BlogId, address: Uuid) -> String {
    format!("{}:blog_like_marker:{}:{}", CACHE_PREFIX, blog_id, address)
}

/// Reader markers of one blog.
#[must_use]
pub fn blog_marker_patterns(blog_id: BlogId) -> [String; 2] {
    [
        blog_view_marker(blog_id),
        format!("{}:blog_like_marker:{}:*", CACHE_PREFIX, blog_id),
    ]
}

// ============ Comments ============

/// Keyset page of a blog's comment tree.
#[must_use]
pub fn comment_list(blog_id: BlogId, limit: u32, cursor: Option<&str>) -> String {
    format!(
        "{}:blog_comment_lists:{}:{}:{}",
        CACHE_PREFIX,
        blog_id,
        limit,
        cursor.unwrap_or_default()
    )
}

/// Every comment page of one blog.
#[must_use]
pub fn comment_list_pattern(blog_id: BlogId) -> String {
    format!("{}:blog_comment_lists:{}:*", CACHE_PREFIX, blog_id)
}

// ============ Tags ============

/// Offset listing of tags.
#[must_use]
pub fn tag_list(language: Language, page: OffsetRequest) -> String {
    format!(
        "{}:tag_lists:lang={}:page={}:size={}",
        CACHE_PREFIX, language, page.page, page.size
    )
}

/// Every tag listing.
#[must_use]
pub fn tag_list_pattern() -> String {
    format!("{}:tag_lists:*", CACHE_PREFIX)
}

// ============ Sections ============

/// Section tree in one language.
#[must_use]
pub fn section_tree(language: Language) -> String {
    format!("{}:section_lists_tree:{}", CACHE_PREFIX, language)
}

/// Section trees in every language.
#[must_use]
pub fn section_tree_pattern() -> String {
    format!("{}:section_lists_tree:*", CACHE_PREFIX)
}

/// Detail view of one section.
#[must_use]
pub fn section_details(slug: &str, language: Language) -> String {
    format!("{}:section_details:{}:lang={}", CACHE_PREFIX, slug, language)
}

/// Detail views of one section in every language.
#[must_use]
pub fn section_details_slug_pattern(slug: &str) -> String {
    format!("{}:section_details:{}:*", CACHE_PREFIX, slug)
}

// ============ Projects ============

/// Offset listing of projects.
#[must_use]
pub fn project_list(language: Language, page: OffsetRequest, published_only: bool) -> String {
    format!(
        "{}:project_lists:lang={}:page={}:size={}:published_only={}",
        CACHE_PREFIX, language, page.page, page.size, published_only
    )
}

/// Every project listing.
#[must_use]
pub fn project_list_pattern() -> String {
    format!("{}:project_lists:*", CACHE_PREFIX)
}

/// Detail view of one project.
#[must_use]
pub fn project_details(slug: &str, language: Language) -> String {
    format!("{}:project_details:lang={}:slug={}", CACHE_PREFIX, language, slug)
}

/// Every project detail view.
#[must_use]
pub fn project_details_pattern() -> String {
    format!("{}:project_details:*", CACHE_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glob_match(pattern: &str, key: &str) -> bool {
        glob::Pattern::new(pattern).unwrap().matches(key)
    }

    fn page(page: u32, size: u32) -> OffsetRequest {
        OffsetRequest { page, size }
    }

    #[test]
    fn test_blog_list_key_embeds_every_input() {
        let key = blog_list(SectionId(3), Language::EnUs, page(2, 10), true);
        assert_eq!(
            key,
            "folio:blog_lists:3:lang=en-US:page=2:size=10:published_only=true"
        );
        assert_ne!(key, blog_list(SectionId(3), Language::EnUs, page(2, 10), false));
        assert_ne!(key, blog_list(SectionId(3), Language::ZhCn, page(2, 10), true));
        assert_ne!(key, blog_list(SectionId(3), Language::EnUs, page(2, 20), true));
    }

    #[test]
    fn test_section_pattern_is_exact_on_section_id() {
        let pattern = blog_list_section_pattern(SectionId(1));
        assert!(glob_match(&pattern, &blog_list(SectionId(1), Language::ZhCn, page(1, 20), false)));
        assert!(!glob_match(&pattern, &blog_list(SectionId(12), Language::ZhCn, page(1, 20), false)));
    }

    #[test]
    fn test_blog_list_pattern_skips_tag_lists() {
        let pattern = blog_list_pattern();
        assert!(glob_match(&pattern, &blog_list(SectionId(1), Language::ZhCn, page(1, 20), true)));
        assert!(!glob_match(&pattern, &blog_list_by_tag("rust", Language::ZhCn, page(1, 20))));
        assert!(glob_match(
            &blog_list_by_tag_pattern(),
            &blog_list_by_tag("rust", Language::ZhCn, page(1, 20))
        ));
    }

    #[test]
    fn test_cursor_keys() {
        assert_eq!(
            archived_blog_list(Language::ZhCn, 10, None),
            "folio:blog_archived_lists:lang=zh-CN:limit=10:cursor="
        );
        assert_eq!(
            comment_list(BlogId(5), 20, Some("abc=")),
            "folio:blog_comment_lists:5:20:abc="
        );
        assert!(glob_match(&comment_list_pattern(BlogId(5)), &comment_list(BlogId(5), 20, None)));
        assert!(!glob_match(&comment_list_pattern(BlogId(5)), &comment_list(BlogId(50), 20, None)));
    }

    #[test]
    fn test_detail_patterns() {
        assert!(glob_match(
            &blog_details_slug_pattern("hello"),
            &blog_details("hello", Language::EnUs)
        ));
        assert!(!glob_match(
            &blog_details_slug_pattern("hello"),
            &blog_details("hello-again", Language::EnUs)
        ));
        assert!(glob_match(
            &blog_navigation_blog_pattern(BlogId(9)),
            &blog_navigation(BlogId(9), Language::ZhCn)
        ));
        assert!(glob_match(
            &section_details_slug_pattern("notes"),
            &section_details("notes", Language::ZhCn)
        ));
        assert!(glob_match(&section_tree_pattern(), &section_tree(Language::EnUs)));
        assert!(glob_match(
            &project_details_pattern(),
            &project_details("folio", Language::EnUs)
        ));
    }

    #[test]
    fn test_marker_keys_are_per_blog() {
        let address = Uuid::new_v5(&Uuid::NAMESPACE_OID, b"203.0.113.7");
        let [view, likes] = blog_marker_patterns(BlogId(3));
        assert_eq!(view, blog_view_marker(BlogId(3)));
        assert!(glob_match(&likes, &blog_like_marker(BlogId(3), address)));
        assert!(!glob_match(&likes, &blog_like_marker(BlogId(30), address)));
        assert!(!glob_match(&blog_list_pattern(), &blog_view_marker(BlogId(3))));
        assert!(glob_match(&popular_blogs_pattern(), &popular_blogs(Language::EnUs)));
    }

    #[test]
    fn test_user_scoped_keys() {
        let key = saved_blog_list(UserId(4), Language::ZhCn, page(1, 20));
        assert!(glob_match(&saved_blog_list_user_pattern(UserId(4)), &key));
        assert!(!glob_match(&saved_blog_list_user_pattern(UserId(40)), &key));
        assert!(glob_match(&saved_blog_list_pattern(), &key));
    }

    #[test]
    fn test_listing_keys_are_namespaced() {
        for key in [
            tag_list(Language::EnUs, page(1, 20)),
            project_list(Language::EnUs, page(1, 20), true),
            section_tree(Language::ZhCn),
        ] {
            assert!(key.starts_with("folio:"));
        }
        assert!(glob_match(&tag_list_pattern(), &tag_list(Language::EnUs, page(3, 5))));
        assert!(glob_match(
            &project_list_pattern(),
            &project_list(Language::ZhCn, page(1, 20), false)
        ));
    }
}
