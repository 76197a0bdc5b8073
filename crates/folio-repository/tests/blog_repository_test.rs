//! Integration tests for MySqlBlogRepository.
//!
//! These tests run against a real MySQL database using testcontainers.
//! Requires Docker to be available on the system.

mod common;

use chrono::Utc;
use folio_core::{
    month_window, BlogDraft, BlogStatusChange, KeysetPaginator, OffsetRequest, SectionType,
    SortDirection, TagId,
};
use folio_repository::{
    BlogRepository, KeysetWindow, MySqlBlogRepository, MySqlTagRepository, TagRepository,
};
use serde_json::json;

fn draft(section_id: folio_core::SectionId, title: &str, tag_ids: Vec<TagId>) -> BlogDraft {
    BlogDraft {
        section_id,
        chinese_title: format!("标题 {}", title),
        english_title: title.to_string(),
        chinese_description: Some("描述".to_string()),
        english_description: None,
        chinese_content: json!({"blocks": []}),
        english_content: None,
        tag_ids,
    }
}

#[tokio::test]
async fn test_insert_and_find_blog() {
    let db = common::TestDatabase::new().await;
    let author = db.seed_user("author", "admin").await;
    let section = db.seed_section("notes", SectionType::Blog, None).await;
    let tags = MySqlTagRepository::new(db.pool());
    let rust = tags.insert("锈", "Rust", "rust").await.expect("insert tag");

    let repo = MySqlBlogRepository::new(db.pool());
    let blog = repo
        .insert(author, "hello-world", &draft(section, "Hello World", vec![rust.id]))
        .await
        .expect("Failed to insert blog");

    assert_eq!(blog.slug, "hello-world");
    assert_eq!(blog.user_id, Some(author));
    assert!(!blog.status.is_published);

    let found = repo
        .find_by_slug("hello-world")
        .await
        .expect("Query failed")
        .expect("Blog not found");
    assert_eq!(found.id, blog.id);

    let blog_tags = repo.find_tags(&[blog.id]).await.expect("Query failed");
    assert_eq!(blog_tags.len(), 1);
    assert_eq!(blog_tags[0].slug, "rust");

    let stats = repo.find_stats(&[blog.id]).await.expect("Query failed");
    assert_eq!(stats.get(&blog.id).map(|s| s.views), Some(0));
}

#[tokio::test]
async fn test_published_filter_and_counts() {
    let db = common::TestDatabase::new().await;
    let author = db.seed_user("author", "admin").await;
    let section = db.seed_section("notes", SectionType::Blog, None).await;
    let repo = MySqlBlogRepository::new(db.pool());

    let first = repo.insert(author, "first", &draft(section, "First", vec![])).await.unwrap();
    repo.insert(author, "second", &draft(section, "Second", vec![])).await.unwrap();
    repo.update_status(first.id, BlogStatusChange::Published(true))
        .await
        .unwrap();

    assert_eq!(repo.count_by_section(section, false).await.unwrap(), 2);
    assert_eq!(repo.count_by_section(section, true).await.unwrap(), 1);

    let published = repo
        .find_by_section(section, true, OffsetRequest { page: 1, size: 10 })
        .await
        .unwrap();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].slug, "first");

    let all = repo
        .find_by_section(section, false, OffsetRequest { page: 1, size: 10 })
        .await
        .unwrap();
    assert_eq!(all[0].slug, "second");

    let counts = repo.monthly_counts(section, month_window(Utc::now())).await.unwrap();
    assert_eq!(counts.created, 2);
}

#[tokio::test]
async fn test_archived_keyset_walk() {
    let db = common::TestDatabase::new().await;
    let author = db.seed_user("author", "admin").await;
    let section = db.seed_section("notes", SectionType::Blog, None).await;
    let repo = MySqlBlogRepository::new(db.pool());

    for i in 0..5 {
        let blog = repo
            .insert(author, &format!("post-{}", i), &draft(section, &format!("Post {}", i), vec![]))
            .await
            .unwrap();
        repo.update_status(blog.id, BlogStatusChange::Archived(true)).await.unwrap();
    }

    let paginator = KeysetPaginator::DESC;
    let mut cursor: Option<String> = None;
    let mut seen = Vec::new();
    loop {
        let window = KeysetWindow::new(&paginator, cursor.as_deref(), 2);
        let rows = repo.find_archived(&window).await.unwrap();
        let page = paginator.finish(rows, 2, None);
        seen.extend(page.items.iter().map(|b| b.slug.clone()));
        if !page.pagination.has_next {
            break;
        }
        cursor = page.pagination.next_cursor;
    }

    assert_eq!(seen, vec!["post-4", "post-3", "post-2", "post-1", "post-0"]);
}

#[tokio::test]
async fn test_adjacent_blogs() {
    let db = common::TestDatabase::new().await;
    let author = db.seed_user("author", "admin").await;
    let section = db.seed_section("notes", SectionType::Blog, None).await;
    let repo = MySqlBlogRepository::new(db.pool());

    let mut blogs = Vec::new();
    for slug in ["older", "middle", "newer"] {
        let blog = repo.insert(author, slug, &draft(section, slug, vec![])).await.unwrap();
        repo.update_status(blog.id, BlogStatusChange::Published(true)).await.unwrap();
        blogs.push(blog);
    }

    let middle = &blogs[1];
    let position = folio_core::KeysetRow::position(middle);
    let previous = repo.find_adjacent(section, position, SortDirection::Desc).await.unwrap();
    let next = repo.find_adjacent(section, position, SortDirection::Asc).await.unwrap();

    assert_eq!(previous.map(|b| b.slug), Some("older".to_string()));
    assert_eq!(next.map(|b| b.slug), Some("newer".to_string()));
}

#[tokio::test]
async fn test_toggle_saved_blog() {
    let db = common::TestDatabase::new().await;
    let author = db.seed_user("author", "admin").await;
    let reader = db.seed_user("reader", "user").await;
    let section = db.seed_section("notes", SectionType::Blog, None).await;
    let repo = MySqlBlogRepository::new(db.pool());
    let blog = repo.insert(author, "saved", &draft(section, "Saved", vec![])).await.unwrap();

    assert!(repo.toggle_saved(reader, blog.id).await.unwrap());
    assert_eq!(repo.count_saved(reader).await.unwrap(), 1);
    let saved = repo
        .find_saved(reader, OffsetRequest { page: 1, size: 10 })
        .await
        .unwrap();
    assert_eq!(saved[0].blog.id, blog.id);
    assert_eq!(repo.find_stats(&[blog.id]).await.unwrap()[&blog.id].saves, 1);

    assert!(!repo.toggle_saved(reader, blog.id).await.unwrap());
    assert_eq!(repo.count_saved(reader).await.unwrap(), 0);
    assert_eq!(repo.find_stats(&[blog.id]).await.unwrap()[&blog.id].saves, 0);
}

#[tokio::test]
async fn test_delete_blog() {
    let db = common::TestDatabase::new().await;
    let author = db.seed_user("author", "admin").await;
    let section = db.seed_section("notes", SectionType::Blog, None).await;
    let repo = MySqlBlogRepository::new(db.pool());
    let blog = repo.insert(author, "gone", &draft(section, "Gone", vec![])).await.unwrap();

    assert!(repo.delete(blog.id).await.unwrap());
    assert!(repo.find_by_id(blog.id).await.unwrap().is_none());
    assert!(!repo.delete(blog.id).await.unwrap());
}

#[tokio::test]
async fn test_views_and_likes() {
    let db = common::TestDatabase::new().await;
    let author = db.seed_user("author", "admin").await;
    let section = db.seed_section("notes", SectionType::Blog, None).await;
    let repo = MySqlBlogRepository::new(db.pool());
    let blog = repo.insert(author, "liked", &draft(section, "Liked", vec![])).await.unwrap();

    repo.increment_views(blog.id).await.unwrap();
    repo.increment_views(blog.id).await.unwrap();
    repo.adjust_likes(blog.id, 1).await.unwrap();
    repo.adjust_likes(blog.id, -1).await.unwrap();
    repo.adjust_likes(blog.id, -1).await.unwrap();

    let stats = repo.find_stats(&[blog.id]).await.unwrap()[&blog.id];
    assert_eq!(stats.views, 2);
    assert_eq!(stats.likes, 0);
}

#[tokio::test]
async fn test_find_popular_ranks_published_blogs() {
    let db = common::TestDatabase::new().await;
    let author = db.seed_user("author", "admin").await;
    let reader = db.seed_user("reader", "user").await;
    let section = db.seed_section("notes", SectionType::Blog, None).await;
    let repo = MySqlBlogRepository::new(db.pool());

    let older = repo.insert(author, "older", &draft(section, "Older", vec![])).await.unwrap();
    let newer = repo.insert(author, "newer", &draft(section, "Newer", vec![])).await.unwrap();
    let busy = repo.insert(author, "busy", &draft(section, "Busy", vec![])).await.unwrap();
    let draft_only = repo.insert(author, "hidden", &draft(section, "Hidden", vec![])).await.unwrap();
    for blog in [&older, &newer, &busy] {
        repo.update_status(blog.id, BlogStatusChange::Published(true))
            .await
            .unwrap();
    }
    for _ in 0..5 {
        repo.increment_views(draft_only.id).await.unwrap();
    }
    repo.increment_views(busy.id).await.unwrap();
    repo.adjust_likes(busy.id, 1).await.unwrap();
    repo.toggle_saved(reader, busy.id).await.unwrap();

    let popular = repo.find_popular(9).await.unwrap();
    let slugs: Vec<&str> = popular.iter().map(|entry| entry.blog.slug.as_str()).collect();
    assert_eq!(slugs, vec!["busy", "newer", "older"]);
    assert_eq!(popular[0].stats.popularity(), 3);
    assert_eq!(popular[0].stats.saves, 1);
    assert!(popular[0].blog.status.is_published);

    assert_eq!(repo.find_popular(1).await.unwrap().len(), 1);
}
