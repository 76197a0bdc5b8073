//! Section service implementation.

use crate::cache::{cache_keys, CacheExt, CacheInterface};
use crate::dto::{SectionDetail, SectionNode, UpdateSectionRequest};
use crate::section_service::SectionService;
use crate::settings::ServiceSettings;
use async_trait::async_trait;
use folio_core::{
    slugify, Actor, FolioError, FolioResult, Language, Section, SectionId, ValidateExt,
    BLOG_SLUG_MAX_LEN,
};
use folio_repository::SectionRepository;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Section service backed by the section repository.
pub struct SectionServiceImpl {
    sections: Arc<dyn SectionRepository>,
    cache: Arc<dyn CacheInterface>,
    settings: ServiceSettings,
}

impl SectionServiceImpl {
    /// Creates a new section service.
    pub fn new(
        sections: Arc<dyn SectionRepository>,
        cache: Arc<dyn CacheInterface>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            sections,
            cache,
            settings,
        }
    }
}

/// Arranges sections under their parents.
///
/// Rows whose parent is not among `sections` (inactive or missing) are
/// promoted to roots. Sibling order follows the input order.
fn build_tree(sections: &[Section], language: Language) -> Vec<SectionNode> {
    let mut children: HashMap<SectionId, Vec<&Section>> = HashMap::new();
    let mut roots = Vec::new();
    for section in sections {
        match section.parent_id {
            Some(parent) if sections.iter().any(|s| s.id == parent) => {
                children.entry(parent).or_default().push(section);
            }
            _ => roots.push(section),
        }
    }

    roots
        .into_iter()
        .map(|root| tree_node(root, &children, language))
        .collect()
}

fn tree_node(section: &Section, children: &HashMap<SectionId, Vec<&Section>>, language: Language) -> SectionNode {
    let mut node = SectionNode::new(section, language);
    if let Some(kids) = children.get(&section.id) {
        node.children = kids
            .iter()
            .map(|kid| tree_node(kid, children, language))
            .collect();
    }
    node
}

impl std::fmt::Debug for SectionServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectionServiceImpl")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SectionService for SectionServiceImpl {
    async fn list_sections(&self, language: Language) -> FolioResult<Vec<SectionNode>> {
        debug!(%language, "Listing sections");

        let key = cache_keys::section_tree(language);
        self.cache
            .get_or_set(&key, self.settings.ttl, || async move {
                let sections = self.sections.find_active().await?;
                if sections.is_empty() {
                    return Err(FolioError::NoDataFound);
                }
                Ok(build_tree(&sections, language))
            })
            .await
    }

    async fn get_section(&self, slug: &str, language: Language) -> FolioResult<SectionDetail> {
        debug!(slug, "Getting section");

        let key = cache_keys::section_details(slug, language);
        self.cache
            .get_or_set(&key, self.settings.ttl, || async move {
                let section = self
                    .sections
                    .find_by_slug(slug)
                    .await?
                    .ok_or_else(|| FolioError::not_found("Section", slug))?;
                Ok(SectionDetail::new(&section, language))
            })
            .await
    }

    async fn update_section(
        &self,
        actor: Actor,
        id: SectionId,
        request: UpdateSectionRequest,
    ) -> FolioResult<SectionDetail> {
        actor.require_admin()?;
        request.validate_request()?;

        let mut section = self
            .sections
            .find_by_id(id)
            .await?
            .ok_or_else(|| FolioError::not_found("Section", id))?;

        let slug = slugify(&request.english_title, BLOG_SLUG_MAX_LEN);
        if slug.is_empty() {
            return Err(FolioError::validation(
                "english_title: must contain at least one ASCII letter or digit",
            ));
        }
        let old_slug = std::mem::replace(&mut section.slug, slug);
        section.chinese_title = request.chinese_title;
        section.english_title = Some(request.english_title);
        section.chinese_description = request.chinese_description;
        section.english_description = request.english_description;
        if let Some(is_active) = request.is_active {
            section.is_active = is_active;
        }

        let section = self.sections.update(&section).await?;
        info!(section_id = %id, slug = %section.slug, "Section updated");

        let mut patterns = vec![
            cache_keys::section_tree_pattern(),
            cache_keys::section_details_slug_pattern(&old_slug),
        ];
        if section.slug != old_slug {
            patterns.push(cache_keys::section_details_slug_pattern(&section.slug));
            patterns.push(cache_keys::saved_blog_list_pattern());
            patterns.push(cache_keys::blog_navigation_pattern());
            patterns.push(cache_keys::popular_blogs_pattern());
        }
        self.cache.invalidate(&patterns).await;

        Ok(SectionDetail::new(&section, Language::default()))
    }
}
