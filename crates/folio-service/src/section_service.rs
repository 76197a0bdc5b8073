//! Section service trait definition.

use crate::dto::{SectionDetail, SectionNode, UpdateSectionRequest};
use async_trait::async_trait;
use folio_core::{Actor, FolioResult, Interface, Language, SectionId};

/// Section service trait.
#[async_trait]
pub trait SectionService: Interface + Send + Sync {
    /// Returns the active sections as a tree of roots.
    async fn list_sections(&self, language: Language) -> FolioResult<Vec<SectionNode>>;

    /// Gets a section by slug.
    async fn get_section(&self, slug: &str, language: Language) -> FolioResult<SectionDetail>;

    /// Edits a section.
    async fn update_section(
        &self,
        actor: Actor,
        id: SectionId,
        request: UpdateSectionRequest,
    ) -> FolioResult<SectionDetail>;
}
