//! Tag service trait definition.

use crate::dto::{CreateTagRequest, TagResponse, UpdateTagRequest};
use async_trait::async_trait;
use folio_core::{Actor, FolioResult, Interface, Language, OffsetPage, OffsetRequest, TagId};

/// Tag service trait.
#[async_trait]
pub trait TagService: Interface + Send + Sync {
    /// Lists tags with this month's counters.
    async fn list_tags(&self, page: OffsetRequest, language: Language) -> FolioResult<OffsetPage<TagResponse>>;

    /// Creates a tag.
    async fn create_tag(&self, actor: Actor, request: CreateTagRequest) -> FolioResult<TagResponse>;

    /// Renames a tag.
    async fn update_tag(&self, actor: Actor, id: TagId, request: UpdateTagRequest) -> FolioResult<TagResponse>;

    /// Deletes a tag.
    async fn delete_tag(&self, actor: Actor, id: TagId) -> FolioResult<()>;
}
