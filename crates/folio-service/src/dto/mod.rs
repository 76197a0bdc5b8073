//! Data Transfer Objects (DTOs).
//!
//! Responses derive `Deserialize` as well as `Serialize` because they are
//! what the cache stores.

mod blog_dto;
mod comment_dto;
mod project_dto;
mod section_dto;
mod tag_dto;

pub use blog_dto::*;
pub use comment_dto::*;
pub use project_dto::*;
pub use section_dto::*;
pub use tag_dto::*;
