//! MySQL repository implementations.

mod blog_repository;
mod comment_repository;
mod project_repository;
mod section_repository;
mod tag_repository;

pub use blog_repository::*;
pub use comment_repository::*;
pub use project_repository::*;
pub use section_repository::*;
pub use tag_repository::*;
