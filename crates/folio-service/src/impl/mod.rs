//! Service implementations.
//!
//! Concrete implementations of the service traits. Trait definitions live in
//! the parent module (e.g. `blog_service.rs`).

pub mod blog_service_impl;
pub mod comment_service_impl;
pub mod project_service_impl;
pub mod section_service_impl;
pub mod tag_service_impl;

pub use blog_service_impl::BlogServiceImpl;
pub use comment_service_impl::CommentServiceImpl;
pub use project_service_impl::ProjectServiceImpl;
pub use section_service_impl::SectionServiceImpl;
pub use tag_service_impl::TagServiceImpl;
