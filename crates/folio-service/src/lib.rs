//! # Folio Service
//!
//! Business logic layer for Folio. Services coordinate the repositories,
//! the read-through cache and both pagination modes, and invalidate cached
//! listings after every committed write.

pub mod blog_service;
pub mod cache;
pub mod comment_service;
pub mod dto;
pub mod r#impl;
pub mod project_service;
pub mod section_service;
pub mod settings;
pub mod tag_service;

#[cfg(test)]
mod test_support;

pub use blog_service::*;
pub use cache::*;
pub use comment_service::*;
pub use dto::*;
pub use r#impl::*;
pub use project_service::*;
pub use section_service::*;
pub use settings::ServiceSettings;
pub use tag_service::*;
