//! # Folio Repository
//!
//! Data access for the blog backend, one repository per aggregate:
//!
//! ```text
//! Service
//!   ↓  Arc<dyn BlogRepository>     (domain interface, traits.rs)
//! MySqlBlogRepository              (SQLx implementation, mysql/)
//!   ↓  Arc<dyn DatabasePoolInterface>
//! MySQL
//! ```
//!
//! List queries are assembled with the helpers in [`query`]: offset pages
//! use `LIMIT ? OFFSET ?`, keyset pages use a strict `(created_at, id)`
//! predicate and fetch one extra row so the paginator can tell whether
//! another page exists.

pub mod di;
pub mod mysql;
pub mod pool;
pub mod query;
pub mod traits;

pub use di::{build_repository_module, repository_module, Repositories, RepositoryModule};
pub use mysql::*;
pub use pool::*;
pub use query::KeysetWindow;
pub use traits::*;
