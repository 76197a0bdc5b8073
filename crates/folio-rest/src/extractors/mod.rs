//! Custom Axum extractors.

mod pagination;
mod validated;
mod visitor;

pub use pagination::*;
pub use validated::*;
pub use visitor::*;
