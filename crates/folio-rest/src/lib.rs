//! # Folio REST
//!
//! HTTP surface shared by Folio handlers: pagination query extractors, the
//! reader identity extractor, pagination response headers, the JSON
//! envelope and the mapping from [`folio_core::FolioError`] to status codes.

pub mod extractors;
pub mod middleware;
pub mod responses;

pub use extractors::*;
pub use responses::*;
