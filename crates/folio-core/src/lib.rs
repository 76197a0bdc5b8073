//! # Folio Core
//!
//! Core types, traits, and error definitions for the Folio blog backend.
//! The offset and keyset paginators live here so that every layer shares one
//! definition of page metadata and cursor encoding.

pub mod domain;
pub mod error;
pub mod id;
pub mod language;
pub mod pagination;
pub mod result;
pub mod telemetry;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use language::*;
pub use pagination::*;
pub use result::*;
pub use validation::*;

// Re-export shaku for dependency injection
pub use shaku::Interface;
