//! Repository layer: entity-scoped database operations.
//!
//! Residents are JSON documents keyed by id; documents are plain rows
//! referenced from the resident body. All public functions are re-exported.

mod document;
mod resident;

pub use document::*;
pub use resident::*;
