//! Input/output helpers.
//!
//! - metric file ingest + column selection (`ingest`)
//! - merged/enriched CSV read/write (`export`)
//! - summary JSON (`summary`)

pub mod export;
pub mod ingest;
pub mod summary;

pub use export::*;
pub use ingest::*;
pub use summary::*;
