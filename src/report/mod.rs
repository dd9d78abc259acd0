//! Reporting utilities: summary text, bucket counts, fiscal-year rollups.

pub mod format;

pub use format::*;
