//! `pr-budget` library crate.
//!
//! The binary (`prb`) is a thin wrapper around this library so that:
//!
//! - the merge and derivation steps are testable without spawning processes
//! - the rendering layer can be swapped without touching the math
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod collect;
pub mod derive;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod report;
