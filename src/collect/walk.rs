//! Directory enumeration for the two metric-family trees.
//!
//! Listings are sorted by name so that traversal order is deterministic;
//! zero-padded period names (e.g. `2023-01`) make that chronological.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Dir,
    File,
}

/// Names of the visible entries of `kind` directly under `dir`, sorted.
///
/// Names stay `OsString` so entries that are not valid UTF-8 still pair up.
pub fn sorted_entry_names(dir: &Path, kind: EntryKind) -> Result<Vec<OsString>, AppError> {
    let entries = fs::read_dir(dir).map_err(|e| AppError::io(dir, format!("Failed to list directory: {e}")))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| AppError::io(dir, format!("Failed to read directory entry: {e}")))?;
        let name = entry.file_name();
        if name.as_encoded_bytes().starts_with(b".") {
            continue;
        }
        // Follow symlinks so linked period folders behave like real ones.
        let path = entry.path();
        let matches = match kind {
            EntryKind::Dir => path.is_dir(),
            EntryKind::File => path.is_file(),
        };
        if matches {
            names.push(name);
        }
    }

    names.sort();
    Ok(names)
}

/// The `PR` and `GHI` roots under a data directory.
#[derive(Debug, Clone)]
pub struct FamilyRoots {
    pub pr: PathBuf,
    pub ghi: PathBuf,
}

impl FamilyRoots {
    /// Resolve both family roots, failing if either is missing.
    pub fn resolve(root: &Path, pr_dir: &str, ghi_dir: &str) -> Result<Self, AppError> {
        if !root.is_dir() {
            return Err(AppError::structural(root, "Data root is not a directory."));
        }
        let pr = root.join(pr_dir);
        if !pr.is_dir() {
            return Err(AppError::structural(&pr, format!("Missing `{pr_dir}` family directory.")));
        }
        let ghi = root.join(ghi_dir);
        if !ghi.is_dir() {
            return Err(AppError::structural(&ghi, format!("Missing `{ghi_dir}` family directory.")));
        }
        Ok(Self { pr, ghi })
    }
}
