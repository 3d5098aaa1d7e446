//! Visitor-parameterized tree walk
//!
//! All staged-tree mutation (copy, substitute) goes through this one walk
//! so the exclusion rules live in a single place and each concern stays
//! independently testable against a directory fixture.

use crate::core::error::ReserveError;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Directory names excluded from staging at any depth
pub const EXCLUDED_DIRS: &[&str] = &[".git", "node_modules"];

/// Kind of entry handed to a visitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeEntryKind {
    Dir,
    File,
}

fn is_excluded(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| EXCLUDED_DIRS.contains(&name))
}

/// Walk the tree under `root`, calling `visitor` for every regular file and
/// directory with its path relative to `root`.
///
/// Excluded directories are not descended into. Symlinks and special files
/// are skipped silently; links are never followed. Parent directories are
/// visited before their contents.
pub fn walk_tree<F>(root: &Path, mut visitor: F) -> Result<(), ReserveError>
where
    F: FnMut(&Path, TreeEntryKind) -> Result<(), ReserveError>,
{
    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !is_excluded(entry));

    for entry in walker {
        let entry = entry.map_err(|e| ReserveError::StagingFailed {
            message: e.to_string(),
        })?;

        let file_type = entry.file_type();
        let kind = if file_type.is_dir() {
            TreeEntryKind::Dir
        } else if file_type.is_file() {
            TreeEntryKind::File
        } else {
            continue;
        };

        let rel_path = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| ReserveError::StagingFailed {
                message: e.to_string(),
            })?;

        visitor(rel_path, kind)?;
    }

    Ok(())
}
