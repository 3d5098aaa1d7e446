//! Workspace staging
//!
//! Duplicates the template project into a uniquely named temporary root.
//! The original tree is only ever read; every later pipeline stage mutates
//! the staged copy exclusively.

use crate::core::error::ReserveError;
use crate::staging::walker::{TreeEntryKind, walk_tree};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temp-root prefix, recognizable in /tmp listings
const STAGING_PREFIX: &str = "package-reserver-";

/// Exclusively owned disposable copy of the project
///
/// Removal also happens on drop as a best-effort backstop, but the
/// orchestrator calls `cleanup()` explicitly so removal failures can be
/// reported as warnings.
pub struct StagedWorkspace {
    temp: TempDir,
}

impl StagedWorkspace {
    /// Root of the staged tree
    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    /// Remove the staged tree
    pub fn cleanup(self) -> std::io::Result<()> {
        self.temp.close()
    }
}

/// Recursively copies a source tree into a fresh temporary root
pub struct WorkspaceStager {
    source_root: PathBuf,
}

impl WorkspaceStager {
    pub fn new<P: AsRef<Path>>(source_root: P) -> Self {
        Self {
            source_root: source_root.as_ref().to_path_buf(),
        }
    }

    /// Produce a staged copy of the source tree
    ///
    /// Version-control and dependency-cache directories are skipped at any
    /// depth; only regular files and directories are copied. Any I/O error
    /// is fatal for the run; partial staged state stays confined to the
    /// temp tree, which the caller removes.
    pub async fn stage(&self) -> Result<StagedWorkspace, ReserveError> {
        let temp = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir()
            .map_err(|e| ReserveError::StagingFailed {
                message: format!("一時ディレクトリを作成できません: {}", e),
            })?;

        let dest_root = temp.path().to_path_buf();
        let source_root = self.source_root.clone();

        walk_tree(&source_root, |rel_path, kind| {
            let dest = dest_root.join(rel_path);
            let result = match kind {
                TreeEntryKind::Dir => fs::create_dir_all(&dest),
                TreeEntryKind::File => fs::copy(source_root.join(rel_path), &dest).map(|_| ()),
            };
            result.map_err(|e| ReserveError::StagingFailed {
                message: format!("{}: {}", rel_path.display(), e),
            })
        })?;

        Ok(StagedWorkspace { temp })
    }
}
