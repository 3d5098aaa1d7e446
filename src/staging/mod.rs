//! Safe-staging pipeline stages
//!
//! Everything here mutates only the disposable staged copy; the original
//! project tree is read-only from this module's perspective.

pub mod pruner;
pub mod stager;
pub mod substitutor;
pub mod walker;

pub use pruner::{DEFAULT_PRUNE_PATHS, IGNORE_FILE, PublishPruner};
pub use stager::{StagedWorkspace, WorkspaceStager};
pub use substitutor::{
    PACKAGE_NAME_TOKEN, PlaceholderSubstitutor, ReplacementMap, USERNAME_TOKEN,
};
pub use walker::{EXCLUDED_DIRS, TreeEntryKind, walk_tree};
