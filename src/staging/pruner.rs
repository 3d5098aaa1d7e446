//! Pre-publish pruning of the staged workspace
//!
//! Removes a configured list of literal paths before publish. Entries come
//! from the project's `.npmignore` when present, otherwise from a built-in
//! default set. Glob patterns are deliberately not implemented: entries
//! containing metacharacters are skipped silently, never expanded, so
//! publish contents stay predictable.

use crate::core::error::ReserveError;
use std::io::ErrorKind;
use std::path::{Component, Path};
use tokio::fs;

/// Ignore-list file read from the original project root
pub const IGNORE_FILE: &str = ".npmignore";

/// Built-in prune set used when no ignore-list file exists
///
/// `.git` and `node_modules` never reach the staged copy in the first
/// place; this set covers the rest of the usual non-publishable paths.
pub const DEFAULT_PRUNE_PATHS: &[&str] = &[
    ".env",
    ".env.local",
    ".github",
    ".vscode",
    "coverage",
    "docs",
    "test",
    "tests",
];

const GLOB_METACHARS: &[char] = &['*', '?', '[', ']'];

/// Removes configured literal paths from the staged workspace
pub struct PublishPruner {
    prune_list: Vec<String>,
}

impl PublishPruner {
    /// Build the prune list from the original project root, read once per
    /// run. A present `.npmignore` takes precedence over the default set.
    pub async fn from_project_root(original_root: &Path) -> Result<Self, ReserveError> {
        let ignore_path = original_root.join(IGNORE_FILE);
        match fs::read_to_string(&ignore_path).await {
            Ok(content) => Ok(Self::with_list(Self::parse_ignore_list(&content))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::with_list(
                DEFAULT_PRUNE_PATHS.iter().map(|p| p.to_string()).collect(),
            )),
            Err(e) => Err(ReserveError::PruneFailed {
                message: format!("{}: {}", IGNORE_FILE, e),
            }),
        }
    }

    pub fn with_list(prune_list: Vec<String>) -> Self {
        Self { prune_list }
    }

    /// Parse ignore-list content: one entry per line; blank lines,
    /// `#`-comments and `!`-negations are discarded, trailing slashes are
    /// stripped and duplicates collapse, first occurrence winning.
    pub fn parse_ignore_list(content: &str) -> Vec<String> {
        let mut entries: Vec<String> = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            let entry = line.trim_end_matches('/');
            if entry.is_empty() {
                continue;
            }
            if !entries.iter().any(|e| e == entry) {
                entries.push(entry.to_string());
            }
        }
        entries
    }

    pub fn prune_list(&self) -> &[String] {
        &self.prune_list
    }

    /// Remove every existing literal entry under the staged root,
    /// recursively for directories. Absence is not an error. Returns the
    /// number of removed entries.
    pub async fn prune(&self, staged_root: &Path) -> Result<usize, ReserveError> {
        let mut removed = 0;

        for entry in &self.prune_list {
            if entry.contains(GLOB_METACHARS) {
                continue;
            }
            if !is_safe_relative(entry) {
                continue;
            }

            let resolved = staged_root.join(entry);
            let metadata = match fs::metadata(&resolved).await {
                Ok(m) => m,
                Err(_) => continue,
            };

            let result = if metadata.is_dir() {
                fs::remove_dir_all(&resolved).await
            } else {
                fs::remove_file(&resolved).await
            };
            result.map_err(|e| ReserveError::PruneFailed {
                message: format!("{}: {}", entry, e),
            })?;
            removed += 1;
        }

        Ok(removed)
    }
}

/// Entries must stay inside the staged root: no absolute paths, no `..`.
fn is_safe_relative(entry: &str) -> bool {
    let path = Path::new(entry);
    !path.is_absolute()
        && !path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_drops_comments_blanks_and_negations() {
        let content = "# comment\n\nREADME.md\n!keep-me\ndocs/\n";
        let entries = PublishPruner::parse_ignore_list(content);
        assert_eq!(entries, vec!["README.md".to_string(), "docs".to_string()]);
    }

    #[test]
    fn test_parse_collapses_duplicates() {
        let content = "docs\ndocs/\nREADME.md\ndocs";
        let entries = PublishPruner::parse_ignore_list(content);
        assert_eq!(entries, vec!["docs".to_string(), "README.md".to_string()]);
    }

    #[test]
    fn test_parse_keeps_glob_entries_verbatim() {
        let content = "*.test.js\nREADME.md\n";
        let entries = PublishPruner::parse_ignore_list(content);
        assert_eq!(
            entries,
            vec!["*.test.js".to_string(), "README.md".to_string()]
        );
    }

    #[tokio::test]
    async fn test_from_project_root_prefers_ignore_file() {
        let temp_dir = TempDir::new().unwrap();
        std_fs::write(temp_dir.path().join(IGNORE_FILE), "only-this\n").unwrap();

        let pruner = PublishPruner::from_project_root(temp_dir.path())
            .await
            .unwrap();
        assert_eq!(pruner.prune_list(), &["only-this".to_string()]);
    }

    #[tokio::test]
    async fn test_from_project_root_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let pruner = PublishPruner::from_project_root(temp_dir.path())
            .await
            .unwrap();
        assert_eq!(pruner.prune_list().len(), DEFAULT_PRUNE_PATHS.len());
        assert!(pruner.prune_list().contains(&".env".to_string()));
    }

    #[tokio::test]
    async fn test_prune_removes_files_and_dirs() {
        let staged = TempDir::new().unwrap();
        std_fs::write(staged.path().join("README.md"), "readme").unwrap();
        std_fs::create_dir(staged.path().join("docs")).unwrap();
        std_fs::write(staged.path().join("docs/guide.md"), "guide").unwrap();
        std_fs::write(staged.path().join("index.js"), "x").unwrap();

        let pruner =
            PublishPruner::with_list(vec!["README.md".to_string(), "docs".to_string()]);
        let removed = pruner.prune(staged.path()).await.unwrap();

        assert_eq!(removed, 2);
        assert!(!staged.path().join("README.md").exists());
        assert!(!staged.path().join("docs").exists());
        assert!(staged.path().join("index.js").exists());
    }

    #[tokio::test]
    async fn test_prune_ignores_absent_paths() {
        let staged = TempDir::new().unwrap();
        let pruner = PublishPruner::with_list(vec!["not-there.txt".to_string()]);
        let removed = pruner.prune(staged.path()).await.unwrap();
        assert_eq!(removed, 0);
    }

    #[tokio::test]
    async fn test_prune_skips_glob_entries_silently() {
        let staged = TempDir::new().unwrap();
        std_fs::write(staged.path().join("a.test.js"), "t").unwrap();
        std_fs::write(staged.path().join("README.md"), "readme").unwrap();

        let pruner = PublishPruner::with_list(vec![
            "README.md".to_string(),
            "*.test.js".to_string(),
            "file?.txt".to_string(),
            "[abc].js".to_string(),
        ]);
        let removed = pruner.prune(staged.path()).await.unwrap();

        assert_eq!(removed, 1);
        assert!(staged.path().join("a.test.js").exists());
        assert!(!staged.path().join("README.md").exists());
    }

    #[tokio::test]
    async fn test_prune_skips_traversal_entries() {
        let staged = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        std_fs::write(outside.path().join("victim.txt"), "safe").unwrap();

        let entry = format!("../{}/victim.txt", outside.path().file_name().unwrap().to_str().unwrap());
        let pruner = PublishPruner::with_list(vec![entry, "/etc/hosts".to_string()]);
        let removed = pruner.prune(staged.path()).await.unwrap();

        assert_eq!(removed, 0);
        assert!(outside.path().join("victim.txt").exists());
    }
}
