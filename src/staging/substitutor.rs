//! Placeholder substitution across the staged tree
//!
//! Literal, non-regex token replacement. Files that fail UTF-8 decoding
//! are treated as binary and left untouched; files with no occurrences are
//! never rewritten.

use crate::core::error::ReserveError;
use crate::core::request::ReservationRequest;
use crate::staging::walker::{TreeEntryKind, walk_tree};
use aho_corasick::{AhoCorasickBuilder, MatchKind};
use std::fs;
use std::path::Path;

/// Template token for the package name
pub const PACKAGE_NAME_TOKEN: &str = "<package-name>";

/// Template token for the author username
pub const USERNAME_TOKEN: &str = "<username>";

/// Ordered mapping from literal token to replacement string
///
/// Fixed at two entries for this tool, but kept generic. All tokens are
/// replaced in a single simultaneous pass with leftmost-longest semantics:
/// if the map is ever extended with overlapping tokens, the longest token
/// wins at each position, and replacement text is never re-scanned for
/// further tokens.
#[derive(Debug, Clone, Default)]
pub struct ReplacementMap {
    entries: Vec<(String, String)>,
}

impl ReplacementMap {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Standard two-token map for a reservation request
    pub fn for_request(request: &ReservationRequest) -> Self {
        let mut map = Self::new();
        map.insert(PACKAGE_NAME_TOKEN, &request.package_name);
        map.insert(USERNAME_TOKEN, &request.username);
        map
    }

    /// Add a token; inserting an existing token overwrites its replacement
    /// in place, keeping the original position.
    pub fn insert(&mut self, token: &str, replacement: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|(t, _)| t == token) {
            entry.1 = replacement.to_string();
        } else {
            self.entries.push((token.to_string(), replacement.to_string()));
        }
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rewrites every decodable file in the staged tree
pub struct PlaceholderSubstitutor {
    map: ReplacementMap,
}

impl PlaceholderSubstitutor {
    pub fn new(map: ReplacementMap) -> Self {
        Self { map }
    }

    /// Replace all tokens across the staged tree, returning the number of
    /// rewritten files.
    pub async fn substitute_tree(&self, staged_root: &Path) -> Result<usize, ReserveError> {
        if self.map.is_empty() {
            return Ok(0);
        }

        let tokens: Vec<&str> = self.map.entries().iter().map(|(t, _)| t.as_str()).collect();
        let replacements: Vec<&str> = self.map.entries().iter().map(|(_, r)| r.as_str()).collect();

        let automaton = AhoCorasickBuilder::new()
            .match_kind(MatchKind::LeftmostLongest)
            .build(&tokens)
            .map_err(|e| ReserveError::StagingFailed {
                message: e.to_string(),
            })?;

        let mut rewritten = 0;
        walk_tree(staged_root, |rel_path, kind| {
            if kind != TreeEntryKind::File {
                return Ok(());
            }

            let path = staged_root.join(rel_path);
            let bytes = fs::read(&path).map_err(|e| ReserveError::StagingFailed {
                message: format!("{}: {}", rel_path.display(), e),
            })?;

            // Undecodable content is binary; leave it untouched.
            let Ok(content) = String::from_utf8(bytes) else {
                return Ok(());
            };

            if !tokens.iter().any(|token| content.contains(token)) {
                return Ok(());
            }

            let replaced = automaton.replace_all(&content, &replacements);
            fs::write(&path, replaced).map_err(|e| ReserveError::StagingFailed {
                message: format!("{}: {}", rel_path.display(), e),
            })?;
            rewritten += 1;
            Ok(())
        })?;

        Ok(rewritten)
    }
}
