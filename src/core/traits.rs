//! Core types and the registry seam
//!
//! The `RegistryClient` trait is the boundary between the staging pipeline
//! and the external registry command, so the orchestrator can be exercised
//! against a mock registry in tests.

use async_trait::async_trait;
use std::path::Path;

/// Terminal result of the external publish command
///
/// Immutable once produced; the orchestrator interprets it, the publisher
/// never does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl PublishOutcome {
    /// A zero exit code signals success
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Combined output for failure classification
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Registry publish seam
///
/// Implementations run the registry's publish operation against a staged
/// workspace. Credentials are written inside the staged workspace only and
/// must never escape it.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Registry name (e.g., "npm")
    fn name(&self) -> &str;

    /// Publish the staged workspace, returning the raw outcome
    ///
    /// A non-zero exit code is reported through the outcome, not as an
    /// `Err`; `Err` is reserved for failures to run the command at all.
    async fn publish(&self, staged_root: &Path) -> anyhow::Result<PublishOutcome>;
}
