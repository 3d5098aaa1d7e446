//! npm registry publishing
//!
//! Invokes `npm publish` against the staged workspace. The auth token is
//! materialized as an `.npmrc` inside the staged workspace root only; it is
//! never copied elsewhere and never logged. Publish output is streamed to
//! the user's terminal in real time and buffered for classification.

use crate::core::traits::{PublishOutcome, RegistryClient};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::path::Path;
use std::process::Stdio;
use tokio::fs;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

/// Credential file written at the staged workspace root
pub const NPMRC_FILE: &str = ".npmrc";

/// Output markers meaning the name is already taken or too similar
const NAME_CONFLICT_MARKERS: &[&str] = &[
    "too similar",
    "similar to an existing package",
    "previously published versions",
];

/// Output markers for a permission-style rejection
const FORBIDDEN_MARKERS: &[&str] = &["e403", "403", "forbidden"];

/// Classification of a failed publish, derived from combined output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishFailureKind {
    /// Name already taken or too similar; never retried under a scope
    NameConflict,
    /// Registry refused the operation (auth/permission)
    Forbidden,
    /// Anything else (network, packaging, missing manifest, ...)
    Other,
}

/// Scan a failed outcome for known textual markers
pub fn classify_failure(outcome: &PublishOutcome) -> PublishFailureKind {
    let output = outcome.combined_output().to_lowercase();

    if NAME_CONFLICT_MARKERS
        .iter()
        .any(|marker| output.contains(marker))
    {
        PublishFailureKind::NameConflict
    } else if FORBIDDEN_MARKERS
        .iter()
        .any(|marker| output.contains(marker))
    {
        PublishFailureKind::Forbidden
    } else {
        PublishFailureKind::Other
    }
}

/// npm registry client
///
/// The token is read once at run start and injected here; the registry
/// client is the only component that ever sees it.
pub struct NpmRegistry {
    token: SecretString,
}

impl NpmRegistry {
    pub fn new(token: SecretString) -> Self {
        Self { token }
    }

    /// Write the auth-token credential file into the staged root
    async fn write_credentials(&self, staged_root: &Path) -> anyhow::Result<()> {
        let npmrc = format!(
            "//registry.npmjs.org/:_authToken={}\n",
            self.token.expose_secret()
        );
        fs::write(staged_root.join(NPMRC_FILE), npmrc).await?;
        Ok(())
    }

    /// Run `npm publish` with the staged root as working directory,
    /// streaming both output channels while buffering them.
    async fn run_publish(&self, staged_root: &Path) -> anyhow::Result<PublishOutcome> {
        let mut child = Command::new("npm")
            .args(["publish", "--access", "public"])
            .current_dir(staged_root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow::anyhow!("npm stdout handle missing"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| anyhow::anyhow!("npm stderr handle missing"))?;

        let stdout_task = tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            let mut buffer = String::new();
            while let Ok(Some(line)) = lines.next_line().await {
                println!("{}", line);
                buffer.push_str(&line);
                buffer.push('\n');
            }
            buffer
        });
        let stderr_task = tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            let mut buffer = String::new();
            while let Ok(Some(line)) = lines.next_line().await {
                eprintln!("{}", line);
                buffer.push_str(&line);
                buffer.push('\n');
            }
            buffer
        });

        // Reap the child on every path; readers finish when the pipes close.
        let status = child.wait().await?;
        let stdout_buf = stdout_task.await.unwrap_or_default();
        let stderr_buf = stderr_task.await.unwrap_or_default();

        Ok(PublishOutcome {
            exit_code: status.code().unwrap_or(-1),
            stdout: stdout_buf,
            stderr: stderr_buf,
        })
    }
}

#[async_trait]
impl RegistryClient for NpmRegistry {
    fn name(&self) -> &str {
        "npm"
    }

    async fn publish(&self, staged_root: &Path) -> anyhow::Result<PublishOutcome> {
        self.write_credentials(staged_root).await?;
        self.run_publish(staged_root).await
    }
}
