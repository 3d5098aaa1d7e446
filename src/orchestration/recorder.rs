//! Reservation log
//!
//! One reserved package name per line, newest first, in the original
//! project root. The log is only ever prepended to; history is never
//! rewritten or pruned.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Log file kept at the original project root
pub const LOG_FILE: &str = "reserved-packages.txt";

/// Prepends successful reservations to the persistent log
pub struct OutcomeRecorder {
    log_path: PathBuf,
}

impl OutcomeRecorder {
    pub fn new<P: AsRef<Path>>(original_root: P) -> Self {
        Self {
            log_path: original_root.as_ref().join(LOG_FILE),
        }
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Prepend the reserved name, keeping previous content unchanged.
    ///
    /// Callers treat a failure here as a warning; the reservation itself
    /// already succeeded.
    pub async fn record(&self, package_name: &str) -> std::io::Result<()> {
        let existing = match fs::read_to_string(&self.log_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e),
        };

        fs::write(&self.log_path, format!("{}\n{}", package_name, existing)).await
    }
}
