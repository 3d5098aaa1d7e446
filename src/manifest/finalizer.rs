//! Manifest finalization
//!
//! Runs after textual substitution and authoritatively overwrites the
//! staged manifest's identity fields, so the published name never depends
//! on the template's placeholder tokens matching the substitution keys.

use crate::core::error::ReserveError;
use crate::core::request::ReservationRequest;
use serde_json::{Value, json};
use std::path::Path;
use tokio::fs;

/// Manifest file at the staged workspace root
pub const MANIFEST_FILE: &str = "package.json";

/// Fixed version published for a reservation
pub const RESERVATION_VERSION: &str = "0.0.1-reserved";

/// Forces the staged manifest's name/author/version fields
#[derive(Debug, Default)]
pub struct ManifestFinalizer;

impl ManifestFinalizer {
    pub fn new() -> Self {
        Self
    }

    /// Rewrite the staged `package.json` in canonical pretty-printed form.
    ///
    /// Returns `Ok(true)` when the manifest was rewritten. A missing or
    /// unparseable manifest is a no-op (`Ok(false)`); the publish stage
    /// will fail loudly on it, which is the better diagnostic. Idempotent.
    pub async fn finalize(
        &self,
        staged_root: &Path,
        request: &ReservationRequest,
    ) -> Result<bool, ReserveError> {
        let manifest_path = staged_root.join(MANIFEST_FILE);

        let Ok(content) = fs::read_to_string(&manifest_path).await else {
            return Ok(false);
        };
        let Ok(mut manifest) = serde_json::from_str::<Value>(&content) else {
            return Ok(false);
        };
        let Some(fields) = manifest.as_object_mut() else {
            return Ok(false);
        };

        fields.insert("name".to_string(), json!(request.package_name));
        fields.insert("author".to_string(), json!(request.username));
        fields.insert("version".to_string(), json!(RESERVATION_VERSION));

        let serialized =
            serde_json::to_string_pretty(&manifest).map_err(|e| ReserveError::StagingFailed {
                message: format!("{}: {}", MANIFEST_FILE, e),
            })?;
        fs::write(&manifest_path, serialized + "\n")
            .await
            .map_err(|e| ReserveError::StagingFailed {
                message: format!("{}: {}", MANIFEST_FILE, e),
            })?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use tempfile::TempDir;

    fn request() -> ReservationRequest {
        ReservationRequest::new("my-reserved-pkg", "sanae")
    }

    #[tokio::test]
    async fn test_finalize_forces_identity_fields() {
        let staged = TempDir::new().unwrap();
        std_fs::write(
            staged.path().join(MANIFEST_FILE),
            r#"{"name": "<package-name>", "version": "1.2.3", "license": "MIT"}"#,
        )
        .unwrap();

        let finalizer = ManifestFinalizer::new();
        let rewritten = finalizer.finalize(staged.path(), &request()).await.unwrap();
        assert!(rewritten);

        let content = std_fs::read_to_string(staged.path().join(MANIFEST_FILE)).unwrap();
        let manifest: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(manifest["name"], "my-reserved-pkg");
        assert_eq!(manifest["author"], "sanae");
        assert_eq!(manifest["version"], RESERVATION_VERSION);
    }

    #[tokio::test]
    async fn test_finalize_preserves_unknown_fields() {
        let staged = TempDir::new().unwrap();
        std_fs::write(
            staged.path().join(MANIFEST_FILE),
            r#"{"name": "x", "scripts": {"build": "tsc"}, "private": false}"#,
        )
        .unwrap();

        let finalizer = ManifestFinalizer::new();
        finalizer.finalize(staged.path(), &request()).await.unwrap();

        let content = std_fs::read_to_string(staged.path().join(MANIFEST_FILE)).unwrap();
        let manifest: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(manifest["scripts"]["build"], "tsc");
        assert_eq!(manifest["private"], false);
    }

    #[tokio::test]
    async fn test_finalize_is_idempotent() {
        let staged = TempDir::new().unwrap();
        std_fs::write(
            staged.path().join(MANIFEST_FILE),
            r#"{"name": "x", "version": "9.9.9"}"#,
        )
        .unwrap();

        let finalizer = ManifestFinalizer::new();
        finalizer.finalize(staged.path(), &request()).await.unwrap();
        let first = std_fs::read_to_string(staged.path().join(MANIFEST_FILE)).unwrap();

        finalizer.finalize(staged.path(), &request()).await.unwrap();
        let second = std_fs::read_to_string(staged.path().join(MANIFEST_FILE)).unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_missing_manifest_is_a_no_op() {
        let staged = TempDir::new().unwrap();
        let finalizer = ManifestFinalizer::new();
        let rewritten = finalizer.finalize(staged.path(), &request()).await.unwrap();
        assert!(!rewritten);
    }

    #[tokio::test]
    async fn test_unparseable_manifest_is_left_untouched() {
        let staged = TempDir::new().unwrap();
        std_fs::write(staged.path().join(MANIFEST_FILE), "{not json").unwrap();

        let finalizer = ManifestFinalizer::new();
        let rewritten = finalizer.finalize(staged.path(), &request()).await.unwrap();

        assert!(!rewritten);
        assert_eq!(
            std_fs::read_to_string(staged.path().join(MANIFEST_FILE)).unwrap(),
            "{not json"
        );
    }

    #[tokio::test]
    async fn test_non_object_manifest_is_a_no_op() {
        let staged = TempDir::new().unwrap();
        std_fs::write(staged.path().join(MANIFEST_FILE), r#"["not", "an", "object"]"#).unwrap();

        let finalizer = ManifestFinalizer::new();
        let rewritten = finalizer.finalize(staged.path(), &request()).await.unwrap();
        assert!(!rewritten);
    }
}
