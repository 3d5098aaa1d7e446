//! Reservation request with npm naming-rule validation
//!
//! Name rules follow the npm registry's published constraints:
//! https://docs.npmjs.com/cli/v9/configuring-npm/package-json#name

use crate::core::error::ReserveError;
use lazy_static::lazy_static;
use regex::Regex;

/// Maximum length for an npm package name
pub const MAX_NAME_LENGTH: usize = 214;

lazy_static! {
    static ref VALID_NAME_CHARS: Regex = Regex::new(r"^[a-z0-9._-]+$").unwrap();
}

/// A validated request to reserve a package name for a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationRequest {
    pub package_name: String,
    pub username: String,
}

impl ReservationRequest {
    /// Create a new request; the username is trimmed on construction
    pub fn new(package_name: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            username: username.into().trim().to_string(),
        }
    }

    /// Validate the request against npm naming rules
    ///
    /// Checks run in order and the first failing rule is reported.
    pub fn validate(&self) -> Result<(), ReserveError> {
        let name = &self.package_name;

        if name.is_empty() {
            return Err(self.name_error("パッケージ名が空です"));
        }

        if name.len() > MAX_NAME_LENGTH {
            return Err(self.name_error("パッケージ名は214文字以内である必要があります"));
        }

        if name.chars().any(char::is_whitespace) {
            return Err(self.name_error("パッケージ名に空白を含めることはできません"));
        }

        if name.starts_with('.') || name.starts_with('_') {
            return Err(
                self.name_error("パッケージ名はドットまたはアンダースコアで始めることはできません")
            );
        }

        if name.chars().any(|c| c.is_uppercase()) {
            return Err(self.name_error("パッケージ名に大文字を含めることはできません"));
        }

        if !VALID_NAME_CHARS.is_match(name) {
            return Err(self.name_error(
                "パッケージ名は小文字英数字とハイフン、アンダースコア、ドットのみ使用可能です",
            ));
        }

        if self.username.is_empty() {
            return Err(ReserveError::InvalidUsername);
        }

        Ok(())
    }

    fn name_error(&self, reason: &str) -> ReserveError {
        ReserveError::InvalidPackageName {
            reason: reason.to_string(),
        }
    }
}
