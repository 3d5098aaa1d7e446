//! Secure token manager with memory-safe handling and masking capabilities
//!
//! This module provides secure token management for npm registry
//! authentication, using the `secrecy` crate to prevent accidental token
//! exposure in logs or memory dumps.

use secrecy::SecretString;
use std::env;

/// Environment variable holding the npm registry auth token
pub const TOKEN_ENV_VAR: &str = "NPM_TOKEN";

/// Substrings that mark a token as an obvious placeholder
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "test",
    "example",
    "dummy",
    "fake",
    "sample",
    "placeholder",
    "your_",
    "xxx",
    "12345",
];

/// Secure token manager for npm registry authentication
///
/// # Examples
///
/// ```
/// use package_reserver::security::SecureTokenManager;
///
/// let manager = SecureTokenManager::new();
/// if manager.has_token() {
///     println!("npm token is configured");
/// }
/// ```
#[derive(Debug, Default)]
pub struct SecureTokenManager;

impl SecureTokenManager {
    pub fn new() -> Self {
        Self
    }

    /// Retrieve the npm token from the environment
    ///
    /// Returns `None` if the variable is unset or empty. The token is read
    /// once at run start and injected into the publisher; nothing else
    /// reads the environment afterwards.
    pub fn get_token(&self) -> Option<SecretString> {
        let value = env::var(TOKEN_ENV_VAR).ok()?;
        if value.is_empty() {
            return None;
        }
        Some(SecretString::new(value.into()))
    }

    /// Check whether a token is configured
    pub fn has_token(&self) -> bool {
        self.get_token().is_some()
    }

    /// Mask a token for safe logging
    ///
    /// Shows only the first 3 and last 3 characters for identification.
    /// Tokens shorter than 10 characters are fully masked as "****".
    ///
    /// # Examples
    ///
    /// ```
    /// use package_reserver::security::SecureTokenManager;
    ///
    /// let manager = SecureTokenManager::new();
    /// assert_eq!(manager.mask_token("abcdef123456"), "abc...456");
    /// assert_eq!(manager.mask_token("short"), "****");
    /// ```
    pub fn mask_token(&self, token: &str) -> String {
        if token.is_empty() || token.len() < 10 {
            return "****".to_string();
        }

        let prefix = &token[..3];
        let suffix = &token[token.len() - 3..];
        format!("{}...{}", prefix, suffix)
    }

    /// Heuristic check for test/dummy token values
    ///
    /// A placeholder-looking token is worth a warning before publishing,
    /// but only the registry can reject it authoritatively.
    pub fn looks_like_placeholder(&self, token: &str) -> bool {
        let lower = token.to_lowercase();
        PLACEHOLDER_PATTERNS
            .iter()
            .any(|pattern| lower.contains(pattern))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    // Single test for all environment states: the suite runs tests in
    // parallel and NPM_TOKEN is process-global.
    #[test]
    fn test_get_token_follows_env_var() {
        let manager = SecureTokenManager::new();

        unsafe {
            env::set_var(TOKEN_ENV_VAR, "npm_A8f3kQz92bXw71LmP0q");
        }
        let token = manager.get_token();
        assert!(token.is_some());
        assert_eq!(token.unwrap().expose_secret(), "npm_A8f3kQz92bXw71LmP0q");

        unsafe {
            env::set_var(TOKEN_ENV_VAR, "");
        }
        assert!(!manager.has_token());

        unsafe {
            env::remove_var(TOKEN_ENV_VAR);
        }
        assert!(!manager.has_token());
    }

    #[test]
    fn test_mask_token_with_short_token() {
        let manager = SecureTokenManager::new();
        assert_eq!(manager.mask_token("short"), "****");
        assert_eq!(manager.mask_token(""), "****");
    }

    #[test]
    fn test_mask_token_with_long_token() {
        let manager = SecureTokenManager::new();
        assert_eq!(manager.mask_token("abcdef123456"), "abc...456");
        assert_eq!(manager.mask_token("very-long-token-string"), "ver...ing");
    }

    #[test]
    fn test_placeholder_detection() {
        let manager = SecureTokenManager::new();
        assert!(manager.looks_like_placeholder("npm_test_token"));
        assert!(manager.looks_like_placeholder("YOUR_TOKEN_HERE"));
        assert!(manager.looks_like_placeholder("abc12345def"));
        assert!(!manager.looks_like_placeholder("npm_A8f3kQz92bXw71LmP0q"));
    }
}
