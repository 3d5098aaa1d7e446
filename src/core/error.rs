//! Error handling for package name reservation
//!
//! This module provides comprehensive error types with recovery guidance
//! using the thiserror crate for ergonomic error handling.

use thiserror::Error;

/// Main error type for reservation operations
#[derive(Error, Debug)]
pub enum ReserveError {
    // Input validation errors
    #[error("無効なパッケージ名です: {reason}")]
    InvalidPackageName { reason: String },

    #[error("ユーザー名が空です")]
    InvalidUsername,

    // Environment errors
    #[error("環境変数 {env_var} が設定されていません")]
    TokenMissing { env_var: String },

    #[error("非対話モードではパッケージ名とユーザー名の指定が必要です")]
    NotInteractive,

    // Staging / filesystem errors
    #[error("ステージングに失敗しました: {message}")]
    StagingFailed { message: String },

    #[error("ファイルの削除に失敗しました: {message}")]
    PruneFailed { message: String },

    // Publishing errors
    #[error(
        "パッケージ名 '{name}' は取得できません（既存パッケージと同一または類似）。\
         スコープ付きパッケージとしての再試行は行いません"
    )]
    NameConflict { name: String },

    #[error("公開が拒否されました: {message}（スコープ付きパッケージとしての再試行は行いません）")]
    PublishForbidden { message: String },

    #[error("公開処理に失敗しました（終了コード {exit_code}）: {message}")]
    PublishFailed { exit_code: i32, message: String },
}

impl ReserveError {
    /// Check if this error is recoverable by the user without code changes
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::NameConflict { .. })
    }

    /// Get suggested actions for this error
    pub fn suggested_actions(&self) -> Vec<&'static str> {
        match self {
            Self::InvalidPackageName { .. } => vec![
                "npmの命名規則を確認してください",
                "小文字英数字とハイフン、アンダースコア、ドットのみ使用できます",
            ],
            Self::InvalidUsername => {
                vec!["npmjs.comのユーザー名を指定してください"]
            }
            Self::TokenMissing { .. } => vec![
                "環境変数を設定してください（例: export NPM_TOKEN=...）",
                ".envファイルでの設定もサポートしています",
            ],
            Self::NotInteractive => {
                vec!["--name と --user オプションで指定してください"]
            }
            Self::StagingFailed { .. } => vec![
                "ディスク容量と書き込み権限を確認してください",
                "テンプレートディレクトリのパスを確認してください",
            ],
            Self::PruneFailed { .. } => {
                vec![".npmignoreの内容を確認してください"]
            }
            Self::NameConflict { .. } => vec![
                "別のパッケージ名を選んでください",
                "npmjs.comで既存パッケージを検索してください",
            ],
            Self::PublishForbidden { .. } => vec![
                "トークンの権限と有効期限を確認してください",
                "npmjs.comのアカウント状態を確認してください",
            ],
            Self::PublishFailed { .. } => vec![
                "コマンドの出力を確認してください",
                "ネットワーク接続とレジストリのステータスを確認してください",
            ],
        }
    }

    /// Get error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidPackageName { .. } => "INVALID_PACKAGE_NAME",
            Self::InvalidUsername => "INVALID_USERNAME",
            Self::TokenMissing { .. } => "TOKEN_MISSING",
            Self::NotInteractive => "NOT_INTERACTIVE",
            Self::StagingFailed { .. } => "STAGING_FAILED",
            Self::PruneFailed { .. } => "PRUNE_FAILED",
            Self::NameConflict { .. } => "NAME_CONFLICT",
            Self::PublishForbidden { .. } => "PUBLISH_FORBIDDEN",
            Self::PublishFailed { .. } => "PUBLISH_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_package_name_error() {
        let error = ReserveError::InvalidPackageName {
            reason: "パッケージ名が空です".to_string(),
        };

        assert!(error.is_recoverable());
        assert_eq!(error.code(), "INVALID_PACKAGE_NAME");
        assert!(error.to_string().contains("パッケージ名が空です"));
    }

    #[test]
    fn test_token_missing_error() {
        let error = ReserveError::TokenMissing {
            env_var: "NPM_TOKEN".to_string(),
        };

        assert!(error.is_recoverable());
        assert_eq!(error.code(), "TOKEN_MISSING");
        assert!(error.to_string().contains("NPM_TOKEN"));
        let actions = error.suggested_actions();
        assert!(actions.iter().any(|&a| a.contains("環境変数")));
    }

    #[test]
    fn test_name_conflict_is_not_recoverable() {
        let error = ReserveError::NameConflict {
            name: "left-pad".to_string(),
        };

        assert!(!error.is_recoverable());
        assert_eq!(error.code(), "NAME_CONFLICT");
        let message = error.to_string();
        assert!(message.contains("left-pad"));
        assert!(message.contains("スコープ付き"));
    }

    #[test]
    fn test_publish_failed_error_with_exit_code() {
        let error = ReserveError::PublishFailed {
            exit_code: 1,
            message: "ECONNREFUSED".to_string(),
        };

        assert!(error.is_recoverable());
        assert_eq!(error.code(), "PUBLISH_FAILED");
        let message = error.to_string();
        assert!(message.contains("ECONNREFUSED"));
        assert!(message.contains('1'));
    }

    #[test]
    fn test_staging_failed_error() {
        let error = ReserveError::StagingFailed {
            message: "No space left on device".to_string(),
        };

        assert_eq!(error.code(), "STAGING_FAILED");
        assert!(error.suggested_actions().len() >= 2);
    }

    #[test]
    fn test_not_interactive_error() {
        let error = ReserveError::NotInteractive;

        assert_eq!(error.code(), "NOT_INTERACTIVE");
        let actions = error.suggested_actions();
        assert!(actions.iter().any(|&a| a.contains("--name")));
    }
}
