//! # エラー種別と設定エラー
//!
//! 中継処理で発生する失敗を 4 種類に分類する。
//!
//! ## エラーの種類と HTTP ステータスの対応
//!
//! | エラー種別 | HTTP ステータス | ログレベル |
//! |-----------|----------------|-----------|
//! | `auth_error` | 403 Forbidden | warn |
//! | `validation_error` | 400 Bad Request | warn |
//! | `config_error` | 500 Internal Server Error | error |
//! | `transport_error` | 500 Internal Server Error | error |
//!
//! いずれも単一リクエスト内で完結し、自動リトライは行わない。

use serde::Serialize;
use thiserror::Error;

/// 失敗の分類タグ
///
/// ログの `error.kind` フィールドに出力される安定した識別子。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// API シークレット不一致
    AuthError,
    /// 必須フィールド不足
    ValidationError,
    /// SMTP 設定の欠落・不正
    ConfigError,
    /// SMTP 送信失敗
    TransportError,
}

/// 設定エラー
///
/// 設定ストアのキーが欠落しているか、値が解釈できない場合に発生する。
/// 呼び出し元の入力ではなく運用側の不備なので、4xx にはしない。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// キーが存在しないか空文字列
    #[error("設定 {key} が未設定です")]
    Missing {
        /// 設定キー（例: `FIRST_SMTP_HOST`）
        key: String,
    },

    /// 値が不正
    #[error("設定 {key} の値 {value:?} が不正です: {reason}")]
    Invalid {
        /// 設定キー
        key:    String,
        /// 実際の値
        value:  String,
        /// 不正な理由
        reason: String,
    },
}

impl ConfigError {
    /// 問題のあった設定キーを返す
    pub fn key(&self) -> &str {
        match self {
            Self::Missing { key } | Self::Invalid { key, .. } => key,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_error_kindはsnake_caseで表示される() {
        assert_eq!(ErrorKind::AuthError.to_string(), "auth_error");
        assert_eq!(ErrorKind::ValidationError.to_string(), "validation_error");
        assert_eq!(ErrorKind::ConfigError.to_string(), "config_error");
        assert_eq!(ErrorKind::TransportError.to_string(), "transport_error");
    }

    #[test]
    fn test_error_kindを文字列からパースできる() {
        assert_eq!(
            ErrorKind::from_str("transport_error").unwrap(),
            ErrorKind::TransportError
        );
        assert!(ErrorKind::from_str("unknown").is_err());
    }

    #[test]
    fn test_keyがどちらのバリアントでもキーを返す() {
        let missing = ConfigError::Missing {
            key: "FIRST_SMTP_HOST".to_string(),
        };
        let invalid = ConfigError::Invalid {
            key:    "FIRST_SMTP_PORT".to_string(),
            value:  "abc".to_string(),
            reason: "数値ではありません".to_string(),
        };

        assert_eq!(missing.key(), "FIRST_SMTP_HOST");
        assert_eq!(invalid.key(), "FIRST_SMTP_PORT");
    }
}
