//! # Relay Service エラー定義
//!
//! 中継処理のエラーと、HTTP レスポンスへの変換を定義する。
//!
//! | エラー | ステータス | ボディ |
//! |--------|-----------|--------|
//! | `Unauthorized` | 403 | `{"error":"unauthorized"}` |
//! | `Validation` | 400 | `{"error":"missing fields","required":[...]}` |
//! | `InvalidBody` | 400 | `{"error":"invalid body","details":...}` |
//! | `Config` | 500 | `{"error":"smtp configuration error"}` |
//! | `Transport` | 500 | `{"error":"smtp error","details":...}` |
//!
//! ログ出力は発生箇所（ガード・ユースケース）で行い、ここではレスポンス変換のみを担う。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mailrelay_domain::{
    ConfigError,
    ErrorKind,
    mail::TransportError,
    reply::ValidationError,
};
use serde::Serialize;
use thiserror::Error;

/// エラーレスポンスのボディ
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error:    &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<&'static [&'static str]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details:  Option<String>,
}

impl ErrorBody {
    fn new(error: &'static str) -> Self {
        Self {
            error,
            required: None,
            details: None,
        }
    }
}

/// Relay Service で発生するエラー
#[derive(Debug, Error)]
pub enum RelayError {
    /// API シークレット不一致
    #[error("API シークレットが一致しません")]
    Unauthorized,

    /// 必須フィールド不足
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// JSON ボディとして解釈できない
    #[error("リクエストボディが不正です: {0}")]
    InvalidBody(String),

    /// SMTP 設定の不備
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// SMTP 送信失敗
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl RelayError {
    /// ドメインのエラー分類
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized => ErrorKind::AuthError,
            Self::Validation(_) | Self::InvalidBody(_) => ErrorKind::ValidationError,
            Self::Config(_) => ErrorKind::ConfigError,
            Self::Transport(_) => ErrorKind::TransportError,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::FORBIDDEN,
            Self::Validation(_) | Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::Config(_) | Self::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            Self::Unauthorized => ErrorBody::new("unauthorized"),
            Self::Validation(e) => ErrorBody {
                required: Some(e.required()),
                ..ErrorBody::new("missing fields")
            },
            Self::InvalidBody(reason) => ErrorBody {
                details: Some(reason.clone()),
                ..ErrorBody::new("invalid body")
            },
            // 設定キー名は外部に出さない
            Self::Config(_) => ErrorBody::new("smtp configuration error"),
            Self::Transport(e) => ErrorBody {
                details: Some(e.to_string()),
                ..ErrorBody::new("smtp error")
            },
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    async fn to_json(err: RelayError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_unauthorizedは403() {
        let (status, body) = to_json(RelayError::Unauthorized).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, json!({ "error": "unauthorized" }));
    }

    #[tokio::test]
    async fn test_validationは400で必須フィールド3つを返す() {
        let err = RelayError::Validation(ValidationError {
            missing: vec!["subject"],
        });
        let (status, body) = to_json(err).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({ "error": "missing fields", "required": ["from", "subject", "messageId"] })
        );
    }

    #[tokio::test]
    async fn test_transportは500で詳細を返す() {
        let err = RelayError::Transport(TransportError::SendFailed("535 auth failed".to_string()));
        let (status, body) = to_json(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "smtp error", "details": "535 auth failed" }));
    }

    #[tokio::test]
    async fn test_configは500で設定キーを含まない() {
        let err = RelayError::Config(ConfigError::Missing {
            key: "THIRD_SMTP_PASSWORD".to_string(),
        });
        let (status, body) = to_json(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "smtp configuration error" }));
    }

    #[test]
    fn test_kindがエラー分類に対応する() {
        assert_eq!(RelayError::Unauthorized.kind(), ErrorKind::AuthError);
        assert_eq!(
            RelayError::InvalidBody("x".to_string()).kind(),
            ErrorKind::ValidationError
        );
        assert_eq!(
            RelayError::Transport(TransportError::MessageBuild("x".to_string())).kind(),
            ErrorKind::TransportError
        );
    }
}
