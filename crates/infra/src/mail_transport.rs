//! # メール送信
//!
//! SMTP アイデンティティと送信メールを受け取り、実際に送信するトランスポート。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `MailTransport` trait で送信手段を抽象化
//! - **2 つの実装**: SMTP（lettre）、Noop（ローカル開発用）
//! - **環境変数切替**: `MAIL_BACKEND` でランタイム選択
//! - **リトライなし**: 失敗はそのまま呼び出し元に返す

mod noop;
mod smtp;

use std::sync::Arc;

use async_trait::async_trait;
use mailrelay_domain::{
    identity::SmtpIdentity,
    mail::{OutboundMail, ProviderMessageId, TransportError},
};
pub use noop::NoopMailTransport;
pub use smtp::SmtpMailTransport;

/// メール送信トレイト
///
/// 接続パラメータはリクエストごとにアイデンティティから受け取るため、
/// 実装は送信先サーバーごとの状態を持たない。
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// メールを送信し、プロバイダが割り当てたメッセージ ID を返す
    async fn send(
        &self,
        identity: &SmtpIdentity,
        mail: &OutboundMail,
    ) -> Result<ProviderMessageId, TransportError>;
}

/// 送信バックエンドの種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MailBackend {
    /// lettre による SMTP 送信
    #[default]
    Smtp,
    /// 送信せずログ出力のみ
    Noop,
}

impl MailBackend {
    /// `MAIL_BACKEND` の値をパースする（不明な値は `None`）
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "smtp" => Some(Self::Smtp),
            "noop" => Some(Self::Noop),
            _ => None,
        }
    }

    /// 対応するトランスポートを生成する
    pub fn build(self) -> Arc<dyn MailTransport> {
        match self {
            Self::Smtp => Arc::new(SmtpMailTransport::new()),
            Self::Noop => Arc::new(NoopMailTransport),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_既知の値() {
        assert_eq!(MailBackend::parse("smtp"), Some(MailBackend::Smtp));
        assert_eq!(MailBackend::parse("noop"), Some(MailBackend::Noop));
    }

    #[test]
    fn test_parse_不明な値はnone() {
        assert_eq!(MailBackend::parse("ses"), None);
        assert_eq!(MailBackend::parse("SMTP"), None);
    }

    #[test]
    fn test_デフォルトはsmtp() {
        assert_eq!(MailBackend::default(), MailBackend::Smtp);
    }
}
