//! # テスト用モックトランスポート
//!
//! ユースケース・ハンドラのテストで使用するインメモリ実装。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! mailrelay-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mailrelay_domain::{
    identity::SmtpIdentity,
    mail::{OutboundMail, ProviderMessageId, TransportError},
    prefix::Prefix,
};

use crate::mail_transport::MailTransport;

/// 送信記録
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub prefix: Prefix,
    pub host:   String,
    pub port:   u16,
    pub secure: bool,
    pub mail:   OutboundMail,
}

// ===== MockMailTransport =====

/// 送信内容を記録するモック
///
/// `failing` で生成した場合は記録したうえで常に `SendFailed` を返す。
#[derive(Clone, Default)]
pub struct MockMailTransport {
    sent:       Arc<Mutex<Vec<SentMail>>>,
    message_id: String,
    failure:    Option<String>,
}

impl MockMailTransport {
    /// 常に `message_id` を返して成功するモック
    pub fn succeeding(message_id: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            ..Self::default()
        }
    }

    /// 常に `reason` で失敗するモック
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::default()
        }
    }

    /// 送信が試みられたメールの一覧
    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn send_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl MailTransport for MockMailTransport {
    async fn send(
        &self,
        identity: &SmtpIdentity,
        mail: &OutboundMail,
    ) -> Result<ProviderMessageId, TransportError> {
        self.sent.lock().unwrap().push(SentMail {
            prefix: identity.prefix(),
            host:   identity.host().to_string(),
            port:   identity.port(),
            secure: identity.secure(),
            mail:   mail.clone(),
        });

        match &self.failure {
            Some(reason) => Err(TransportError::SendFailed(reason.clone())),
            None => Ok(ProviderMessageId::new(self.message_id.clone())),
        }
    }
}
