//! Noop 送信実装
//!
//! メールを実際に送信せず、ログ出力のみ行う。
//! SMTP サーバーのないローカル環境で `MAIL_BACKEND=noop` として使う。

use async_trait::async_trait;
use mailrelay_domain::{
    identity::SmtpIdentity,
    mail::{OutboundMail, ProviderMessageId, TransportError},
};

use super::MailTransport;

/// Noop 送信（ログ出力のみ）
#[derive(Debug, Clone)]
pub struct NoopMailTransport;

#[async_trait]
impl MailTransport for NoopMailTransport {
    async fn send(
        &self,
        identity: &SmtpIdentity,
        mail: &OutboundMail,
    ) -> Result<ProviderMessageId, TransportError> {
        let message_id = ProviderMessageId::new(format!("<{}@noop>", uuid::Uuid::now_v7()));
        tracing::info!(
            relay.prefix = %identity.prefix(),
            smtp.host = identity.host(),
            to = mail.to.as_deref().unwrap_or("-"),
            subject = %mail.subject,
            message_id = %message_id,
            "Noop: メール送信をスキップ"
        );
        Ok(message_id)
    }
}
