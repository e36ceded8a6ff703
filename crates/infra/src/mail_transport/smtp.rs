//! SMTP 送信実装
//!
//! lettre の `AsyncSmtpTransport` を使用してメールを送信する。
//! 接続パラメータは送信ごとにアイデンティティから組み立てる。

use async_trait::async_trait;
use lettre::{
    Address,
    AsyncSmtpTransport,
    AsyncTransport,
    Message,
    Tokio1Executor,
    message::{Mailbox, Mailboxes, header::ContentType},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
};
use mailrelay_domain::{
    identity::SmtpIdentity,
    mail::{OutboundMail, ProviderMessageId, TransportError},
};

use super::MailTransport;

/// TLS の張り方
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TlsPolicy {
    /// 接続開始時から TLS（SMTPS）
    Implicit,
    /// 平文で接続し、サーバーが対応していれば STARTTLS
    Opportunistic,
}

impl TlsPolicy {
    fn for_identity(identity: &SmtpIdentity) -> Self {
        if identity.secure() {
            Self::Implicit
        } else {
            Self::Opportunistic
        }
    }
}

/// SMTP 送信
///
/// 状態を持たないため、全リクエストで共有しても競合しない。
#[derive(Debug, Clone, Default)]
pub struct SmtpMailTransport;

impl SmtpMailTransport {
    pub fn new() -> Self {
        Self
    }

    fn transport_for(
        identity: &SmtpIdentity,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, TransportError> {
        let tls_parameters = TlsParameters::new(identity.host().to_string())
            .map_err(|e| TransportError::SendFailed(format!("TLS 設定の構築に失敗: {e}")))?;
        let tls = match TlsPolicy::for_identity(identity) {
            TlsPolicy::Implicit => Tls::Wrapper(tls_parameters),
            TlsPolicy::Opportunistic => Tls::Opportunistic(tls_parameters),
        };

        Ok(
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(identity.host())
                .port(identity.port())
                .tls(tls)
                .credentials(Credentials::new(
                    identity.username().to_string(),
                    identity.password().to_string(),
                ))
                .build(),
        )
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(
        &self,
        identity: &SmtpIdentity,
        mail: &OutboundMail,
    ) -> Result<ProviderMessageId, TransportError> {
        let message = build_message(mail)?;
        let message_id = message_id_of(&message)?;

        Self::transport_for(identity)?
            .send(message)
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))?;

        Ok(message_id)
    }
}

/// 送信メールから lettre のメッセージを組み立てる
///
/// `Message-ID` はここで新規に生成し、送信成功時の ID として返す。
fn build_message(mail: &OutboundMail) -> Result<Message, TransportError> {
    let from_address: Address = mail
        .from_email
        .parse()
        .map_err(|e| TransportError::InvalidAddress(format!("from: {e}")))?;

    let mut builder = Message::builder()
        .from(Mailbox::new(Some(mail.from_name.clone()), from_address))
        .subject(&mail.subject)
        .in_reply_to(angle_bracketed(&mail.in_reply_to))
        .references(angle_bracketed(&mail.references))
        .message_id(None);

    if let Some(to) = mail.to.as_deref().filter(|to| !to.trim().is_empty()) {
        let recipients: Mailboxes = to
            .parse()
            .map_err(|e| TransportError::InvalidAddress(format!("to: {e}")))?;
        for recipient in recipients {
            builder = builder.to(recipient);
        }
    }

    builder
        .header(ContentType::TEXT_PLAIN)
        .body(mail.text_body.clone())
        .map_err(|e| TransportError::MessageBuild(e.to_string()))
}

fn message_id_of(message: &Message) -> Result<ProviderMessageId, TransportError> {
    message
        .headers()
        .get_raw("Message-ID")
        .map(ProviderMessageId::new)
        .ok_or_else(|| TransportError::MessageBuild("Message-ID が生成されていません".to_string()))
}

/// スレッドヘッダー用に `<id>` 形式へ正規化する
fn angle_bracketed(id: &str) -> String {
    let trimmed = id.trim();
    if trimmed.starts_with('<') && trimmed.ends_with('>') {
        trimmed.to_string()
    } else {
        format!("<{trimmed}>")
    }
}
