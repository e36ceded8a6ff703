//! # 返信送信ユースケース
//!
//! 1. 必須フィールドを検証する（欠落時は SMTP に一切触れない）
//! 2. プレフィックスから SMTP アイデンティティを解決する
//! 3. 返信メールを組み立て、トランスポートで 1 回だけ送信する
//!
//! 失敗はいずれも呼び出し元に返し、リトライしない。

use std::sync::Arc;

use mailrelay_domain::{ErrorKind, mail::ProviderMessageId, prefix::Prefix, reply::ReplyRequest};
use mailrelay_infra::MailTransport;
use mailrelay_shared::{
    event_log::{error::category, event},
    log_business_event,
};

use crate::{error::RelayError, registry::TransporterRegistry};

/// 返信送信ユースケースの実装
pub struct DispatchUseCaseImpl {
    registry:  Arc<TransporterRegistry>,
    transport: Arc<dyn MailTransport>,
}

impl DispatchUseCaseImpl {
    pub fn new(registry: Arc<TransporterRegistry>, transport: Arc<dyn MailTransport>) -> Self {
        Self {
            registry,
            transport,
        }
    }

    /// 返信を検証して送信する
    pub async fn dispatch(
        &self,
        prefix: Prefix,
        request: ReplyRequest,
    ) -> Result<ProviderMessageId, RelayError> {
        let reply = request.validate().map_err(|e| {
            tracing::warn!(
                error.category = category::CLIENT,
                error.kind = %ErrorKind::ValidationError,
                relay.prefix = %prefix,
                missing = ?e.missing,
                "必須フィールドが不足しているため送信しません"
            );
            RelayError::from(e)
        })?;

        let identity = self.registry.resolve(prefix).map_err(|e| {
            tracing::error!(
                error.category = category::CONFIGURATION,
                error.kind = %ErrorKind::ConfigError,
                relay.prefix = %prefix,
                config.key = e.key(),
                "SMTP アイデンティティが設定されていません: {}",
                e
            );
            RelayError::from(e)
        })?;

        let original_from = reply.from.clone();
        let mail = reply.compose(identity);

        let message_id = self
            .transport
            .send(identity, &mail)
            .await
            .map_err(|e| {
                tracing::error!(
                    error.category = category::EXTERNAL_SERVICE,
                    error.kind = %ErrorKind::TransportError,
                    relay.prefix = %prefix,
                    smtp.host = identity.host(),
                    smtp.port = identity.port(),
                    "SMTP 送信に失敗しました: {}",
                    e
                );
                RelayError::from(e)
            })?;

        log_business_event!(
            event.category = event::category::RELAY,
            event.action = event::action::REPLY_SENT,
            event.result = event::result::SUCCESS,
            relay.prefix = %prefix,
            mail.to = mail.to.as_deref().unwrap_or("-"),
            mail.original_from = %original_from,
            mail.in_reply_to = %mail.in_reply_to,
            mail.message_id = %message_id,
            "返信を送信しました"
        );

        Ok(message_id)
    }
}
