//! # 送信メール
//!
//! トランスポートに渡す論理的な「メール送信要求」と、その結果を定義する。
//! SMTP の会話そのものはインフラ層の `MailTransport` 実装が担う。

use derive_more::{Deref, Display, From};
use serde::Serialize;
use thiserror::Error;

/// 送信メール
///
/// [`ValidatedReply::compose`](crate::reply::ValidatedReply::compose) の出力。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMail {
    /// 送信者の表示名
    pub from_name:   String,
    /// 送信者アドレス
    pub from_email:  String,
    /// 宛先（カンマ区切りで複数指定可）
    pub to:          Option<String>,
    /// 件名
    pub subject:     String,
    /// プレーンテキスト本文
    pub text_body:   String,
    /// `In-Reply-To` ヘッダー
    pub in_reply_to: String,
    /// `References` ヘッダー
    pub references:  String,
}

/// プロバイダが割り当てたメッセージ ID
#[derive(Debug, Clone, PartialEq, Eq, Display, Deref, From, Serialize)]
#[serde(transparent)]
pub struct ProviderMessageId(String);

impl ProviderMessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// トランスポートエラー
///
/// 送信失敗はリトライせず、そのまま呼び出し元に報告する。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// アドレスの解析に失敗
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// メッセージの構築に失敗
    #[error("message build failed: {0}")]
    MessageBuild(String),

    /// SMTP サーバーとのやり取りに失敗
    #[error("{0}")]
    SendFailed(String),
}
