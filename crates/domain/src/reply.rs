//! # 返信リクエスト
//!
//! 呼び出し元から受け取る返信依頼と、その検証ルールを定義する。
//!
//! ## 検証ルール
//!
//! - `from` / `subject` / `messageId` のいずれかが欠落または空文字列なら拒否する
//! - `to` は必須にしない（現行の寛容な挙動を維持する）
//! - 拒否時は欠けたフィールドに関わらず、必須フィールド 3 つをすべて提示する

use serde::Deserialize;
use thiserror::Error;

use crate::{identity::SmtpIdentity, mail::OutboundMail};

/// 必須フィールド名（JSON 上の名前）
pub const REQUIRED_FIELDS: [&str; 3] = ["from", "subject", "messageId"];

/// 本文が省略されたときの定型文
pub const DEFAULT_REPLY_BODY: &str =
    "Thank you for your message. We will get back to you shortly.";

/// 件名に付ける返信接頭辞
const REPLY_SUBJECT_PREFIX: &str = "Re: ";

/// 返信リクエスト（検証前）
///
/// JSON ボディ `{ to?, from, subject, messageId, body? }` に対応する。
/// 欠落と空文字列を区別せず検証するため、すべて `Option` で受ける。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyRequest {
    /// 返信先アドレス
    pub to:         Option<String>,
    /// 元メールの送信者（スレッドの文脈。実際の送信者にはならない）
    pub from:       Option<String>,
    /// 元メールの件名
    pub subject:    Option<String>,
    /// 元メールの Message-ID（スレッド化に使う）
    pub message_id: Option<String>,
    /// 返信本文
    pub body:       Option<String>,
}

/// 検証エラー
///
/// `missing` は実際に欠けていたフィールド（ログ用）。
/// レスポンスには常に [`REQUIRED_FIELDS`] を返す。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("必須フィールドが不足しています: {}", missing.join(", "))]
pub struct ValidationError {
    pub missing: Vec<&'static str>,
}

impl ValidationError {
    /// 呼び出し元に提示する必須フィールド一覧
    pub fn required(&self) -> &'static [&'static str] {
        &REQUIRED_FIELDS
    }
}

/// 検証済みの返信
///
/// 必須フィールドが揃っていることを型で保証する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedReply {
    pub to:         Option<String>,
    pub from:       String,
    pub subject:    String,
    pub message_id: String,
    pub body:       Option<String>,
}

impl ReplyRequest {
    /// 必須フィールドを検証する
    pub fn validate(self) -> Result<ValidatedReply, ValidationError> {
        let Self {
            to,
            from,
            subject,
            message_id,
            body,
        } = self;

        match (non_empty(from), non_empty(subject), non_empty(message_id)) {
            (Some(from), Some(subject), Some(message_id)) => Ok(ValidatedReply {
                to,
                from,
                subject,
                message_id,
                body,
            }),
            (from, subject, message_id) => {
                let missing = [from.is_none(), subject.is_none(), message_id.is_none()]
                    .into_iter()
                    .zip(REQUIRED_FIELDS)
                    .filter_map(|(is_missing, name)| is_missing.then_some(name))
                    .collect();
                Err(ValidationError { missing })
            }
        }
    }
}

impl ValidatedReply {
    /// 送信メールを組み立てる
    ///
    /// - 送信者は常にアイデンティティの表示名とアドレス（呼び出し元の `from` は使わない）
    /// - 件名は `"Re: " + subject`
    /// - 本文は空でなければ呼び出し元の値、そうでなければ定型文
    /// - `In-Reply-To` / `References` はどちらも元メールの Message-ID
    pub fn compose(self, identity: &SmtpIdentity) -> OutboundMail {
        let text_body = non_empty(self.body).unwrap_or_else(|| DEFAULT_REPLY_BODY.to_string());

        OutboundMail {
            from_name: identity.from_name().to_string(),
            from_email: identity.from_email().to_string(),
            to: self.to,
            subject: format!("{REPLY_SUBJECT_PREFIX}{}", self.subject),
            text_body,
            in_reply_to: self.message_id.clone(),
            references: self.message_id,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
