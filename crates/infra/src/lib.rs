//! # MailRelay インフラ層
//!
//! 外部システム（SMTP サーバー）との通信を担当する。
//!
//! ## 設計方針
//!
//! ドメイン層で定義された送信メール（`OutboundMail`）と SMTP アイデンティティを受け取り、
//! 実際の送信を行う。SMTP プロトコルの詳細はこのクレートに閉じ込める。
//!
//! ```text
//! relay-service → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`mail_transport`] - メール送信トレイトと SMTP / Noop 実装
//! - `mock` - テスト用のインメモリ実装（`test-utils` feature）

pub mod mail_transport;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use mail_transport::{MailBackend, MailTransport, NoopMailTransport, SmtpMailTransport};
