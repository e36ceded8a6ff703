//! # MailRelay ドメイン層
//!
//! 返信メール中継のビジネスルールを定義する。
//!
//! ## 設計方針
//!
//! - **外部依存なし**: SMTP や HTTP の詳細はインフラ層・アプリ層に閉じ込める
//! - **型で状態を表現**: 検証前の [`reply::ReplyRequest`] と検証済みの
//!   [`reply::ValidatedReply`] を別の型として扱い、未検証の送信を防ぐ
//! - **閉じたプレフィックス集合**: 送信元アイデンティティは [`prefix::Prefix`]
//!   の列挙で表現し、自由文字列を受け付けない
//!
//! ## 依存関係の方向
//!
//! ```text
//! relay-service → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`error`] - エラー種別と設定エラー
//! - [`identity`] - プレフィックスごとの SMTP アイデンティティ
//! - [`mail`] - 送信メールとトランスポートエラー
//! - [`prefix`] - ルートから決まるプレフィックス
//! - [`reply`] - 返信リクエストの検証とメール組み立て
//!
//! ## 使用例
//!
//! ```rust
//! use mailrelay_domain::{prefix::Prefix, reply::ReplyRequest};
//!
//! let request = ReplyRequest {
//!     from: Some("a@example.com".to_string()),
//!     subject: Some("Hi".to_string()),
//!     message_id: Some("m1".to_string()),
//!     ..Default::default()
//! };
//! assert!(request.validate().is_ok());
//! assert_eq!(Prefix::First.route_path(), "/send-first");
//! ```

pub mod error;
pub mod identity;
pub mod mail;
pub mod prefix;
pub mod reply;

pub use error::{ConfigError, ErrorKind};
