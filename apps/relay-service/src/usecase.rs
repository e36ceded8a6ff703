//! # ユースケース層
//!
//! Relay Service のビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **トレイトベースの設計**: ハンドラのテストでスタブに差し替えられるようにする
//! - **依存性注入**: レジストリとトランスポートを外部から注入
//! - **薄いハンドラ**: ハンドラは JSON の入出力のみ扱い、検証・送信はユースケースに集約

pub mod dispatch;

use async_trait::async_trait;
pub use dispatch::DispatchUseCaseImpl;
use mailrelay_domain::{mail::ProviderMessageId, prefix::Prefix, reply::ReplyRequest};

use crate::error::RelayError;

/// 返信送信ユースケーストレイト
#[async_trait]
pub trait DispatchUseCase: Send + Sync {
    /// 返信リクエストを検証し、プレフィックスのアイデンティティで送信する
    ///
    /// ## 戻り値
    ///
    /// - `Ok(ProviderMessageId)`: 送信したメールのメッセージ ID
    /// - `Err(RelayError)`: 検証・設定・送信のいずれかの失敗
    async fn dispatch(
        &self,
        prefix: Prefix,
        request: ReplyRequest,
    ) -> Result<ProviderMessageId, RelayError>;
}

#[async_trait]
impl DispatchUseCase for DispatchUseCaseImpl {
    async fn dispatch(
        &self,
        prefix: Prefix,
        request: ReplyRequest,
    ) -> Result<ProviderMessageId, RelayError> {
        self.dispatch(prefix, request).await
    }
}
