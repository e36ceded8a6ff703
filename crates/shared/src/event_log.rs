//! # ビジネスイベントログとエラーコンテキストの構造化ヘルパー
//!
//! ログフィールドの命名規約とヘルパーマクロを提供する。
//!
//! ## ビジネスイベント
//!
//! [`log_business_event!`] マクロで出力する。`event.kind = "business_event"` マーカーが
//! 自動付与され、`jq 'select(.["event.kind"] == "business_event")'` でフィルタできる。
//!
//! ## エラーコンテキスト
//!
//! `tracing::warn!` / `tracing::error!` に `error.category` + `error.kind` を直接追加する。
//! `error.kind` にはドメインの `ErrorKind`（`auth_error` など）をそのまま使う。

/// ビジネスイベントを構造化ログとして出力する。
///
/// `event.kind = "business_event"` マーカーを自動付与し、
/// `tracing::info!` レベルで出力する。
///
/// ## 必須フィールド（慣例）
///
/// - `event.category`: イベントカテゴリ（[`event::category`] の定数を使用）
/// - `event.action`: アクション名（[`event::action`] の定数を使用）
/// - `event.result`: 結果（[`event::result`] の定数を使用）
#[macro_export]
macro_rules! log_business_event {
    ($($args:tt)*) => {
        ::tracing::info!(
            event.kind = "business_event",
            $($args)*
        )
    };
}

/// イベントフィールドの定数
pub mod event {
    /// イベントカテゴリ
    pub mod category {
        pub const RELAY: &str = "relay";
    }

    /// イベントアクション
    pub mod action {
        pub const REPLY_SENT: &str = "reply.sent";
    }

    /// イベント結果
    pub mod result {
        pub const SUCCESS: &str = "success";
    }
}

/// エラーコンテキストフィールドの定数
pub mod error {
    /// エラーカテゴリ
    pub mod category {
        /// 呼び出し元の入力・認証情報
        pub const CLIENT: &str = "client";
        /// 設定ストアの不備
        pub const CONFIGURATION: &str = "configuration";
        /// 外部サービス呼び出し（SMTP サーバー）
        pub const EXTERNAL_SERVICE: &str = "external_service";
    }
}
