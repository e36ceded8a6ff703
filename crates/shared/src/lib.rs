//! # MailRelay 共有ユーティリティ
//!
//! 中継サービスと各クレートで使う横断的なユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - tracing / tower 系の依存は `observability` feature に閉じ込める

#[cfg(feature = "observability")]
pub mod canonical_log;
pub mod event_log;
pub mod health;
pub mod observability;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use health::HealthResponse;
