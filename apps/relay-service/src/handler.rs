//! # HTTP ハンドラ
//!
//! Relay Service のエンドポイントを提供する。

pub mod health;
pub mod reply;

pub use health::health_check;
pub use reply::{DispatchState, SendReplyResponse, send_reply};
