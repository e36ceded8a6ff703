//! # ミドルウェア
//!
//! Relay Service 用のミドルウェアを提供する。

mod api_secret;
mod cors_headers;

pub use api_secret::{API_SECRET_HEADER, ApiSecretState, require_api_secret};
pub use cors_headers::cors_response_headers;
