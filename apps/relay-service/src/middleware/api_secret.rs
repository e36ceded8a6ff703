//! # API シークレット検証ミドルウェア
//!
//! 送信ルートへのリクエストで `x-api-secret` ヘッダーを共有シークレットと照合する。
//!
//! - ヘッダーが欠落・不一致なら 403 `{"error":"unauthorized"}` を返し、ハンドラは実行しない
//! - 拒否時は接続元アドレス（取得できなければ `unknown`）とパスを warn で記録する
//! - 比較は定数時間で行う

use std::{net::SocketAddr, sync::Arc};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use mailrelay_shared::event_log::error::category;
use subtle::ConstantTimeEq;

use crate::error::RelayError;

/// API シークレットのヘッダー名
pub const API_SECRET_HEADER: &str = "x-api-secret";

/// 接続元アドレスが取れないときの表記
const UNKNOWN_REMOTE: &str = "unknown";

/// API シークレット検証の状態
#[derive(Clone)]
pub struct ApiSecretState {
    secret: Arc<str>,
}

impl ApiSecretState {
    pub fn new(secret: impl Into<Arc<str>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    fn matches(&self, provided: &[u8]) -> bool {
        self.secret.as_bytes().ct_eq(provided).into()
    }
}

/// API シークレット検証ミドルウェア
pub async fn require_api_secret(
    State(state): State<ApiSecretState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let authorized = request
        .headers()
        .get(API_SECRET_HEADER)
        .is_some_and(|value| state.matches(value.as_bytes()));

    if authorized {
        return next.run(request).await;
    }

    let remote = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or_else(|| UNKNOWN_REMOTE.to_string(), |info| info.0.ip().to_string());
    let err = RelayError::Unauthorized;
    tracing::warn!(
        error.category = category::CLIENT,
        error.kind = %err.kind(),
        http.remote_addr = %remote,
        http.path = %request.uri().path(),
        "API シークレットが一致しないリクエストを拒否しました"
    );

    err.into_response()
}
