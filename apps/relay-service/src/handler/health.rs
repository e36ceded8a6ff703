//! # ヘルスチェックハンドラ
//!
//! `GET /health` は依存先に触れず常に `"healthy"` を返す（Liveness Check）。
//! API シークレットの検証対象外。

use axum::Json;
use mailrelay_shared::HealthResponse;

/// Relay Service のヘルスチェックエンドポイント
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(env!("CARGO_PKG_VERSION")))
}
