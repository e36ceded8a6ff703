//! # Relay Service アプリケーション構築
//!
//! State の組み立てとルーター構築を担当する。
//! `main.rs` は設定読み込みとサーバー起動に集中する。

use std::sync::Arc;

use axum::{
    Extension,
    Router,
    http::{HeaderName, Method, header},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use mailrelay_domain::prefix::Prefix;
use mailrelay_infra::MailTransport;
use mailrelay_shared::{
    canonical_log::CanonicalLogLineLayer,
    observability::{MakeRequestUuidV7, make_request_span},
};
use strum::IntoEnumIterator;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    config::RelayConfig,
    handler::{DispatchState, health_check, send_reply},
    middleware::{API_SECRET_HEADER, ApiSecretState, cors_response_headers, require_api_secret},
    registry::TransporterRegistry,
    usecase::DispatchUseCaseImpl,
};

/// ルーターを構築する
///
/// | ルート | ガード |
/// |--------|--------|
/// | `GET /health` | なし |
/// | `POST /send-{first,second,third,fourth}` | `x-api-secret` |
pub fn build_app(
    config: &RelayConfig,
    registry: Arc<TransporterRegistry>,
    transport: Arc<dyn MailTransport>,
) -> Router {
    let dispatch_state = Arc::new(DispatchState {
        usecase: Arc::new(DispatchUseCaseImpl::new(registry, transport)),
    });
    let api_secret_state = ApiSecretState::new(config.api_secret.as_str());

    // プレフィックスごとに 1 ルート。どのプレフィックスかはルート側で決まる
    let send_routes = Prefix::iter()
        .fold(Router::new(), |router, prefix| {
            router.route(
                prefix.route_path(),
                post(send_reply).layer(Extension(prefix)),
            )
        })
        .route_layer(from_fn_with_state(api_secret_state, require_api_secret))
        .with_state(dispatch_state);

    Router::new()
        .route("/health", get(health_check))
        .merge(send_routes)
        // CORS はガードより外側に置き、403 やプリフライトにもヘッダーを付ける
        .layer(cors_layer())
        .layer(from_fn(cors_response_headers))
        // Request ID レイヤー（下に書いたものが外側）
        // 1. SetRequestIdLayer（最外）: UUID v7 を生成（またはクライアント提供値を使用）
        // 2. TraceLayer: スパンに request_id を含め、全ログに自動注入
        // 3. CanonicalLogLineLayer: リクエスト完了時に 1 行サマリログを出力（スパン内）
        // 4. PropagateRequestIdLayer: レスポンスヘッダーに X-Request-Id をコピー
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(CanonicalLogLineLayer)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}

/// 全レスポンスに付与する CORS 設定
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(API_SECRET_HEADER),
        ])
}
