//! # Relay Service サーバー
//!
//! 4 つの送信ルートで返信依頼を受け、ルートごとの SMTP アイデンティティで返信メールを送る。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `API_SECRET_KEY` | **Yes** | `x-api-secret` ヘッダーと照合する共有シークレット |
//! | `RELAY_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `PORT` | No | ポート番号（デフォルト: `3000`） |
//! | `MAIL_BACKEND` | No | `smtp`（デフォルト）または `noop` |
//! | `LOG_FORMAT` | No | `json` または `pretty`（デフォルト） |
//! | `{PREFIX}_SMTP_HOST` | 送信時 | SMTP サーバーのホスト |
//! | `{PREFIX}_SMTP_PORT` | 送信時 | SMTP ポート（`465` なら暗黙的 TLS） |
//! | `{PREFIX}_SMTP_USER` | 送信時 | SMTP 認証ユーザー |
//! | `{PREFIX}_SMTP_PASSWORD` | 送信時 | SMTP 認証パスワード |
//! | `{PREFIX}_FROM_NAME` | 送信時 | 送信者の表示名 |
//! | `{PREFIX}_FROM_EMAIL` | 送信時 | 送信者アドレス |
//!
//! `{PREFIX}` は `FIRST` / `SECOND` / `THIRD` / `FOURTH`。
//! 未設定のプレフィックスがあっても起動はするが、そのルートへの送信は 500 になる。
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境（.env ファイルを使用、SMTP に接続しない）
//! MAIL_BACKEND=noop cargo run -p mailrelay-relay-service
//!
//! # 本番環境
//! API_SECRET_KEY=... FIRST_SMTP_HOST=... LOG_FORMAT=json cargo run -p mailrelay-relay-service --release
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use mailrelay_relay_service::{
    app_builder::build_app,
    config::{ConfigStore, RelayConfig},
    registry::TransporterRegistry,
};
use mailrelay_shared::observability::{LogFormat, TracingConfig, init_tracing};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 設定ストアは起動時に一度だけ構築し、以降は参照で渡す
    let store = ConfigStore::from_env();

    // トレーシング初期化
    let tracing_config = TracingConfig::new(
        "relay-service",
        LogFormat::from_value(store.get("LOG_FORMAT")),
    );
    init_tracing(&tracing_config);
    let _tracing_guard = tracing::info_span!("app", service = "relay-service").entered();

    let config = RelayConfig::from_store(&store).context("設定の読み込みに失敗しました")?;
    tracing::info!(
        "Relay Service を起動します: {}:{} (backend: {:?})",
        config.host,
        config.port,
        config.mail_backend
    );

    let registry = Arc::new(TransporterRegistry::from_store(&store));
    let usable = registry.usable_prefixes();
    if usable.is_empty() {
        tracing::warn!("利用可能な SMTP アイデンティティがありません。全ての送信が失敗します");
    } else {
        tracing::info!(prefixes = ?usable, "利用可能なプレフィックス");
    }

    let transport = config.mail_backend.build();
    let app = build_app(&config, registry, transport);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("アドレスのパースに失敗しました: {}", config.host))?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Relay Service が起動しました: {}", addr);

    // ガードで接続元アドレスを記録するため ConnectInfo を付与する
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
