//! # ログキャプチャ（テスト用）
//!
//! tracing のイベントをメモリに溜め、ログレベルやフィールドを検証できるようにする。
//! `set_default` はスレッドローカルなので、`#[tokio::test]`（current_thread）で使う。

use std::sync::{Arc, Mutex};

use tracing_subscriber::layer::SubscriberExt;

/// キャプチャしたログイベント
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level:   tracing::Level,
    pub message: String,
    pub fields:  Vec<(String, String)>,
}

impl CapturedEvent {
    /// フィールド値を名前で引く
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// ログイベントをキャプチャする Layer
#[derive(Clone)]
pub struct CaptureLayer {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for CaptureLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let captured = CapturedEvent {
            level:   *event.metadata().level(),
            message: visitor.message.unwrap_or_default(),
            fields:  visitor.fields,
        };

        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(captured);
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields:  Vec<(String, String)>,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        } else {
            self.fields
                .push((field.name().to_string(), format!("{:?}", value)));
        }
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.fields
            .push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields
                .push((field.name().to_string(), value.to_string()));
        }
    }
}

/// キャプチャ subscriber をセットアップする
///
/// 返り値の `DefaultGuard` はスコープに保持すること（ドロップでリセット）。
pub fn setup_capture() -> (
    tracing::subscriber::DefaultGuard,
    Arc<Mutex<Vec<CapturedEvent>>>,
) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let capture = CaptureLayer {
        events: events.clone(),
    };
    let subscriber = tracing_subscriber::registry().with(capture);
    let guard = tracing::subscriber::set_default(subscriber);
    (guard, events)
}
