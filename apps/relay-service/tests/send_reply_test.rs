//! # 返信送信のエンドツーエンドテスト
//!
//! `build_app` で構築した本番と同じルーター（ガード・CORS・Request ID 含む）に
//! リクエストを送り、`MockMailTransport` に渡った内容とレスポンスを検証する。

use std::sync::Arc;

use axum::{Router, body::Body};
use http::{Method, Request, StatusCode};
use mailrelay_domain::{prefix::Prefix, reply::DEFAULT_REPLY_BODY};
use mailrelay_infra::mock::MockMailTransport;
use mailrelay_relay_service::{
    app_builder::build_app,
    config::{ConfigStore, RelayConfig},
    registry::TransporterRegistry,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use tower::ServiceExt;

const SECRET: &str = "relay-secret";

fn store() -> ConfigStore {
    ConfigStore::from_pairs([
        ("API_SECRET_KEY", SECRET),
        ("FIRST_SMTP_HOST", "smtp.first.example"),
        ("FIRST_SMTP_PORT", "587"),
        ("FIRST_SMTP_USER", "relay@first.example"),
        ("FIRST_SMTP_PASSWORD", "pw1"),
        ("FIRST_FROM_NAME", "First Support"),
        ("FIRST_FROM_EMAIL", "support@first.example"),
        ("SECOND_SMTP_HOST", "smtp.second.example"),
        ("SECOND_SMTP_PORT", "465"),
        ("SECOND_SMTP_USER", "relay@second.example"),
        ("SECOND_SMTP_PASSWORD", "pw2"),
        ("SECOND_FROM_NAME", "Second Desk"),
        ("SECOND_FROM_EMAIL", "desk@second.example"),
    ])
}

fn test_app(transport: &MockMailTransport) -> Router {
    let store = store();
    let config = RelayConfig::from_store(&store).unwrap();
    let registry = Arc::new(TransporterRegistry::from_store(&store));
    build_app(&config, registry, Arc::new(transport.clone()))
}

fn send_request(path: &str, secret: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header("content-type", "application/json")
        .header("origin", "https://app.example.com");
    if let Some(secret) = secret {
        builder = builder.header("x-api-secret", secret);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn valid_body() -> Value {
    json!({
        "from": "a@x.com",
        "subject": "Hi",
        "messageId": "m1",
        "to": "b@y.com"
    })
}

/// 全レスポンスに付く CORS ヘッダーを検証する
fn assert_cors_headers(response: &axum::response::Response) {
    let headers = response.headers();
    assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
    assert_eq!(headers.get("access-control-allow-methods").unwrap(), "POST");
    let allow_headers = headers
        .get("access-control-allow-headers")
        .unwrap()
        .to_str()
        .unwrap()
        .to_ascii_lowercase();
    assert!(allow_headers.contains("content-type"), "{allow_headers}");
    assert!(allow_headers.contains("x-api-secret"), "{allow_headers}");
}

async fn into_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_正しいシークレットで送信するとmessage_idを返す() {
    // Given
    let transport = MockMailTransport::succeeding("abc123");
    let sut = test_app(&transport);

    // When
    let response = sut
        .oneshot(send_request("/send-first", Some(SECRET), &valid_body()))
        .await
        .unwrap();

    // Then
    assert_eq!(response.status(), StatusCode::OK);
    assert_cors_headers(&response);
    assert_eq!(
        into_json(response).await,
        json!({ "success": true, "messageId": "abc123" })
    );

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].prefix, Prefix::First);
    assert_eq!(sent[0].host, "smtp.first.example");
    assert_eq!(sent[0].port, 587);
    assert!(!sent[0].secure);
    assert_eq!(sent[0].mail.to.as_deref(), Some("b@y.com"));
    assert_eq!(sent[0].mail.subject, "Re: Hi");
    assert_eq!(sent[0].mail.in_reply_to, "m1");
    assert_eq!(sent[0].mail.references, "m1");
    assert_eq!(sent[0].mail.from_email, "support@first.example");
    assert_eq!(sent[0].mail.text_body, DEFAULT_REPLY_BODY);
}

#[tokio::test]
async fn test_ルートごとに対応するアイデンティティで送信する() {
    let transport = MockMailTransport::succeeding("abc123");
    let sut = test_app(&transport);

    let mut body = valid_body();
    body["body"] = json!("Custom reply text");
    let response = sut
        .oneshot(send_request("/send-second", Some(SECRET), &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let sent = transport.sent();
    assert_eq!(sent[0].prefix, Prefix::Second);
    assert_eq!(sent[0].port, 465);
    assert!(sent[0].secure);
    assert_eq!(sent[0].mail.from_name, "Second Desk");
    assert_eq!(sent[0].mail.text_body, "Custom reply text");
}

#[rstest]
#[case::不一致(Some("wrong"))]
#[case::欠落(None)]
#[tokio::test]
async fn test_シークレットが不正なら403で送信しない(#[case] secret: Option<&str>) {
    let transport = MockMailTransport::succeeding("abc123");
    let sut = test_app(&transport);

    let response = sut
        .oneshot(send_request("/send-first", secret, &valid_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_cors_headers(&response);
    assert_eq!(into_json(response).await, json!({ "error": "unauthorized" }));
    assert_eq!(transport.send_count(), 0);
}

#[rstest]
#[case::subject欠落("subject")]
#[case::from欠落("from")]
#[case::message_id欠落("messageId")]
#[tokio::test]
async fn test_必須フィールド欠落は400で3フィールドを提示する(#[case] field: &str) {
    let transport = MockMailTransport::succeeding("abc123");
    let sut = test_app(&transport);

    let mut body = valid_body();
    body.as_object_mut().unwrap().remove(field);
    let response = sut
        .oneshot(send_request("/send-first", Some(SECRET), &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        into_json(response).await,
        json!({ "error": "missing fields", "required": ["from", "subject", "messageId"] })
    );
    assert_eq!(transport.send_count(), 0);
}

#[rstest]
#[case::空ボディ("")]
#[case::空白のみ("   ")]
#[case::null("null")]
#[tokio::test]
async fn test_json指定で空やnullのボディは400で3フィールドを提示する(#[case] body: &'static str) {
    let transport = MockMailTransport::succeeding("abc123");
    let sut = test_app(&transport);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/send-first")
        .header("content-type", "application/json")
        .header("x-api-secret", SECRET)
        .body(Body::from(body))
        .unwrap();
    let response = sut.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        into_json(response).await,
        json!({ "error": "missing fields", "required": ["from", "subject", "messageId"] })
    );
    assert_eq!(transport.send_count(), 0);
}

#[tokio::test]
async fn test_構文が壊れたjsonは400でinvalid_bodyを返す() {
    let transport = MockMailTransport::succeeding("abc123");
    let sut = test_app(&transport);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/send-first")
        .header("content-type", "application/json")
        .header("x-api-secret", SECRET)
        .body(Body::from("{not json"))
        .unwrap();
    let response = sut.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = into_json(response).await;
    assert_eq!(json["error"], "invalid body");
    assert!(json["details"].is_string());
    assert_eq!(transport.send_count(), 0);
}

#[tokio::test]
async fn test_送信失敗は500でsmtpエラーの詳細を返す() {
    let transport = MockMailTransport::failing("Invalid login: 535 Authentication failed");
    let sut = test_app(&transport);

    let response = sut
        .oneshot(send_request("/send-first", Some(SECRET), &valid_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        into_json(response).await,
        json!({ "error": "smtp error", "details": "Invalid login: 535 Authentication failed" })
    );
    assert_eq!(transport.send_count(), 1);
}

#[tokio::test]
async fn test_未設定プレフィックスは500で設定キーを返さない() {
    let transport = MockMailTransport::succeeding("abc123");
    let sut = test_app(&transport);

    let response = sut
        .oneshot(send_request("/send-third", Some(SECRET), &valid_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        into_json(response).await,
        json!({ "error": "smtp configuration error" })
    );
    assert_eq!(transport.send_count(), 0);
}

#[tokio::test]
async fn test_プリフライトはシークレットなしでcorsヘッダーを返す() {
    let transport = MockMailTransport::succeeding("abc123");
    let sut = test_app(&transport);

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/send-first")
        .header("origin", "https://app.example.com")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type,x-api-secret")
        .body(Body::empty())
        .unwrap();
    let response = sut.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_cors_headers(&response);
    assert_eq!(transport.send_count(), 0);
}

#[tokio::test]
async fn test_healthはシークレットなしで200とrequest_idを返す() {
    let transport = MockMailTransport::succeeding("abc123");
    let sut = test_app(&transport);

    let response = sut
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_cors_headers(&response);
    assert_eq!(into_json(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_同時リクエストはそれぞれ独立に送信される() {
    let transport = MockMailTransport::succeeding("abc123");
    let sut = test_app(&transport);

    let requests = ["/send-first", "/send-second", "/send-first"].map(|path| {
        let sut = sut.clone();
        async move {
            sut.oneshot(send_request(path, Some(SECRET), &valid_body()))
                .await
                .unwrap()
                .status()
        }
    });
    let [a, b, c] = requests;
    let statuses = tokio::join!(a, b, c);

    assert_eq!(
        statuses,
        (StatusCode::OK, StatusCode::OK, StatusCode::OK)
    );
    assert_eq!(transport.send_count(), 3);
}
