//! # CORS ヘッダー補完ミドルウェア
//!
//! `CorsLayer` はプリフライト以外のレスポンスに `Access-Control-Allow-Methods` /
//! `Access-Control-Allow-Headers` を付けない。ブラウザ以外のクライアントからも
//! 許可内容が分かるよう、全レスポンスにこの 2 ヘッダーを設定する。

use axum::{
    extract::Request,
    http::{HeaderValue, header},
    middleware::Next,
    response::Response,
};

/// 許可するメソッド
const ALLOWED_METHODS: &str = "POST";

/// 許可するリクエストヘッダー
const ALLOWED_HEADERS: &str = "content-type, x-api-secret";

/// 全レスポンスに許可メソッドと許可ヘッダーを付与する
///
/// プリフライトで `CorsLayer` が設定した値はそのまま残す。
pub async fn cors_response_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers
        .entry(header::ACCESS_CONTROL_ALLOW_METHODS)
        .or_insert(HeaderValue::from_static(ALLOWED_METHODS));
    headers
        .entry(header::ACCESS_CONTROL_ALLOW_HEADERS)
        .or_insert(HeaderValue::from_static(ALLOWED_HEADERS));
    response
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Method, StatusCode},
        middleware::from_fn,
        response::IntoResponse,
        routing::post,
    };
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        Router::new()
            .route(
                "/send-first",
                post(|| async { StatusCode::FORBIDDEN.into_response() }),
            )
            .route(
                "/preflighted",
                post(|| async {
                    (
                        [(header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS")],
                        StatusCode::OK,
                    )
                }),
            )
            .layer(from_fn(cors_response_headers))
    }

    fn post_request(path: &str) -> Request {
        Request::builder()
            .method(Method::POST)
            .uri(path)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_エラーレスポンスにも許可メソッドと許可ヘッダーを付ける() {
        let response = app().oneshot(post_request("/send-first")).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let headers = response.headers();
        assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_METHODS).unwrap(), "POST");
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_HEADERS).unwrap(),
            "content-type, x-api-secret"
        );
    }

    #[tokio::test]
    async fn test_既に設定されたcorsヘッダーは上書きしない() {
        let response = app().oneshot(post_request("/preflighted")).await.unwrap();

        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_METHODS)
                .unwrap(),
            "POST, OPTIONS"
        );
    }
}
