//! # 返信送信ハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /send-first`
//! - `POST /send-second`
//! - `POST /send-third`
//! - `POST /send-fourth`
//!
//! 4 ルートとも同じハンドラを使い、ルーター側で付与した [`Prefix`] で
//! 送信に使う SMTP アイデンティティを切り替える。

use std::sync::Arc;

use axum::{
    Extension,
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, header},
    response::IntoResponse,
};
use mailrelay_domain::{mail::ProviderMessageId, prefix::Prefix, reply::ReplyRequest};
use serde::Serialize;

use crate::{error::RelayError, usecase::DispatchUseCase};

/// 返信送信ハンドラの共有状態
pub struct DispatchState {
    pub usecase: Arc<dyn DispatchUseCase>,
}

/// 送信成功レスポンス
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendReplyResponse {
    pub success:    bool,
    pub message_id: ProviderMessageId,
}

/// POST /send-{prefix}
///
/// JSON として解釈できないボディは 400 `invalid body` を返す。
/// 空ボディ・`null`・JSON 以外の `Content-Type` は空の依頼として扱い、
/// 必須フィールドの検証（400 `missing fields`）に回す。
pub async fn send_reply(
    State(state): State<Arc<DispatchState>>,
    Extension(prefix): Extension<Prefix>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, RelayError> {
    let request = parse_reply_body(&headers, &body).inspect_err(|e| {
        tracing::warn!(
            relay.prefix = %prefix,
            "リクエストボディを解釈できません: {}",
            e
        );
    })?;

    let message_id = state.usecase.dispatch(prefix, request).await?;

    Ok(Json(SendReplyResponse {
        success: true,
        message_id,
    }))
}

/// リクエストボディを [`ReplyRequest`] に変換する
fn parse_reply_body(headers: &HeaderMap, body: &[u8]) -> Result<ReplyRequest, RelayError> {
    if !is_json_content_type(headers) || body.trim_ascii().is_empty() {
        return Ok(ReplyRequest::default());
    }

    serde_json::from_slice::<Option<ReplyRequest>>(body)
        .map(Option::unwrap_or_default)
        .map_err(|e| RelayError::InvalidBody(e.to_string()))
}

/// `application/json` および `application/*+json` を JSON とみなす
fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(value) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };
    let mime = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}
