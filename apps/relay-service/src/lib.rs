//! # Relay Service ライブラリ
//!
//! HTTP で受けた返信依頼を、ルートに対応する SMTP アイデンティティから送信する。
//!
//! ## モジュール構成
//!
//! - `app_builder`: State の組み立てとルーター構築
//! - `config`: 設定ストアとサーバー設定
//! - `error`: エラーと HTTP レスポンスへの変換
//! - `handler`: HTTP ハンドラ
//! - `middleware`: ミドルウェア（API シークレット検証）
//! - `registry`: プレフィックス → SMTP アイデンティティの対応表
//! - `usecase`: 検証・送信のビジネスロジック

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod registry;
pub mod usecase;
