//! # プレフィックス
//!
//! 送信に使う SMTP アイデンティティを選ぶ識別子。
//! 呼び出し元が指定するものではなく、マッチしたルートから決まる。
//!
//! | バリアント | ルート | 設定キーの接頭辞 |
//! |-----------|--------|----------------|
//! | `First` | `POST /send-first` | `FIRST_` |
//! | `Second` | `POST /send-second` | `SECOND_` |
//! | `Third` | `POST /send-third` | `THIRD_` |
//! | `Fourth` | `POST /send-fourth` | `FOURTH_` |

use serde::Serialize;
use strum::EnumIter;

/// 送信サービスのプレフィックス
///
/// 設定時点で決まる閉じた集合。`Display` は小文字（`first`）で、
/// ログの `relay.prefix` フィールドにそのまま出力する。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    EnumIter,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Prefix {
    First,
    Second,
    Third,
    Fourth,
}

impl Prefix {
    /// 送信エンドポイントのパス（例: `/send-first`）
    pub fn route_path(self) -> &'static str {
        match self {
            Self::First => "/send-first",
            Self::Second => "/send-second",
            Self::Third => "/send-third",
            Self::Fourth => "/send-fourth",
        }
    }

    /// 設定キーの接頭辞（例: `FIRST`）
    pub fn config_namespace(self) -> &'static str {
        match self {
            Self::First => "FIRST",
            Self::Second => "SECOND",
            Self::Third => "THIRD",
            Self::Fourth => "FOURTH",
        }
    }

    /// 設定キーを組み立てる（例: `FIRST_SMTP_HOST`）
    pub fn config_key(self, suffix: &str) -> String {
        format!("{}_{suffix}", self.config_namespace())
    }
}
