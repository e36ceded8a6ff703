//! # Relay Service 設定
//!
//! 起動時に一度だけ構築する不変の設定ストアと、サーバー設定を定義する。
//! グローバルな環境変数を直接参照せず、ストアを参照で渡す。

use std::{collections::HashMap, env};

use mailrelay_domain::ConfigError;
use mailrelay_infra::MailBackend;

/// デフォルトのバインドアドレス
const DEFAULT_HOST: &str = "0.0.0.0";

/// デフォルトのポート番号
const DEFAULT_PORT: u16 = 3000;

/// 設定ストア
///
/// 文字列キーから文字列値への読み取り専用マップ。構築後は変更しない。
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    values: HashMap<String, String>,
}

impl ConfigStore {
    /// `.env`（存在する場合）と環境変数からストアを構築する
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_pairs(env::vars())
    }

    /// キーと値の組からストアを構築する
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// 必須キーを取得する（未設定・空文字列はエラー）
    pub fn require(&self, key: &str) -> Result<&str, ConfigError> {
        match self.get(key) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(ConfigError::Missing {
                key: key.to_string(),
            }),
        }
    }
}

/// Relay Service サーバーの設定
#[derive(Clone)]
pub struct RelayConfig {
    /// バインドアドレス
    pub host:         String,
    /// ポート番号
    pub port:         u16,
    /// `x-api-secret` ヘッダーと照合する共有シークレット
    pub api_secret:   String,
    /// 送信バックエンド
    pub mail_backend: MailBackend,
}

impl RelayConfig {
    /// 設定ストアから読み込む
    ///
    /// | キー | 必須 | デフォルト |
    /// |------|------|-----------|
    /// | `RELAY_HOST` | No | `0.0.0.0` |
    /// | `PORT` | No | `3000` |
    /// | `API_SECRET_KEY` | **Yes** | - |
    /// | `MAIL_BACKEND` | No | `smtp` |
    pub fn from_store(store: &ConfigStore) -> Result<Self, ConfigError> {
        let host = store.get("RELAY_HOST").unwrap_or(DEFAULT_HOST).to_string();

        let port = match store.get("PORT") {
            None | Some("") => DEFAULT_PORT,
            Some(raw) => match raw.parse::<u16>() {
                Ok(port) if port != 0 => port,
                _ => {
                    return Err(ConfigError::Invalid {
                        key:    "PORT".to_string(),
                        value:  raw.to_string(),
                        reason: "有効なポート番号である必要があります".to_string(),
                    });
                }
            },
        };

        // 未設定のシークレットで全員を通さない
        let api_secret = store.require("API_SECRET_KEY")?.to_string();

        let mail_backend = match store.get("MAIL_BACKEND") {
            None | Some("") => MailBackend::default(),
            Some(raw) => MailBackend::parse(raw).ok_or_else(|| ConfigError::Invalid {
                key:    "MAIL_BACKEND".to_string(),
                value:  raw.to_string(),
                reason: "smtp または noop を指定してください".to_string(),
            })?,
        };

        Ok(Self {
            host,
            port,
            api_secret,
            mail_backend,
        })
    }
}

impl std::fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_secret", &"***")
            .field("mail_backend", &self.mail_backend)
            .finish()
    }
}
