//! # トランスポーターレジストリ
//!
//! プレフィックスから SMTP アイデンティティを解決する。
//!
//! 起動時に全プレフィックスを一度だけ解決し、結果（成功・失敗とも）を保持する。
//! 設定は実行中に変化しないため、毎回解決し直した場合と結果は同じになる。
//! 構築後は読み取り専用なので、同時実行中のリクエスト間でロックなしに共有できる。

use std::collections::HashMap;

use mailrelay_domain::{ConfigError, identity::SmtpIdentity, prefix::Prefix};
use strum::IntoEnumIterator;

use crate::config::ConfigStore;

/// プレフィックス → SMTP アイデンティティの対応表
#[derive(Debug, Clone)]
pub struct TransporterRegistry {
    entries: HashMap<Prefix, Result<SmtpIdentity, ConfigError>>,
}

impl TransporterRegistry {
    /// 設定ストアから全プレフィックスを解決する
    ///
    /// 解決に失敗したプレフィックスは warn を出して記録し、起動は継続する。
    /// そのプレフィックスへのリクエストは設定エラーとして扱われる。
    pub fn from_store(store: &ConfigStore) -> Self {
        let entries = Prefix::iter()
            .map(|prefix| {
                let resolved = SmtpIdentity::resolve(prefix, |key| store.get(key));
                match &resolved {
                    Ok(identity) => tracing::info!(
                        relay.prefix = %prefix,
                        smtp.host = identity.host(),
                        smtp.port = identity.port(),
                        smtp.secure = identity.secure(),
                        "SMTP アイデンティティを解決しました"
                    ),
                    Err(e) => tracing::warn!(
                        relay.prefix = %prefix,
                        config.key = e.key(),
                        error = %e,
                        "SMTP アイデンティティを解決できません（このプレフィックスへの送信は失敗します）"
                    ),
                }
                (prefix, resolved)
            })
            .collect();

        Self { entries }
    }

    /// プレフィックスに対応するアイデンティティを返す
    pub fn resolve(&self, prefix: Prefix) -> Result<&SmtpIdentity, ConfigError> {
        match self.entries.get(&prefix) {
            Some(Ok(identity)) => Ok(identity),
            Some(Err(e)) => Err(e.clone()),
            None => Err(ConfigError::Missing {
                key: prefix.config_key("SMTP_HOST"),
            }),
        }
    }

    /// 利用可能なプレフィックスの一覧
    pub fn usable_prefixes(&self) -> Vec<Prefix> {
        Prefix::iter()
            .filter(|prefix| matches!(self.entries.get(prefix), Some(Ok(_))))
            .collect()
    }
}
