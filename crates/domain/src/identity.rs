//! # SMTP アイデンティティ
//!
//! プレフィックスごとの接続先・認証情報・送信者情報。
//! 設定ストアの `{PREFIX}_SMTP_HOST` などのキーから導出される。

use std::fmt;

use crate::{error::ConfigError, prefix::Prefix};

/// 暗黙的 TLS（SMTPS）を使うポート番号
///
/// このポートのときだけ接続開始時から TLS を張る。設定では変更できない。
pub const IMPLICIT_TLS_PORT: u16 = 465;

/// SMTP 設定キーのサフィックス
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpSetting {
    Host,
    Port,
    User,
    Password,
    FromName,
    FromEmail,
}

impl SmtpSetting {
    /// 設定キーのサフィックス（例: `SMTP_HOST`）
    pub fn key_suffix(self) -> &'static str {
        match self {
            Self::Host => "SMTP_HOST",
            Self::Port => "SMTP_PORT",
            Self::User => "SMTP_USER",
            Self::Password => "SMTP_PASSWORD",
            Self::FromName => "FROM_NAME",
            Self::FromEmail => "FROM_EMAIL",
        }
    }

    /// プレフィックス付きの完全な設定キー
    pub fn key_for(self, prefix: Prefix) -> String {
        prefix.config_key(self.key_suffix())
    }
}

/// 解決済みの SMTP アイデンティティ
///
/// 起動時に一度だけ構築され、以後は読み取り専用で共有される。
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpIdentity {
    prefix:     Prefix,
    host:       String,
    port:       u16,
    username:   String,
    password:   String,
    from_name:  String,
    from_email: String,
}

impl SmtpIdentity {
    /// 設定値の参照関数からアイデンティティを解決する
    ///
    /// `lookup` はキーに対応する値を返す。6 つのキーすべてが存在し空でないこと、
    /// ポートが 1〜65535 の数値であることを要求する。
    pub fn resolve<'a, F>(prefix: Prefix, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let require = |setting: SmtpSetting| -> Result<String, ConfigError> {
            let key = setting.key_for(prefix);
            match lookup(key.as_str()) {
                Some(value) if !value.is_empty() => Ok(value.to_string()),
                _ => Err(ConfigError::Missing { key }),
            }
        };

        let host = require(SmtpSetting::Host)?;
        let raw_port = require(SmtpSetting::Port)?;
        let port = parse_port(&raw_port).map_err(|reason| ConfigError::Invalid {
            key: SmtpSetting::Port.key_for(prefix),
            value: raw_port.clone(),
            reason,
        })?;

        Ok(Self {
            prefix,
            host,
            port,
            username: require(SmtpSetting::User)?,
            password: require(SmtpSetting::Password)?,
            from_name: require(SmtpSetting::FromName)?,
            from_email: require(SmtpSetting::FromEmail)?,
        })
    }

    pub fn prefix(&self) -> Prefix {
        self.prefix
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// 暗黙的 TLS で接続するか
    ///
    /// ポートが [`IMPLICIT_TLS_PORT`] のときに限り `true`。
    pub fn secure(&self) -> bool {
        self.port == IMPLICIT_TLS_PORT
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn from_name(&self) -> &str {
        &self.from_name
    }

    pub fn from_email(&self) -> &str {
        &self.from_email
    }
}

// パスワードをログに出さない
impl fmt::Debug for SmtpIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpIdentity")
            .field("prefix", &self.prefix)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secure", &self.secure())
            .field("username", &self.username)
            .field("password", &"***")
            .field("from_name", &self.from_name)
            .field("from_email", &self.from_email)
            .finish()
    }
}

fn parse_port(raw: &str) -> Result<u16, String> {
    match raw.trim().parse::<u16>() {
        Ok(0) => Err("ポート番号は 1〜65535 である必要があります".to_string()),
        Ok(port) => Ok(port),
        Err(e) => Err(format!("ポート番号として解釈できません: {e}")),
    }
}
