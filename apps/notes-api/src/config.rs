//! # Notes API 設定
//!
//! 環境変数から Notes API サーバーの設定を読み込む。

use std::env;

use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8787;
const DEFAULT_NAMESPACE: &str = "NOTES";

/// 設定読み込みのエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("NOTES_API_PORT は有効なポート番号である必要があります: {value}")]
    InvalidPort { value: String },
}

/// Notes API サーバーの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesApiConfig {
    /// バインドアドレス
    pub host:      String,
    /// ポート番号
    pub port:      u16,
    /// Redis 接続 URL（未設定ならストア未バインドで起動する）
    pub redis_url: Option<String>,
    /// ストアの名前空間（Redis キーの接頭辞）
    pub namespace: String,
}

impl NotesApiConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// 任意の変数ソースから設定を読み込む
    ///
    /// 空文字列は未設定として扱う。
    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| var(name).filter(|v| !v.is_empty());

        let port = match var("NOTES_API_PORT") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidPort { value })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: var("NOTES_API_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            redis_url: var("REDIS_URL"),
            namespace: var("NOTES_NAMESPACE").unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
        })
    }
}
