//! # Redis ストア
//!
//! Redis をノートの保存先として使う [`KvStore`] 実装。
//!
//! ## Redis キー設計
//!
//! | キー | 型 | 値 |
//! |-----|----|----|
//! | `{namespace}:note:{name}` | String | ノート本文 |
//! | `{namespace}:modified` | Hash | `name` → 最終更新日時（Unix ミリ秒） |
//!
//! 値と更新日時は `MULTI` / `EXEC` で同時に書き込む。
//!
//! ## 列挙
//!
//! `SCAN cursor MATCH {namespace}:note:* COUNT limit` でキーを列挙し、
//! 同じページの更新日時を `HMGET` でまとめて取得する。
//! Redis のカーソル `0` は「続きなし」を表す。
//!
//! `SCAN` は同じキーを複数回返すことがあり、`COUNT` は目安でしかない。
//! 重複の除去は呼び出し側（一覧ユースケース）が行う。
//!
//! ## ConnectionManager
//!
//! 自動再接続付きの接続マネージャを使う。Clone が安価なので、
//! 各操作でクローンしてコマンドを発行する。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::{AsyncCommands, Client, aio::ConnectionManager};

use crate::{InfraError, KeyEntry, KvStore, ListOptions, ListPage};

/// Redis 接続マネージャを作成する
///
/// # 引数
///
/// * `redis_url` - `redis://[[username:]password@]host[:port][/database]`
///   （TLS は `rediss://`）
pub async fn create_connection_manager(
    redis_url: &str,
) -> Result<ConnectionManager, redis::RedisError> {
    let client = Client::open(redis_url)?;
    ConnectionManager::new(client).await
}

/// Redis を使用したキー・バリューストア
#[derive(Clone)]
pub struct RedisKvStore {
    conn:      ConnectionManager,
    namespace: String,
}

impl RedisKvStore {
    /// Redis に接続してストアを作成する
    ///
    /// - `namespace`: キーの接頭辞（例: `NOTES`）
    pub async fn new(redis_url: &str, namespace: impl Into<String>) -> Result<Self, InfraError> {
        let conn = create_connection_manager(redis_url).await?;
        Ok(Self::with_connection(conn, namespace))
    }

    /// 既存の接続マネージャからストアを作成する
    pub fn with_connection(conn: ConnectionManager, namespace: impl Into<String>) -> Self {
        Self {
            conn,
            namespace: namespace.into(),
        }
    }

    fn value_key(&self, name: &str) -> String {
        value_key(&self.namespace, name)
    }

    fn modified_key(&self) -> String {
        format!("{}:modified", self.namespace)
    }
}

fn value_prefix(namespace: &str) -> String {
    format!("{namespace}:note:")
}

fn value_key(namespace: &str, name: &str) -> String {
    format!("{}{name}", value_prefix(namespace))
}

/// `SCAN MATCH` 用のパターン
///
/// namespace に glob の特殊文字が含まれていてもリテラルとして一致させる。
fn scan_pattern(namespace: &str) -> String {
    let mut pattern = String::new();
    for c in value_prefix(namespace).chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('*');
    pattern
}

fn parse_cursor(cursor: Option<&str>) -> Result<u64, InfraError> {
    match cursor {
        None | Some("") => Ok(0),
        Some(c) => c
            .parse()
            .map_err(|_| InfraError::invalid_input(format!("不正なカーソルです: {c}"))),
    }
}

#[async_trait]
impl KvStore for RedisKvStore {
    #[tracing::instrument(skip_all, fields(namespace = %self.namespace))]
    async fn list(&self, options: ListOptions) -> Result<ListPage, InfraError> {
        let cursor = parse_cursor(options.cursor.as_deref())?;
        let prefix = value_prefix(&self.namespace);
        let mut conn = self.conn.clone();

        let (next_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
            .arg(cursor)
            .arg("MATCH")
            .arg(scan_pattern(&self.namespace))
            .arg("COUNT")
            .arg(options.limit.max(1))
            .query_async(&mut conn)
            .await?;

        let names: Vec<String> = keys
            .iter()
            .filter_map(|key| key.strip_prefix(&prefix))
            .map(str::to_string)
            .collect();

        let modified: Vec<Option<i64>> = if names.is_empty() {
            Vec::new()
        } else {
            redis::cmd("HMGET")
                .arg(self.modified_key())
                .arg(&names)
                .query_async(&mut conn)
                .await?
        };

        let keys = names
            .into_iter()
            .zip(modified)
            .map(|(name, millis)| KeyEntry {
                name,
                modified: millis.and_then(DateTime::<Utc>::from_timestamp_millis),
            })
            .collect();

        Ok(ListPage {
            keys,
            cursor: (next_cursor != 0).then(|| next_cursor.to_string()),
        })
    }

    async fn get(&self, key: &str) -> Result<Option<String>, InfraError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(self.value_key(key)).await?;
        Ok(value)
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), InfraError> {
        let mut conn = self.conn.clone();
        let _: () = redis::pipe()
            .atomic()
            .set(self.value_key(key), value)
            .ignore()
            .hset(self.modified_key(), key, Utc::now().timestamp_millis())
            .ignore()
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), InfraError> {
        let mut conn = self.conn.clone();
        let _: () = redis::pipe()
            .atomic()
            .del(self.value_key(key))
            .ignore()
            .hdel(self.modified_key(), key)
            .ignore()
            .query_async(&mut conn)
            .await?;
        Ok(())
    }
}
