//! # キー・バリューストア
//!
//! ノートの保存先となる外部ストアのインターフェース。
//!
//! ## 操作
//!
//! | 操作 | 説明 |
//! |-----|------|
//! | `list` | キーをページ単位で列挙する（カーソルが無くなるまで繰り返す） |
//! | `get` | 値を取得する（無ければ `None`） |
//! | `put` | 値を保存する（常に上書き） |
//! | `delete` | キーを削除する（存在しなくても成功） |
//!
//! トランザクションやスナップショットは提供しない。列挙中に書き込みがあれば、
//! 一覧には書き込み前後の状態が混在しうる。

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::InfraError;

/// `list` の入力
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    /// 1 ページあたりの最大件数（ストアによっては目安として扱われる）
    pub limit:  usize,
    /// 前ページの `ListPage::cursor`。最初のページでは `None`
    pub cursor: Option<String>,
}

impl ListOptions {
    /// 最初のページを要求する
    pub fn first(limit: usize) -> Self {
        Self {
            limit,
            cursor: None,
        }
    }

    /// 続きのページを要求する
    pub fn after(limit: usize, cursor: impl Into<String>) -> Self {
        Self {
            limit,
            cursor: Some(cursor.into()),
        }
    }
}

/// 列挙されたキー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEntry {
    pub name:     String,
    /// 最終更新日時。ストアが記録していなければ `None`
    pub modified: Option<DateTime<Utc>>,
}

/// `list` の結果
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListPage {
    pub keys:   Vec<KeyEntry>,
    /// 次ページのカーソル。`None` または空文字列なら続きは無い
    pub cursor: Option<String>,
}

impl ListPage {
    /// 続きのページがあればそのカーソルを返す
    pub fn next_cursor(&self) -> Option<&str> {
        self.cursor.as_deref().filter(|c| !c.is_empty())
    }
}

/// キー・バリューストア
///
/// 実装は Redis を使用する [`RedisKvStore`](crate::redis::RedisKvStore) を参照。
#[async_trait]
pub trait KvStore: Send + Sync {
    /// キーを列挙する
    async fn list(&self, options: ListOptions) -> Result<ListPage, InfraError>;

    /// 値を取得する
    ///
    /// キーが存在しなければ `None`
    async fn get(&self, key: &str) -> Result<Option<String>, InfraError>;

    /// 値を保存する（既存の値は上書き）
    async fn put(&self, key: &str, value: &str) -> Result<(), InfraError>;

    /// キーを削除する
    ///
    /// 存在しないキーを削除しても成功とする。
    async fn delete(&self, key: &str) -> Result<(), InfraError>;
}
