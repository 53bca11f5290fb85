//! # テスト用インメモリストア
//!
//! ユースケース・ハンドラのテストで使う [`KvStore`] 実装。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! easyblog-infra = { workspace = true, features = ["test-utils"] }
//! ```
//!
//! キーの昇順でページを返し、ページ最後のキーをカーソルにする。
//! 障害注入（特定キーの `get` 失敗、ストア全体の停止）に対応する。

use std::{
    collections::{BTreeMap, HashSet},
    ops::Bound,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{InfraError, KeyEntry, KvStore, ListOptions, ListPage};

#[derive(Debug, Clone)]
struct StoredEntry {
    value:    Option<String>,
    modified: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct InMemoryState {
    entries:     BTreeMap<String, StoredEntry>,
    failing_get: HashSet<String>,
    unavailable: bool,
    list_calls:  usize,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryKvStore {
    state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 更新日時を指定して値を入れる（`None` ならメタデータ無し）
    pub fn insert(&self, key: &str, value: &str, modified: Option<DateTime<Utc>>) {
        self.state.lock().unwrap().entries.insert(
            key.to_string(),
            StoredEntry {
                value: Some(value.to_string()),
                modified,
            },
        );
    }

    /// 列挙には現れるが値を持たないキーを入れる
    pub fn insert_dangling_key(&self, key: &str) {
        self.state.lock().unwrap().entries.insert(
            key.to_string(),
            StoredEntry {
                value:    None,
                modified: None,
            },
        );
    }

    /// 指定キーの `get` を失敗させる
    pub fn fail_get_for(&self, key: &str) {
        self.state.lock().unwrap().failing_get.insert(key.to_string());
    }

    /// ストア全体を停止状態にする（全操作がエラーになる）
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.lock().unwrap().unavailable = unavailable;
    }

    /// これまでに `list` が呼ばれた回数
    pub fn list_calls(&self) -> usize {
        self.state.lock().unwrap().list_calls
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, key: &str) -> bool {
        self.state.lock().unwrap().entries.contains_key(key)
    }

    fn ensure_available(state: &InMemoryState) -> Result<(), InfraError> {
        if state.unavailable {
            return Err(InfraError::unexpected("ストアに接続できません"));
        }
        Ok(())
    }
}

#[async_trait]
impl KvStore for InMemoryKvStore {
    async fn list(&self, options: ListOptions) -> Result<ListPage, InfraError> {
        let mut state = self.state.lock().unwrap();
        state.list_calls += 1;
        Self::ensure_available(&state)?;

        let lower = match options.cursor.as_deref() {
            None | Some("") => Bound::Unbounded,
            Some(cursor) => Bound::Excluded(cursor.to_string()),
        };
        let limit = options.limit.max(1);

        let mut range = state.entries.range((lower, Bound::Unbounded));
        let keys: Vec<KeyEntry> = range
            .by_ref()
            .take(limit)
            .map(|(name, entry)| KeyEntry {
                name:     name.clone(),
                modified: entry.modified,
            })
            .collect();
        let has_more = range.next().is_some();

        let cursor = if has_more {
            keys.last().map(|k| k.name.clone())
        } else {
            None
        };

        Ok(ListPage { keys, cursor })
    }

    async fn get(&self, key: &str) -> Result<Option<String>, InfraError> {
        let state = self.state.lock().unwrap();
        Self::ensure_available(&state)?;
        if state.failing_get.contains(key) {
            return Err(InfraError::unexpected(format!("{key} の取得に失敗しました")));
        }
        Ok(state.entries.get(key).and_then(|e| e.value.clone()))
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), InfraError> {
        let mut state = self.state.lock().unwrap();
        Self::ensure_available(&state)?;
        state.entries.insert(
            key.to_string(),
            StoredEntry {
                value:    Some(value.to_string()),
                modified: Some(Utc::now()),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), InfraError> {
        let mut state = self.state.lock().unwrap();
        Self::ensure_available(&state)?;
        state.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tokio_test::{assert_err, assert_ok};

    use super::*;

    fn names(page: &ListPage) -> Vec<&str> {
        page.keys.iter().map(|k| k.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_limitごとにキー順でページを返す() {
        let store = InMemoryKvStore::new();
        for key in ["c", "a", "e", "b", "d"] {
            store.insert(key, "v", None);
        }

        let first = store.list(ListOptions::first(2)).await.unwrap();
        assert_eq!(names(&first), vec!["a", "b"]);
        assert_eq!(first.cursor.as_deref(), Some("b"));

        let second = store.list(ListOptions::after(2, "b")).await.unwrap();
        assert_eq!(names(&second), vec!["c", "d"]);

        let last = store.list(ListOptions::after(2, "d")).await.unwrap();
        assert_eq!(names(&last), vec!["e"]);
        assert_eq!(last.cursor, None);
        assert_eq!(store.list_calls(), 3);
    }

    #[tokio::test]
    async fn test_ちょうどlimit件で終わる場合はカーソルを返さない() {
        let store = InMemoryKvStore::new();
        store.insert("a", "1", None);
        store.insert("b", "2", None);

        let page = store.list(ListOptions::first(2)).await.unwrap();

        assert_eq!(names(&page), vec!["a", "b"]);
        assert_eq!(page.cursor, None);
    }

    #[tokio::test]
    async fn test_putで更新日時が記録される() {
        let store = InMemoryKvStore::new();
        let before = Utc::now();

        assert_ok!(store.put("hello", "world").await);

        let page = store.list(ListOptions::first(10)).await.unwrap();
        let modified = page.keys[0].modified.expect("更新日時が記録されること");
        assert!(modified >= before);
        assert_eq!(store.get("hello").await.unwrap().as_deref(), Some("world"));
    }

    #[tokio::test]
    async fn test_存在しないキーの削除は成功する() {
        let store = InMemoryKvStore::new();

        assert_ok!(store.delete("missing").await);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_値を持たないキーはgetでnoneを返す() {
        let store = InMemoryKvStore::new();
        store.insert_dangling_key("ghost");

        assert!(store.contains("ghost"));
        assert_eq!(store.get("ghost").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_障害注入したキーのgetだけが失敗する() {
        let store = InMemoryKvStore::new();
        store.insert("ok", "1", None);
        store.insert("broken", "2", None);
        store.fail_get_for("broken");

        assert_err!(store.get("broken").await);
        assert_ok!(store.get("ok").await);
    }

    #[tokio::test]
    async fn test_停止中は全操作が失敗する() {
        let store = InMemoryKvStore::new();
        store.set_unavailable(true);

        assert_err!(store.list(ListOptions::first(10)).await);
        assert_err!(store.get("a").await);
        assert_err!(store.put("a", "1").await);
        assert_err!(store.delete("a").await);
        assert_eq!(store.len(), 0);
    }
}
