//! ノート管理ユースケース

use std::{collections::HashSet, sync::Arc};

use easyblog_domain::{
    clock::Clock,
    note::{NewNote, Note, NoteContent, NoteId},
};
use easyblog_infra::{KvStore, ListOptions};

use crate::error::NotesError;

/// 一覧取得時の 1 ページあたりのキー数
pub const LIST_PAGE_SIZE: usize = 1000;

/// id が無いときのエラーメッセージ
pub const MISSING_ID: &str = "Missing id";

/// id または content が無いときのエラーメッセージ
pub const MISSING_ID_OR_CONTENT: &str = "Missing id or content";

/// ノート保存の入力
///
/// JSON ボディから取り出した値。文字列でなかったフィールドは `None` になる。
#[derive(Debug, Default)]
pub struct SaveNoteInput {
    pub id:      Option<String>,
    pub content: Option<String>,
}

/// 一覧から除外したキー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedNote {
    pub id:     String,
    pub reason: String,
}

/// 一覧取得の結果
///
/// 値の取得に失敗したキーは `notes` に含めず `skipped` に記録する。
#[derive(Debug, Default)]
pub struct NoteListing {
    pub notes:   Vec<Note>,
    pub skipped: Vec<SkippedNote>,
}

/// ノート管理ユースケース
pub struct NoteUseCaseImpl {
    store:     Option<Arc<dyn KvStore>>,
    binding:   String,
    clock:     Arc<dyn Clock>,
    page_size: usize,
}

impl NoteUseCaseImpl {
    /// - `store`: `None` ならすべての操作が [`NotesError::StoreUnbound`] になる
    /// - `binding`: エラーメッセージに出すストア名（例: `NOTES`）
    pub fn new(
        store: Option<Arc<dyn KvStore>>,
        binding: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            binding: binding.into(),
            clock,
            page_size: LIST_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    fn store(&self) -> Result<&dyn KvStore, NotesError> {
        self.store
            .as_deref()
            .ok_or_else(|| NotesError::StoreUnbound(self.binding.clone()))
    }

    /// 全ノートを取得する
    ///
    /// 1. カーソルが尽きるまでキーをページ単位で列挙
    /// 2. 空の名前と重複したキーを除外
    /// 3. キーごとに値を取得（失敗したキーは `skipped` へ）
    ///
    /// 値が無いキーは本文を空文字列、更新日時が無いキーは現在時刻にする。
    #[tracing::instrument(skip_all)]
    pub async fn list_notes(&self) -> Result<NoteListing, NotesError> {
        let store = self.store()?;

        let mut keys = Vec::new();
        let mut seen = HashSet::new();
        let mut options = ListOptions::first(self.page_size);
        loop {
            let page = store.list(options).await?;
            for key in &page.keys {
                let Ok(id) = NoteId::new(key.name.as_str()) else {
                    continue;
                };
                if seen.insert(id.clone()) {
                    keys.push((id, key.modified));
                }
            }
            match page.next_cursor() {
                Some(cursor) => options = ListOptions::after(self.page_size, cursor),
                None => break,
            }
        }

        let mut listing = NoteListing::default();
        for (id, modified) in keys {
            match store.get(id.as_str()).await {
                Ok(value) => {
                    let modified = modified.unwrap_or_else(|| self.clock.now());
                    listing
                        .notes
                        .push(Note::new(id, value.unwrap_or_default(), modified));
                }
                Err(e) => {
                    tracing::warn!(note_id = %id, error = %e, "ノートの読み取りに失敗したため一覧から除外します");
                    listing.skipped.push(SkippedNote {
                        id:     id.into_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::debug!(
            notes = listing.notes.len(),
            skipped = listing.skipped.len(),
            "ノート一覧を取得しました"
        );
        Ok(listing)
    }

    /// ノート本文を取得する（存在しなければ空文字列）
    #[tracing::instrument(skip_all, fields(note_id = %id))]
    pub async fn get_note_content(&self, id: &str) -> Result<String, NotesError> {
        let id = NoteId::new(id).map_err(|_| NotesError::Validation(MISSING_ID.to_string()))?;
        let store = self.store()?;

        let value = store.get(id.as_str()).await?;
        Ok(value.unwrap_or_default())
    }

    /// ノートを保存する（同じ id は上書き）
    ///
    /// id と content のどちらかが無い・空なら、ストアに触れずにエラーを返す。
    #[tracing::instrument(skip_all)]
    pub async fn save_note(&self, input: SaveNoteInput) -> Result<NoteId, NotesError> {
        let note = Self::validate_new_note(input)?;
        let store = self.store()?;

        store
            .put(note.id().as_str(), note.content().as_str())
            .await?;

        let (id, _) = note.into_parts();
        tracing::info!(note_id = %id, "ノートを保存しました");
        Ok(id)
    }

    /// ノートを削除する（存在しなくても成功）
    #[tracing::instrument(skip_all, fields(note_id = %id))]
    pub async fn delete_note(&self, id: &str) -> Result<NoteId, NotesError> {
        let id = NoteId::new(id).map_err(|_| NotesError::Validation(MISSING_ID.to_string()))?;
        let store = self.store()?;

        store.delete(id.as_str()).await?;

        tracing::info!("ノートを削除しました");
        Ok(id)
    }

    fn validate_new_note(input: SaveNoteInput) -> Result<NewNote, NotesError> {
        let missing = || NotesError::Validation(MISSING_ID_OR_CONTENT.to_string());
        let id = input
            .id
            .ok_or_else(missing)
            .and_then(|id| NoteId::new(id).map_err(|_| missing()))?;
        let content = input
            .content
            .ok_or_else(missing)
            .and_then(|c| NoteContent::new(c).map_err(|_| missing()))?;
        Ok(NewNote::new(id, content))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use easyblog_domain::clock::FixedClock;
    use easyblog_infra::{InfraError, KeyEntry, ListPage, mock::InMemoryKvStore};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tokio_test::assert_ok;

    use super::*;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn sut(store: &InMemoryKvStore) -> NoteUseCaseImpl {
        NoteUseCaseImpl::new(
            Some(Arc::new(store.clone())),
            "NOTES",
            Arc::new(FixedClock::new(fixed_now())),
        )
    }

    fn input(id: Option<&str>, content: Option<&str>) -> SaveNoteInput {
        SaveNoteInput {
            id:      id.map(str::to_string),
            content: content.map(str::to_string),
        }
    }

    fn ids(listing: &NoteListing) -> Vec<&str> {
        listing.notes.iter().map(|n| n.id().as_str()).collect()
    }

    #[tokio::test]
    async fn test_保存したノートを取得できる() {
        let store = InMemoryKvStore::new();
        let sut = sut(&store);

        let id = sut.save_note(input(Some("hello"), Some("world"))).await.unwrap();

        assert_eq!(id.as_str(), "hello");
        assert_eq!(sut.get_note_content("hello").await.unwrap(), "world");
    }

    #[tokio::test]
    async fn test_同じidへの保存は上書きになる() {
        let store = InMemoryKvStore::new();
        let sut = sut(&store);

        sut.save_note(input(Some("a"), Some("1"))).await.unwrap();
        sut.save_note(input(Some("a"), Some("2"))).await.unwrap();

        assert_eq!(sut.get_note_content("a").await.unwrap(), "2");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_存在しないノートは空文字列を返す() {
        let store = InMemoryKvStore::new();

        let content = sut(&store).get_note_content("missing").await.unwrap();

        assert_eq!(content, "");
    }

    #[tokio::test]
    async fn test_削除は冪等で削除後は一覧に現れない() {
        let store = InMemoryKvStore::new();
        store.insert("hello", "world", None);
        let sut = sut(&store);

        assert_ok!(sut.delete_note("hello").await);
        assert_ok!(sut.delete_note("hello").await);

        assert!(ids(&sut.list_notes().await.unwrap()).is_empty());
        assert_eq!(sut.get_note_content("hello").await.unwrap(), "");
    }

    #[rstest]
    #[case::idなし(None, Some("world"))]
    #[case::contentなし(Some("hello"), None)]
    #[case::空のid(Some(""), Some("world"))]
    #[case::空のcontent(Some("hello"), Some(""))]
    #[case::両方なし(None, None)]
    #[tokio::test]
    async fn test_必須フィールドが無い保存はストアを変更しない(
        #[case] id: Option<&str>,
        #[case] content: Option<&str>,
    ) {
        let store = InMemoryKvStore::new();

        let result = sut(&store).save_note(input(id, content)).await;

        assert!(matches!(
            result,
            Err(NotesError::Validation(ref message)) if message == MISSING_ID_OR_CONTENT
        ));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_空のidでの取得と削除はバリデーションエラー() {
        let store = InMemoryKvStore::new();
        store.insert("keep", "me", None);
        let sut = sut(&store);

        let get = sut.get_note_content("").await;
        let delete = sut.delete_note("").await;

        assert!(matches!(get, Err(NotesError::Validation(ref m)) if m == MISSING_ID));
        assert!(matches!(delete, Err(NotesError::Validation(ref m)) if m == MISSING_ID));
        assert!(store.contains("keep"));
    }

    #[tokio::test]
    async fn test_空白だけのidも有効なidとして扱う() {
        let store = InMemoryKvStore::new();
        let sut = sut(&store);

        sut.save_note(input(Some(" "), Some("x"))).await.unwrap();

        assert_eq!(sut.get_note_content(" ").await.unwrap(), "x");
    }

    #[tokio::test]
    async fn test_一覧は全ページを辿る() {
        let store = InMemoryKvStore::new();
        for i in 0..2500 {
            store.insert(&format!("note-{i:04}"), "body", None);
        }

        let listing = sut(&store).list_notes().await.unwrap();

        assert_eq!(listing.notes.len(), 2500);
        assert_eq!(store.list_calls(), 3);
        assert!(listing.skipped.is_empty());
    }

    #[tokio::test]
    async fn test_一覧はページサイズを変更できる() {
        let store = InMemoryKvStore::new();
        for key in ["a", "b", "c", "d", "e"] {
            store.insert(key, key, None);
        }

        let listing = sut(&store).with_page_size(2).list_notes().await.unwrap();

        assert_eq!(ids(&listing), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(store.list_calls(), 3);
    }

    /// 同じキーを複数ページで返すストア（Redis の SCAN と同じ振る舞い）
    ///
    /// - 1 ページ目: `a`, `b`（カーソル `1`）
    /// - 2 ページ目: `b`, `c`（終端）
    #[derive(Default)]
    struct OverlappingPagesStore {
        get_calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl KvStore for OverlappingPagesStore {
        async fn list(&self, options: ListOptions) -> Result<ListPage, InfraError> {
            let (names, cursor) = match options.cursor.as_deref() {
                None => (["a", "b"], Some("1".to_string())),
                Some("1") => (["b", "c"], None),
                Some(other) => {
                    return Err(InfraError::invalid_input(format!("不明なカーソル: {other}")));
                }
            };
            let keys = names
                .iter()
                .map(|name| KeyEntry {
                    name:     name.to_string(),
                    modified: None,
                })
                .collect();
            Ok(ListPage { keys, cursor })
        }

        async fn get(&self, key: &str) -> Result<Option<String>, InfraError> {
            self.get_calls.lock().unwrap().push(key.to_string());
            Ok(Some(format!("{key}-body")))
        }

        async fn put(&self, _key: &str, _value: &str) -> Result<(), InfraError> {
            Ok(())
        }

        async fn delete(&self, _key: &str) -> Result<(), InfraError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_一覧はページをまたいで重複したキーを1件にまとめる() {
        let store = Arc::new(OverlappingPagesStore::default());
        let kv_store: Arc<dyn KvStore> = store.clone();
        let sut = NoteUseCaseImpl::new(
            Some(kv_store),
            "NOTES",
            Arc::new(FixedClock::new(fixed_now())),
        )
        .with_page_size(2);

        let listing = sut.list_notes().await.unwrap();

        assert_eq!(ids(&listing), vec!["a", "b", "c"]);
        assert_eq!(listing.notes[1].content(), "b-body");
        assert_eq!(*store.get_calls.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_一覧は更新日時が無ければ現在時刻を使う() {
        let store = InMemoryKvStore::new();
        let recorded = Utc.with_ymd_and_hms(2025, 12, 24, 9, 30, 0).unwrap();
        store.insert("with-meta", "1", Some(recorded));
        store.insert("without-meta", "2", None);

        let listing = sut(&store).list_notes().await.unwrap();

        assert_eq!(
            listing.notes,
            vec![
                Note::new(NoteId::new("with-meta").unwrap(), "1", recorded),
                Note::new(NoteId::new("without-meta").unwrap(), "2", fixed_now()),
            ]
        );
    }

    #[tokio::test]
    async fn test_一覧で値の無いキーは本文が空文字列になる() {
        let store = InMemoryKvStore::new();
        store.insert_dangling_key("ghost");

        let listing = sut(&store).list_notes().await.unwrap();

        assert_eq!(ids(&listing), vec!["ghost"]);
        assert_eq!(listing.notes[0].content(), "");
    }

    #[tokio::test]
    async fn test_一覧は空の名前のキーを除外する() {
        let store = InMemoryKvStore::new();
        store.insert("", "orphan", None);
        store.insert("real", "body", None);

        let listing = sut(&store).list_notes().await.unwrap();

        assert_eq!(ids(&listing), vec!["real"]);
    }

    #[tokio::test]
    async fn test_一覧で読み取りに失敗したキーだけを除外する() {
        let store = InMemoryKvStore::new();
        store.insert("ok", "1", None);
        store.insert("broken", "2", None);
        store.fail_get_for("broken");

        let listing = sut(&store).list_notes().await.unwrap();

        assert_eq!(ids(&listing), vec!["ok"]);
        assert_eq!(listing.skipped.len(), 1);
        assert_eq!(listing.skipped[0].id, "broken");
    }

    #[tokio::test]
    async fn test_ストア停止中の一覧はストアエラー() {
        let store = InMemoryKvStore::new();
        store.set_unavailable(true);

        let result = sut(&store).list_notes().await;

        assert!(matches!(result, Err(NotesError::Store(_))));
    }

    #[tokio::test]
    async fn test_ストア未バインドは全操作がエラー() {
        let sut = NoteUseCaseImpl::new(None, "NOTES", Arc::new(FixedClock::new(fixed_now())));

        let list = sut.list_notes().await.unwrap_err();
        let get = sut.get_note_content("a").await.unwrap_err();
        let save = sut.save_note(input(Some("a"), Some("b"))).await.unwrap_err();
        let delete = sut.delete_note("a").await.unwrap_err();

        for err in [list, get, save, delete] {
            assert_eq!(err.to_string(), "KV namespace 'NOTES' not bound");
        }
    }

    #[tokio::test]
    async fn test_ストア未バインドでもバリデーションを先に行う() {
        let sut = NoteUseCaseImpl::new(None, "NOTES", Arc::new(FixedClock::new(fixed_now())));

        let result = sut.save_note(input(None, Some("b"))).await;

        assert!(matches!(result, Err(NotesError::Validation(_))));
    }
}
