//! # ノート
//!
//! キー・バリューストアに保存される id と本文のペア。
//!
//! ## ストアとの対応
//!
//! | ドメイン | ストア |
//! |---------|-------|
//! | [`NoteId`] | キー |
//! | [`NoteContent`] / 本文 | 値 |
//! | `modified` | キーのメタデータ（無ければ一覧取得時の現在時刻） |
//!
//! id の一意性はストア自体（マップ）が保証する。同じ id への保存は上書きになる。
//!
//! ## 使用例
//!
//! ```rust
//! # fn main() -> Result<(), easyblog_domain::DomainError> {
//! use easyblog_domain::note::{NewNote, NoteContent, NoteId};
//!
//! let note = NewNote::new(NoteId::new("hello")?, NoteContent::new("world")?);
//! assert_eq!(note.id().as_str(), "hello");
//! assert_eq!(note.content().as_str(), "world");
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::DomainError;

/// ノートの識別子（ストアのキー）
///
/// # 不変条件
///
/// - 空文字列ではない
///
/// 前後の空白は除去しない。`" "` も有効な id として扱う。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.is_empty() {
            return Err(DomainError::Validation("id は必須です".to_string()));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for NoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 保存するノート本文（ストアの値）
///
/// # 不変条件
///
/// - 空文字列ではない
///
/// 形式は問わない（任意のテキスト）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteContent(String);

impl NoteContent {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.is_empty() {
            return Err(DomainError::Validation("content は必須です".to_string()));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// 保存リクエスト（検証済み）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    id:      NoteId,
    content: NoteContent,
}

impl NewNote {
    pub fn new(id: NoteId, content: NoteContent) -> Self {
        Self { id, content }
    }

    pub fn id(&self) -> &NoteId {
        &self.id
    }

    pub fn content(&self) -> &NoteContent {
        &self.content
    }

    pub fn into_parts(self) -> (NoteId, NoteContent) {
        (self.id, self.content)
    }
}

/// 一覧で返すノート
///
/// 一覧取得時にキーに対応する値が無かった場合、本文は空文字列になる。
/// そのため本文は [`NoteContent`] ではなく `String` で保持する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    id:       NoteId,
    content:  String,
    modified: DateTime<Utc>,
}

impl Note {
    pub fn new(id: NoteId, content: impl Into<String>, modified: DateTime<Utc>) -> Self {
        Self {
            id,
            content: content.into(),
            modified,
        }
    }

    pub fn id(&self) -> &NoteId {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn modified(&self) -> DateTime<Utc> {
        self.modified
    }
}
