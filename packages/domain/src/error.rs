//! # ドメイン層エラー定義
//!
//! ノートの不変条件違反を表現するエラー型。
//! API 層でこのエラーを受け取り、400 Bad Request に変換する。
//!
//! ## 使用例
//!
//! ```rust
//! use easyblog_domain::{DomainError, note::NoteId};
//!
//! let err = NoteId::new("").unwrap_err();
//! assert!(matches!(err, DomainError::Validation(_)));
//! ```

use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// 必須フィールドが空の場合に使用する。
    #[error("バリデーションエラー: {0}")]
    Validation(String),
}
