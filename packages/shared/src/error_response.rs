//! # エラーレスポンス
//!
//! ストア障害時（500）に返す JSON ボディ `{ "error": ..., "details": ... }`。
//!
//! フロントエンドのページは `data.details || data.error` を表示するため、
//! `error` には操作ごとの固定タイトル、`details` には原因のメッセージを入れる。

use serde::{Deserialize, Serialize};

/// ストア操作失敗時のエラーレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 失敗した操作の概要（例: `"Save failed"`）
    pub error:   String,
    /// 原因の詳細
    pub details: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error:   error.into(),
            details: details.into(),
        }
    }
}
