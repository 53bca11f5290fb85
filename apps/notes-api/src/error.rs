//! # Notes API エラーハンドリング
//!
//! ユースケースのエラー定義と、axum レスポンスへの変換。
//!
//! ## エラーと HTTP ステータスの対応
//!
//! | エラー | HTTP ステータス | ボディ |
//! |-------|----------------|-------|
//! | `Validation` | 400 Bad Request | プレーンテキスト（例: `Missing id`） |
//! | `StoreUnbound` | 500 Internal Server Error | `{ "error", "details" }` |
//! | `Store` | 500 Internal Server Error | `{ "error", "details" }` |
//!
//! 存在しないノートの読み取りはエラーではなく空文字列として扱う。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use easyblog_infra::InfraError;
use easyblog_shared::ErrorResponse;
use thiserror::Error;

/// ノート操作で発生するエラー
#[derive(Debug, Error)]
pub enum NotesError {
    /// 必須フィールドの欠落（メッセージはそのままレスポンスボディになる）
    #[error("{0}")]
    Validation(String),

    /// ストアが注入されていない
    #[error("KV namespace '{0}' not bound")]
    StoreUnbound(String),

    /// ストア操作の失敗
    #[error(transparent)]
    Store(#[from] InfraError),
}

/// 失敗したストア操作の種類
///
/// 500 レスポンスの `error` フィールドを決める。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    List,
    Read,
    Save,
    Delete,
}

impl StoreOperation {
    pub fn failure_title(self) -> &'static str {
        match self {
            StoreOperation::List => "Failed to read KV",
            StoreOperation::Read => "Read failed",
            StoreOperation::Save => "Save failed",
            StoreOperation::Delete => "Delete failed",
        }
    }
}

impl std::fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StoreOperation::List => "list",
            StoreOperation::Read => "read",
            StoreOperation::Save => "save",
            StoreOperation::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// ハンドラが返すエラー
///
/// `IntoResponse` を実装しているため、axum が自動的に HTTP レスポンスに変換する。
#[derive(Debug, Error)]
#[error("{operation} に失敗しました: {source}")]
pub struct ApiError {
    pub operation: StoreOperation,
    #[source]
    pub source:    NotesError,
}

impl ApiError {
    pub fn new(operation: StoreOperation, source: NotesError) -> Self {
        Self { operation, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.source {
            NotesError::Validation(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            source => {
                tracing::error!(
                    error.category = "infrastructure",
                    operation = %self.operation,
                    error = ?source,
                    "ストア操作に失敗しました: {}",
                    source
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(
                        self.operation.failure_title(),
                        source.to_string(),
                    )),
                )
                    .into_response()
            }
        }
    }
}
