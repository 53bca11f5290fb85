//! # ノートハンドラ（プレーンテキスト）
//!
//! 単一ノートを扱う簡易 API。ボディとレスポンスの形式以外は
//! [`notes`](super::notes) と同じ処理を行う。
//!
//! ## エンドポイント
//!
//! - `GET /api/note?id=...` - ノート本文（存在しなければ空文字列）
//! - `POST /api/note` - ノート保存（`Saved`）
//! - `DELETE /api/note?id=...` - ノート削除（`Deleted`）

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
};

use super::notes::{IdQuery, NoteState, parse_save_input};
use crate::error::{ApiError, StoreOperation};

/// GET /api/note?id=...
#[tracing::instrument(skip_all)]
pub async fn get_note_text(
    State(state): State<Arc<NoteState>>,
    Query(query): Query<IdQuery>,
) -> Result<String, ApiError> {
    state
        .usecase
        .get_note_content(query.id())
        .await
        .map_err(|e| ApiError::new(StoreOperation::Read, e))
}

/// POST /api/note
#[tracing::instrument(skip_all)]
pub async fn save_note_text(
    State(state): State<Arc<NoteState>>,
    body: Bytes,
) -> Result<&'static str, ApiError> {
    state
        .usecase
        .save_note(parse_save_input(&body))
        .await
        .map_err(|e| ApiError::new(StoreOperation::Save, e))?;

    Ok("Saved")
}

/// DELETE /api/note?id=...
#[tracing::instrument(skip_all)]
pub async fn delete_note_text(
    State(state): State<Arc<NoteState>>,
    Query(query): Query<IdQuery>,
) -> Result<&'static str, ApiError> {
    state
        .usecase
        .delete_note(query.id())
        .await
        .map_err(|e| ApiError::new(StoreOperation::Delete, e))?;

    Ok("Deleted")
}
