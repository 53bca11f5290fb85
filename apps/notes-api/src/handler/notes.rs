//! # ノートハンドラ（JSON）
//!
//! ## エンドポイント
//!
//! - `GET /api/notes` - ノート一覧
//! - `POST /api/notes` - ノート保存
//! - `DELETE /api/notes?id=...` - ノート削除

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::HeaderValue,
    response::{IntoResponse, Response},
};
use chrono::SecondsFormat;
use easyblog_domain::note::Note;
use easyblog_shared::MutationResponse;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::{ApiError, StoreOperation},
    usecase::{NoteUseCaseImpl, SaveNoteInput},
};

/// 一覧から除外したキーの件数を返すレスポンスヘッダー
pub const SKIPPED_HEADER: &str = "x-notes-skipped";

/// ノート API の共有状態
pub struct NoteState {
    pub usecase: NoteUseCaseImpl,
}

// --- リクエスト/レスポンス型 ---

/// `id` クエリパラメータ
///
/// クエリ文字列をキーと値の組の列として受け取り、最初の `id` だけを使う。
/// `id` が複数あってもリジェクトしない。
#[derive(Debug, Default, Deserialize)]
#[serde(from = "Vec<(String, String)>")]
pub struct IdQuery {
    pub id: Option<String>,
}

impl From<Vec<(String, String)>> for IdQuery {
    fn from(pairs: Vec<(String, String)>) -> Self {
        let id = pairs
            .into_iter()
            .find_map(|(key, value)| (key == "id").then_some(value));
        Self { id }
    }
}

impl IdQuery {
    /// 未指定は空文字列として扱う（ユースケースで `Missing id` になる）
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }
}

/// ノート DTO
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct NoteDto {
    pub id:       String,
    pub content:  String,
    /// ISO 8601（UTC、ミリ秒精度）
    pub modified: String,
}

impl From<&Note> for NoteDto {
    fn from(note: &Note) -> Self {
        Self {
            id:       note.id().as_str().to_string(),
            content:  note.content().to_string(),
            modified: note.modified().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// 保存リクエストのボディを解釈する
///
/// JSON として読めないボディや、文字列でない `id` / `content` は
/// 「フィールドなし」として扱う。
pub(crate) fn parse_save_input(body: &[u8]) -> SaveNoteInput {
    let Ok(value) = serde_json::from_slice::<Value>(body) else {
        return SaveNoteInput::default();
    };
    let field = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_string);
    SaveNoteInput {
        id:      field("id"),
        content: field("content"),
    }
}

// --- ハンドラ ---

/// GET /api/notes
///
/// 全ノートを取得する。読み取りに失敗したキーは除外し、
/// その件数を `X-Notes-Skipped` ヘッダーで返す。
#[tracing::instrument(skip_all)]
pub async fn list_notes(State(state): State<Arc<NoteState>>) -> Result<Response, ApiError> {
    let listing = state
        .usecase
        .list_notes()
        .await
        .map_err(|e| ApiError::new(StoreOperation::List, e))?;

    let items: Vec<NoteDto> = listing.notes.iter().map(NoteDto::from).collect();

    let mut response = Json(items).into_response();
    if !listing.skipped.is_empty() {
        response
            .headers_mut()
            .insert(SKIPPED_HEADER, HeaderValue::from(listing.skipped.len()));
    }
    Ok(response)
}

/// POST /api/notes
///
/// ## レスポンス
///
/// - `200 OK`: `{"success":true,"message":"Note saved"}`
/// - `400 Bad Request`: `Missing id or content`
#[tracing::instrument(skip_all)]
pub async fn save_note(
    State(state): State<Arc<NoteState>>,
    body: Bytes,
) -> Result<Json<MutationResponse>, ApiError> {
    state
        .usecase
        .save_note(parse_save_input(&body))
        .await
        .map_err(|e| ApiError::new(StoreOperation::Save, e))?;

    Ok(Json(MutationResponse::ok("Note saved")))
}

/// DELETE /api/notes?id=...
///
/// ## レスポンス
///
/// - `200 OK`: `{"success":true,"message":"Note deleted"}`
/// - `400 Bad Request`: `Missing id`
#[tracing::instrument(skip_all)]
pub async fn delete_note(
    State(state): State<Arc<NoteState>>,
    Query(query): Query<IdQuery>,
) -> Result<Json<MutationResponse>, ApiError> {
    state
        .usecase
        .delete_note(query.id())
        .await
        .map_err(|e| ApiError::new(StoreOperation::Delete, e))?;

    Ok(Json(MutationResponse::ok("Note deleted")))
}

#[cfg(test)]
mod tests {
    use axum::http::Uri;
    use chrono::{TimeZone, Utc};
    use easyblog_domain::note::NoteId;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_dtoの更新日時はミリ秒精度のutc() {
        let modified = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let note = Note::new(NoteId::new("hello").unwrap(), "world", modified);

        assert_eq!(
            NoteDto::from(&note),
            NoteDto {
                id:       "hello".to_string(),
                content:  "world".to_string(),
                modified: "2026-03-01T12:00:00.000Z".to_string(),
            }
        );
    }

    #[test]
    fn test_保存ボディからidとcontentを取り出す() {
        let input = parse_save_input(br#"{"id":"hello","content":"world","extra":1}"#);

        assert_eq!(input.id.as_deref(), Some("hello"));
        assert_eq!(input.content.as_deref(), Some("world"));
    }

    #[rstest]
    #[case::jsonでない(b"id=hello".as_slice())]
    #[case::空のボディ(b"".as_slice())]
    #[case::配列(br#"["hello","world"]"#.as_slice())]
    #[case::文字列でない値(br#"{"id":1,"content":true}"#.as_slice())]
    fn test_解釈できないボディはフィールドなしになる(#[case] body: &[u8]) {
        let input = parse_save_input(body);

        assert_eq!(input.id, None);
        assert_eq!(input.content, None);
    }

    #[test]
    fn test_idクエリ未指定は空文字列() {
        assert_eq!(IdQuery::default().id(), "");
    }

    #[rstest]
    #[case::単一("id=hello", "hello")]
    #[case::重複は最初の値("id=a&id=b", "a")]
    #[case::他のパラメータと混在("x=1&id=note%201", "note 1")]
    #[case::最初が空("id=&id=b", "")]
    #[case::idなし("x=1", "")]
    #[case::空文字列("", "")]
    fn test_idクエリは最初のidを使う(#[case] query: &str, #[case] expected: &str) {
        let Query(query) = Query::<IdQuery>::try_from_uri(
            &format!("/api/note?{query}").parse::<Uri>().unwrap(),
        )
        .unwrap();

        assert_eq!(query.id(), expected);
    }
}
