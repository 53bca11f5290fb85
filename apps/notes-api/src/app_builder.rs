//! # Notes API アプリケーション構築
//!
//! ルーター定義とレイヤー構成を担当する。
//! `main.rs` はインフラ初期化とサーバー起動に集中する。

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::get,
};
use easyblog_shared::observability::{MakeRequestUuidV7, make_request_span};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    handler::{
        NoteState,
        delete_note,
        delete_note_text,
        get_note_text,
        health_check,
        list_notes,
        method_not_allowed,
        save_note,
        save_note_text,
    },
    middleware::no_cache,
};

/// リクエストボディの上限（ストアの 1 値あたりの上限に合わせる）
pub const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// ルーターを構築する
///
/// 定義済みパスへの未対応メソッドと、未定義のパスはどちらも 405 を返す。
/// axum の `get` は HEAD にも応答するため、HEAD は明示的に 405 にする。
pub fn build_app(state: Arc<NoteState>) -> Router {
    Router::new()
        .route(
            "/health",
            get(health_check)
                .head(method_not_allowed)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/notes",
            get(list_notes)
                .head(method_not_allowed)
                .post(save_note)
                .delete(delete_note)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/note",
            get(get_note_text)
                .head(method_not_allowed)
                .post(save_note_text)
                .delete(delete_note_text)
                .fallback(method_not_allowed),
        )
        .fallback(method_not_allowed)
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(from_fn(no_cache))
        // Request ID レイヤー（下に書いたものが外側）
        // 1. SetRequestIdLayer（最外）: UUID v7 を生成（またはクライアント提供値を使用）
        // 2. TraceLayer: スパンに request_id を含める
        // 3. PropagateRequestIdLayer: レスポンスヘッダーに X-Request-Id をコピー
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
