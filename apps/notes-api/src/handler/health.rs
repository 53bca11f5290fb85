//! # ヘルスチェックハンドラ
//!
//! `/health` は Liveness Check のみ。ストアには接続しない。

use axum::Json;
use easyblog_shared::HealthResponse;

/// Notes API のヘルスチェックエンドポイント
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(env!("CARGO_PKG_VERSION")))
}
