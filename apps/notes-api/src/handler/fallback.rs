//! # フォールバックハンドラ
//!
//! 未対応のメソッドと未定義のパスに 405 を返す。

use axum::http::StatusCode;

pub async fn method_not_allowed() -> (StatusCode, &'static str) {
    (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}
