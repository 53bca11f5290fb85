//! # Easy-blog 共有ユーティリティ
//!
//! Notes API と各パッケージで共通利用するレスポンス型とログ基盤を提供する。
//!
//! ## 設計方針
//!
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - axum には依存しない（`IntoResponse` 変換は各アプリの責務）
//! - ログ基盤の依存は `observability` feature でのみ有効化する

pub mod error_response;
pub mod health;
pub mod mutation_response;
pub mod observability;

pub use error_response::ErrorResponse;
pub use health::HealthResponse;
pub use mutation_response::MutationResponse;
