//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュール（この `handler.rs`）で re-export し、フラットな API を提供
//! - `notes` は JSON、`note` はプレーンテキストで応答する。処理は同じユースケースを使う

pub mod fallback;
pub mod health;
pub mod note;
pub mod notes;

pub use fallback::method_not_allowed;
pub use health::health_check;
pub use note::{delete_note_text, get_note_text, save_note_text};
pub use notes::{IdQuery, NoteDto, NoteState, SKIPPED_HEADER, delete_note, list_notes, save_note};
