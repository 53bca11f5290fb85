//! # ユースケース層
//!
//! ノート操作のビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: ストアと時刻プロバイダを `Arc<dyn Trait>` で外部から注入
//! - **薄いハンドラ**: `/api/notes` と `/api/note` はレスポンス形式だけが異なり、
//!   処理はすべてこのユースケースを共有する

pub mod note;

pub use note::{NoteListing, NoteUseCaseImpl, SaveNoteInput, SkippedNote};
