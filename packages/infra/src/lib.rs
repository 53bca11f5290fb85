//! # Easy-blog インフラ層
//!
//! ノートを保存するキー・バリューストアとの接続・通信を担当する。
//!
//! ## 設計方針
//!
//! API 層は [`KvStore`] トレイトだけに依存し、具体的なストアは起動時に注入する。
//! ストアはキーも値も文字列として扱い、ノートの意味（id / 本文）は知らない。
//!
//! ## モジュール構成
//!
//! - [`kv_store`] - ストアのインターフェースとページング型
//! - [`redis`] - Redis を使ったストア実装
//! - [`error`] - インフラ層エラー定義
//! - `mock` - テスト用インメモリストア（`test-utils` feature）
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use easyblog_infra::{KvStore, ListOptions, redis::RedisKvStore};
//!
//! async fn example() -> Result<(), easyblog_infra::InfraError> {
//!     let store = RedisKvStore::new("redis://localhost", "NOTES").await?;
//!     store.put("hello", "world").await?;
//!     let page = store.list(ListOptions::first(1000)).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod kv_store;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod redis;

pub use error::{InfraError, InfraErrorKind};
pub use kv_store::{KeyEntry, KvStore, ListOptions, ListPage};
