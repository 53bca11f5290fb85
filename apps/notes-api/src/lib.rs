//! # Notes API ライブラリ
//!
//! ノート（id と本文のペア）をキー・バリューストアに保存する HTTP API。
//!
//! ## モジュール構成
//!
//! - `app_builder`: ルーター構築
//! - `error`: エラー定義と HTTP レスポンスへの変換
//! - `handler`: HTTP ハンドラ
//! - `middleware`: キャッシュ制御
//! - `usecase`: ノート操作のビジネスロジック

pub mod app_builder;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod usecase;
