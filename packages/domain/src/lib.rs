//! # Easy-blog ドメイン層
//!
//! ノート（id と本文のペア）を表現する型と、その不変条件を定義する。
//!
//! ## 依存関係
//!
//! ```text
//! notes-api → domain
//! notes-api → infra
//! ```
//!
//! ドメイン層とインフラ層は互いに依存しない。ドメイン層はストアの実装（Redis 等）を知らない。
//!
//! ## モジュール構成
//!
//! - [`note`] - ノートの識別子・本文・一覧表示用エンティティ
//! - [`clock`] - 現在時刻プロバイダ
//! - [`error`] - ドメインエラー

pub mod clock;
pub mod error;
pub mod note;

pub use error::DomainError;
