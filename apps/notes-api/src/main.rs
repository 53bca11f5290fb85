//! # Notes API サーバー
//!
//! ノートの一覧・取得・保存・削除を提供する HTTP サーバー。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `NOTES_API_HOST` | No | バインドアドレス（既定: `0.0.0.0`） |
//! | `NOTES_API_PORT` | No | ポート番号（既定: `8787`） |
//! | `REDIS_URL` | No | Redis 接続 URL。未設定ならストア未バインドで起動する |
//! | `NOTES_NAMESPACE` | No | Redis キーの接頭辞（既定: `NOTES`） |
//! | `LOG_FORMAT` | No | `json` または `pretty`（既定: `pretty`） |
//! | `RUST_LOG` | No | ログレベル（既定: `info,easyblog=debug`） |
//!
//! ストアが使えない状態でもサーバーは起動し、ノート操作は 500 を返す。
//!
//! ## 起動方法
//!
//! ```bash
//! REDIS_URL=redis://localhost:16379 cargo run -p easyblog-notes-api
//! ```

mod config;

use std::{net::SocketAddr, sync::Arc};

use config::NotesApiConfig;
use easyblog_domain::clock::SystemClock;
use easyblog_infra::{KvStore, redis::RedisKvStore};
use easyblog_notes_api::{app_builder::build_app, handler::NoteState, usecase::NoteUseCaseImpl};
use easyblog_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let tracing_config = TracingConfig::from_env("notes-api");
    init_tracing(&tracing_config);
    let _tracing_guard = tracing::info_span!("app", service = "notes-api").entered();

    let config = NotesApiConfig::from_env()?;

    tracing::info!(
        "Notes API サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    let store = connect_store(&config).await;
    let usecase = NoteUseCaseImpl::new(store, config.namespace.clone(), Arc::new(SystemClock));
    let app = build_app(Arc::new(NoteState { usecase }));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Notes API サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// ストアに接続する
///
/// 接続できなければ `None`（未バインド）を返し、起動自体は続行する。
async fn connect_store(config: &NotesApiConfig) -> Option<Arc<dyn KvStore>> {
    let Some(redis_url) = config.redis_url.as_deref() else {
        tracing::warn!("REDIS_URL が設定されていません。ストア未バインドで起動します");
        return None;
    };

    match RedisKvStore::new(redis_url, config.namespace.clone()).await {
        Ok(store) => {
            tracing::info!(namespace = %config.namespace, "Redis に接続しました");
            let store: Arc<dyn KvStore> = Arc::new(store);
            Some(store)
        }
        Err(e) => {
            tracing::error!(error = %e, "Redis への接続に失敗しました。ストア未バインドで起動します");
            None
        }
    }
}
