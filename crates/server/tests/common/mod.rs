//! # Common Test Utilities
//!
//! `TestApp` spawns the real router on a random port, backed by a SQLite file in
//! a temporary directory (seeded through `TestSetup`) and an optional mock
//! completion provider.

// Not every test file uses every helper.
#![allow(unused)]

use anyhow::Result;
use asksql::providers::ai::AiProvider;
use asksql::providers::factory::ProviderConfig;
use asksql_server::{
    config::{AppConfig, GenerationConfig},
    router,
    state::build_app_state_with_storage,
};
use asksql_test_utils::TestSetup;
use axum::serve;
use reqwest::Client;
use std::net::SocketAddr;
use tempfile::{tempdir, TempDir};
use tokio::{net::TcpListener, task::JoinHandle};

pub fn test_config(db_url: String) -> AppConfig {
    AppConfig {
        port: 0,
        db_url,
        seed_sample_data: false,
        provider: ProviderConfig::default(),
        generation: GenerationConfig::default(),
        prompt_template: None,
    }
}

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    /// A second handle on the server's database, for checking its contents directly.
    pub setup: TestSetup,
    _db_dir: TempDir,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the server with no completion service (fallback-only).
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with_ai(None).await
    }

    pub async fn spawn_with_ai(ai_provider: Option<Box<dyn AiProvider>>) -> Result<Self> {
        dotenvy::dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let db_dir = tempdir()?;
        let db_url = db_dir.path().join("asksql.db").to_string_lossy().to_string();
        let setup = TestSetup::at(&db_url).await?;
        let app_state = build_app_state_with_storage(
            &test_config(db_url),
            setup.provider.clone(),
            ai_provider,
        )?;

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let app = router::create_router(app_state);
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Ok(Self {
            address,
            client: Client::new(),
            setup,
            _db_dir: db_dir,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
