//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the logic
//! for building it at startup: opening the database, creating the completion
//! provider, and wiring both into a `QueryClient`.

use crate::config::AppConfig;
use asksql::{
    providers::{
        ai::{AiProvider, GenerationSettings},
        db::sqlite::SqliteProvider,
        factory::create_provider,
    },
    QueryClient, QueryClientBuilder,
};
use std::{path::Path, sync::Arc, time::Duration};
use tracing::{info, warn};

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The question-answering pipeline.
    pub query_client: Arc<QueryClient>,
}

/// Builds the shared application state from the configuration.
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let ai_provider = create_provider(&config.provider)?;
    if ai_provider.is_none() {
        warn!("No completion service configured; answering from fallback patterns only.");
    }
    build_app_state_with_ai(config, ai_provider).await
}

/// Same as `build_app_state`, but with an already constructed completion provider.
pub async fn build_app_state_with_ai(
    config: AppConfig,
    ai_provider: Option<Box<dyn AiProvider>>,
) -> anyhow::Result<AppState> {
    if config.db_url != ":memory:" {
        if let Some(parent) = Path::new(&config.db_url).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
    }

    let sqlite_provider = SqliteProvider::new(&config.db_url).await?;
    info!(db_path = %config.db_url, "Initialized storage provider (SQLite).");
    sqlite_provider.initialize_schema().await?;
    if config.seed_sample_data {
        sqlite_provider.seed_sample_data().await?;
    }

    build_app_state_with_storage(&config, sqlite_provider, ai_provider)
}

/// Wires an open database and an optional completion provider into the pipeline.
pub fn build_app_state_with_storage(
    config: &AppConfig,
    sqlite_provider: SqliteProvider,
    ai_provider: Option<Box<dyn AiProvider>>,
) -> anyhow::Result<AppState> {
    let settings = GenerationSettings {
        model: config.provider.model_name.clone(),
        temperature: config.generation.temperature,
        max_tokens: config.generation.max_tokens,
    };

    let query_client = QueryClientBuilder::new()
        .maybe_ai_provider(ai_provider)
        .storage_provider(Box::new(sqlite_provider))
        .generation_settings(settings)
        .timeout(Duration::from_secs(config.generation.timeout_secs))
        .prompt_template(config.prompt_template.clone())
        .build()?;

    Ok(AppState {
        query_client: Arc::new(query_client),
    })
}
