//! Command handlers. Each opens the database itself; nothing is shared between runs.

use crate::AskArgs;
use anyhow::Result;
use asksql::{
    prompts::format_schema_for_prompt,
    providers::{
        ai::GenerationSettings,
        db::sqlite::SqliteProvider,
        factory::{create_provider, ProviderConfig},
    },
    QueryClientBuilder,
};
use std::{path::Path, time::Duration};
use tracing::info;

/// Opens (creating if needed) the database and makes sure the demo tables exist.
async fn open_database(db_path: &str) -> Result<SqliteProvider> {
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let provider = SqliteProvider::new(db_path).await?;
    provider.initialize_schema().await?;
    Ok(provider)
}

pub async fn handle_ask(db_path: &str, args: &AskArgs) -> Result<()> {
    let storage = open_database(db_path).await?;
    storage.seed_sample_data().await?;

    let ai_provider = if args.offline {
        info!("Offline mode: completion service disabled.");
        None
    } else {
        create_provider(&ProviderConfig {
            provider: args.provider.clone(),
            api_url: args.api_url.clone(),
            api_key: args.api_key.clone(),
            model_name: args.model.clone(),
        })?
    };

    let client = QueryClientBuilder::new()
        .maybe_ai_provider(ai_provider)
        .storage_provider(Box::new(storage))
        .generation_settings(GenerationSettings {
            model: args.model.clone(),
            ..GenerationSettings::default()
        })
        .timeout(Duration::from_secs(args.timeout_secs))
        .build()?;

    let outcome = client.ask(&args.question).await;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

pub async fn handle_schema(db_path: &str) -> Result<()> {
    let storage = open_database(db_path).await?;
    let client = QueryClientBuilder::new()
        .storage_provider(Box::new(storage))
        .build()?;

    let schema = client.schema().await?;
    println!("{}", format_schema_for_prompt(&schema).trim_start());
    Ok(())
}

pub async fn handle_seed(db_path: &str) -> Result<()> {
    let storage = open_database(db_path).await?;
    if storage.seed_sample_data().await? {
        println!("Seeded sample data into {db_path}");
    } else {
        println!("Sample data already present in {db_path}");
    }
    Ok(())
}
