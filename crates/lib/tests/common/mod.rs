#![allow(dead_code)]
//! # Common Test Utilities
//!
//! Shared mocks and setup helpers so the pipeline can be exercised without a
//! real completion service.

use asksql::providers::ai::{AiProvider, GenerationSettings};
use asksql::providers::db::{sqlite::SqliteProvider, storage::Storage};
use asksql::{PromptError, Record, SchemaDescriptor};
use async_trait::async_trait;
use dotenvy::dotenv;
use std::sync::{Arc, Once, RwLock};
use std::time::Duration;

static INIT: Once = Once::new();

/// Initializes the tracing subscriber and loads .env for tests.
pub fn setup_tracing() {
    INIT.call_once(|| {
        dotenv().ok();
        tracing_subscriber::fmt::init();
    });
}

/// A seeded in-memory database with the demo business tables.
pub async fn seeded_provider() -> SqliteProvider {
    let provider = SqliteProvider::new(":memory:")
        .await
        .expect("Failed to create SqliteProvider");
    provider
        .initialize_schema()
        .await
        .expect("Failed to create tables");
    provider
        .seed_sample_data()
        .await
        .expect("Failed to seed sample data");
    provider
}

// --- Mock AI Provider for Logic Testing ---

/// How the mock answers once its scripted responses run out.
#[derive(Clone, Debug)]
pub enum MockBehavior {
    Respond,
    Fail(String),
    Hang(Duration),
}

#[derive(Clone, Debug)]
pub struct MockAiProvider {
    pub call_history: Arc<RwLock<Vec<(String, GenerationSettings)>>>,
    pub responses: Arc<RwLock<Vec<String>>>,
    pub behavior: MockBehavior,
}

impl MockAiProvider {
    pub fn new(responses: Vec<&str>) -> Self {
        Self {
            call_history: Arc::new(RwLock::new(Vec::new())),
            responses: Arc::new(RwLock::new(
                responses.into_iter().rev().map(String::from).collect(),
            )),
            behavior: MockBehavior::Respond,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            behavior: MockBehavior::Fail(message.to_string()),
            ..Self::new(vec![])
        }
    }

    pub fn hanging(delay: Duration) -> Self {
        Self {
            behavior: MockBehavior::Hang(delay),
            ..Self::new(vec![])
        }
    }

    pub fn calls(&self) -> usize {
        self.call_history.read().unwrap().len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.call_history
            .read()
            .unwrap()
            .last()
            .map(|(prompt, _)| prompt.clone())
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(
        &self,
        prompt: &str,
        settings: &GenerationSettings,
    ) -> Result<String, PromptError> {
        self.call_history
            .write()
            .unwrap()
            .push((prompt.to_string(), settings.clone()));

        match &self.behavior {
            MockBehavior::Fail(message) => Err(PromptError::AiApi(message.clone())),
            MockBehavior::Hang(delay) => {
                tokio::time::sleep(*delay).await;
                Ok("SELECT 1".to_string())
            }
            MockBehavior::Respond => Ok(self
                .responses
                .write()
                .unwrap()
                .pop()
                .unwrap_or_default()),
        }
    }
}

// --- Mock Storage Provider for Testing ---

/// Storage that cannot reach its catalog, as when the connection itself fails.
#[derive(Clone, Debug)]
pub struct BrokenCatalogStorage;

#[async_trait]
impl Storage for BrokenCatalogStorage {
    fn name(&self) -> &str {
        "BrokenDB"
    }

    async fn read_schema(&self) -> Result<SchemaDescriptor, PromptError> {
        Err(PromptError::SchemaRead("unable to open database file".to_string()))
    }

    async fn execute_query(&self, _query: &str) -> Result<Vec<Record>, PromptError> {
        Ok(Vec::new())
    }
}
