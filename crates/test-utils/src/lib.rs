use anyhow::Result;
use asksql::errors::PromptError;
use asksql::providers::ai::{AiProvider, GenerationSettings};
use asksql::providers::db::sqlite::SqliteProvider;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};

// --- Test Setup ---

/// A helper struct to manage database creation for each test.
pub struct TestSetup {
    pub provider: SqliteProvider,
}

impl TestSetup {
    /// Creates a new, isolated in-memory database with the demo tables and rows.
    pub async fn new() -> Result<Self> {
        Self::at(":memory:").await
    }

    /// Same as `new`, but backed by a file so that another process or server can open it.
    pub async fn at(db_path: &str) -> Result<Self> {
        let provider = SqliteProvider::new(db_path).await?;
        provider.initialize_schema().await?;
        provider.seed_sample_data().await?;
        Ok(Self { provider })
    }
}

// --- Mock AI Provider ---

#[derive(Clone, Debug)]
pub struct MockAiProvider {
    responses: Arc<Mutex<HashMap<String, String>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockAiProvider {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Pre-programs a response for a specific prompt.
    /// The key should be a unique substring of the prompt, usually the question.
    pub fn add_response(&self, key: &str, response: &str) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(key.to_string(), response.to_string());
    }

    /// Retrieves the recorded prompts for assertion.
    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockAiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(
        &self,
        prompt: &str,
        _settings: &GenerationSettings,
    ) -> Result<String, PromptError> {
        self.calls.lock().unwrap().push(prompt.to_string());

        let responses = self.responses.lock().unwrap();
        for (key, response) in responses.iter() {
            if prompt.contains(key) {
                return Ok(response.clone());
            }
        }

        Err(PromptError::AiApi(format!(
            "MockAiProvider: No response programmed for prompt. Got: '{prompt}'"
        )))
    }
}
