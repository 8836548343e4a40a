pub mod gemini;
pub mod local;

use crate::errors::PromptError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// The model identifier used when configuration does not name one.
pub const DEFAULT_MODEL: &str = "llama3-70b-8192";
/// Low sampling temperature so that the same question tends to produce the same SQL.
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_MAX_TOKENS: u32 = 600;

/// Sampling parameters sent with every completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// A trait for interacting with an external text-completion service.
///
/// Implementations are stateless: one request per call, no retries.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Sends the rendered prompt and returns the raw response text.
    async fn generate(
        &self,
        prompt: &str,
        settings: &GenerationSettings,
    ) -> Result<String, PromptError>;
}

dyn_clone::clone_trait_object!(AiProvider);
