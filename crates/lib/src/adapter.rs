//! # Completion Adapter
//!
//! The boundary to the external completion service. Wraps an optional provider
//! (absent means *unconfigured*), the sampling settings, and a hard timeout.

use crate::{
    errors::PromptError,
    providers::ai::{AiProvider, GenerationSettings},
};
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct CompletionAdapter {
    provider: Option<Box<dyn AiProvider>>,
    settings: GenerationSettings,
    timeout: Duration,
}

impl CompletionAdapter {
    pub fn new(
        provider: Option<Box<dyn AiProvider>>,
        settings: GenerationSettings,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            settings,
            timeout,
        }
    }

    /// An adapter with no provider; every call fails with `AdapterUnavailable`.
    pub fn unconfigured() -> Self {
        Self::new(None, GenerationSettings::default(), DEFAULT_TIMEOUT)
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Sends one completion request and returns the raw response text.
    ///
    /// The request future is dropped (and the HTTP call cancelled) when the
    /// timeout elapses.
    pub async fn complete(&self, prompt: &str) -> Result<String, PromptError> {
        let provider = self.provider.as_ref().ok_or(PromptError::AdapterUnavailable)?;

        debug!(prompt = %prompt, "--> Sending prompt to AI provider");
        match tokio::time::timeout(self.timeout, provider.generate(prompt, &self.settings)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "AI provider did not respond within {}ms; cancelling request.",
                    self.timeout.as_millis()
                );
                Err(PromptError::AdapterTimeout(self.timeout))
            }
        }
    }
}
