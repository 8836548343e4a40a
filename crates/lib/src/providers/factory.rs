//! # AI Provider Factory
//!
//! Builds a completion provider from configuration. A provider whose required
//! credential or endpoint is missing is reported as *unconfigured* (`Ok(None)`)
//! rather than as an error, so the pipeline can still serve fallback queries.

use crate::{
    errors::PromptError,
    providers::ai::{gemini::GeminiProvider, local::LocalAiProvider, AiProvider, DEFAULT_MODEL},
};
use serde::Deserialize;
use tracing::{info, warn};

/// The OpenAI-compatible endpoint used for `provider: groq` when no URL is configured.
pub const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// A configuration for a single completion provider.
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// The type of provider: "groq", "local", or "gemini".
    pub provider: String,
    /// The API URL. Optional for providers where it can be derived.
    #[serde(default)]
    pub api_url: Option<String>,
    /// The API key. Optional only for local providers.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model_name")]
    pub model_name: String,
}

fn default_model_name() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: "groq".to_string(),
            api_url: None,
            api_key: None,
            model_name: default_model_name(),
        }
    }
}

/// Treats empty strings (e.g. an unset `${VAR}` substituted into YAML) as absent.
fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Creates the provider described by `config`.
///
/// Returns `Ok(None)` when the provider cannot be used because a credential or URL
/// is missing, and `Err` only for configuration that can never work (an unknown
/// provider type) or an HTTP client that fails to build.
pub fn create_provider(config: &ProviderConfig) -> Result<Option<Box<dyn AiProvider>>, PromptError> {
    let api_key = non_empty(&config.api_key);
    let api_url = non_empty(&config.api_url);

    let provider: Box<dyn AiProvider> = match config.provider.as_str() {
        "groq" => {
            let Some(api_key) = api_key else {
                warn!("GROQ_API_KEY not found; completion service is unconfigured.");
                return Ok(None);
            };
            let api_url = api_url.unwrap_or_else(|| GROQ_API_URL.to_string());
            info!("Configuring Groq provider with URL: {}", api_url);
            Box::new(LocalAiProvider::new(api_url, Some(api_key))?)
        }
        "local" => {
            let Some(api_url) = api_url else {
                warn!("api_url is not set for the local provider; completion service is unconfigured.");
                return Ok(None);
            };
            info!("Configuring local AI provider with URL: {}", api_url);
            Box::new(LocalAiProvider::new(api_url, api_key)?)
        }
        "gemini" => {
            let Some(api_key) = api_key else {
                warn!("api_key is not set for the gemini provider; completion service is unconfigured.");
                return Ok(None);
            };
            let api_url =
                api_url.unwrap_or_else(|| GeminiProvider::endpoint_for(&config.model_name));
            info!("Configuring Gemini provider with URL: {}", api_url);
            Box::new(GeminiProvider::new(api_url, api_key)?)
        }
        other => {
            return Err(PromptError::AiApi(format!(
                "Unsupported AI provider type '{other}'"
            )))
        }
    };

    Ok(Some(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider: &str, api_url: Option<&str>, api_key: Option<&str>) -> ProviderConfig {
        ProviderConfig {
            provider: provider.to_string(),
            api_url: api_url.map(String::from),
            api_key: api_key.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn groq_without_key_is_unconfigured() {
        assert!(create_provider(&config("groq", None, None)).unwrap().is_none());
        assert!(create_provider(&config("groq", None, Some("  "))).unwrap().is_none());
    }

    #[test]
    fn groq_with_key_is_configured() {
        assert!(create_provider(&config("groq", None, Some("k"))).unwrap().is_some());
    }

    #[test]
    fn local_needs_only_a_url() {
        assert!(create_provider(&config("local", None, None)).unwrap().is_none());
        assert!(create_provider(&config("local", Some("http://localhost:1234"), None))
            .unwrap()
            .is_some());
    }

    #[test]
    fn gemini_without_key_is_unconfigured() {
        assert!(create_provider(&config("gemini", None, None)).unwrap().is_none());
    }

    #[test]
    fn unknown_provider_is_an_error() {
        assert!(create_provider(&config("carrier-pigeon", None, Some("k"))).is_err());
    }
}
