//! # Application Configuration
//!
//! This module defines the configuration structure for the `asksql-server` and
//! provides the logic for loading it from a `config.yml` file and environment
//! variables.

use asksql::constants::DEFAULT_DB_FILE;
use asksql::providers::ai::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use asksql::providers::factory::ProviderConfig;
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fs;
use tracing::info;

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates a required configuration file was not found.
    NotFound(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// The path to the SQLite database file. Loaded from `DB_URL` env var.
    #[serde(default = "default_db_url")]
    pub db_url: String,
    /// Create the demo tables and rows on startup if the database is empty.
    #[serde(default = "default_seed_sample_data")]
    pub seed_sample_data: bool,
    /// The completion service. Missing credentials leave it unconfigured.
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Replaces the built-in generation prompt. Must contain `{schema}` and `{question}`.
    #[serde(default)]
    pub prompt_template: Option<String>,
}

/// Sampling parameters and the completion timeout.
#[derive(Debug, Deserialize, Clone)]
pub struct GenerationConfig {
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_port() -> u16 {
    5000
}

fn default_db_url() -> String {
    DEFAULT_DB_FILE.to_string()
}

fn default_seed_sample_data() -> bool {
    true
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_timeout_secs() -> u64 {
    30
}

// Helper to read a file, substitute env vars, and return its content.
// Returns Ok(None) if the file does not exist, or an error if it fails to read.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !std::path::Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(e.to_string()))?;
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_default()
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the application configuration from a file and environment variables.
///
/// Layers, lowest precedence first:
/// - Built-in defaults.
/// - `config.yml` (or `config_path_override`), with `${VAR}` substituted from the environment.
/// - Top-level keys from plain environment variables (`PORT`, `DB_URL`).
/// - Nested keys from `ASKSQL_...` variables (e.g., `ASKSQL_PROVIDER__API_KEY`).
///
/// An explicit override path must exist; the default `config.yml` is optional.
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let base_path = env!("CARGO_MANIFEST_DIR");
    let mut builder = ConfigBuilder::builder()
        .set_default("provider.provider", "groq")?
        .set_default("seed_sample_data", true)?;

    let main_config_path = config_path_override
        .map(String::from)
        .unwrap_or_else(|| format!("{base_path}/config.yml"));

    match read_and_substitute(&main_config_path)? {
        Some(content) => {
            info!("Loading configuration from '{main_config_path}'.");
            builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
        }
        None if config_path_override.is_some() => {
            return Err(ConfigError::NotFound(format!(
                "Config file not found at '{main_config_path}'."
            )));
        }
        None => info!("'{main_config_path}' not found. Using built-in defaults."),
    }

    let settings = builder
        // Top-level keys like PORT and DB_URL.
        .add_source(Environment::default())
        .add_source(
            Environment::with_prefix("ASKSQL")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    let mut config: AppConfig = settings.try_deserialize()?;

    // Without a config file there is nothing to substitute GROQ_API_KEY into.
    if config.provider.provider == "groq" && config.provider.api_key.is_none() {
        if let Ok(key) = env::var("GROQ_API_KEY") {
            if !key.is_empty() {
                config.provider.api_key = Some(key);
            }
        }
    }

    Ok(config)
}
