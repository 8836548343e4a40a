//! # Query Client
//!
//! `QueryClient` turns one question into one `QueryOutcome`:
//!
//! ```text
//! BuildPrompt -> Generate -> Sanitize -> Validate -> Execute
//!                    |                      |
//!                    +------> Fallback <----+  (at most once)
//!                                |
//!                             Validate -> Execute
//! ```
//!
//! The model path is tried once. If the completion service is unconfigured,
//! fails, times out, returns nothing usable, or returns a statement the validator
//! rejects, the fallback table is consulted exactly once. Every path ends in a
//! `QueryOutcome`; nothing here returns an error or panics on bad input.

use crate::{
    adapter::{CompletionAdapter, DEFAULT_TIMEOUT},
    errors::{ErrorKind, PromptError},
    fallback::FallbackGenerator,
    prompts::{build_generation_prompt, build_generation_prompt_with_template},
    providers::{
        ai::{AiProvider, GenerationSettings},
        db::storage::Storage,
    },
    types::{GeneratedCandidate, QueryOutcome, SchemaDescriptor, REPHRASE_SUGGESTION},
    validator::{describe_rejection, validate_statement, RejectionReason, ValidationVerdict},
};
use std::{fmt, time::Duration};
use tracing::{error, info, warn};

/// Why the model path produced no statement to execute.
enum ModelMiss {
    /// No usable candidate: unconfigured, failed, or empty.
    NoCandidate(ErrorKind),
    /// A candidate was produced but the validator rejected it.
    Rejected(QueryOutcome),
}

/// Orchestrates schema introspection, generation, validation, and execution.
pub struct QueryClient {
    pub(crate) adapter: CompletionAdapter,
    pub(crate) storage_provider: Box<dyn Storage>,
    pub(crate) fallback: FallbackGenerator,
    pub(crate) prompt_template: Option<String>,
}

impl fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryClient")
            .field("storage_provider", &self.storage_provider.name())
            .field("model_configured", &self.adapter.is_configured())
            .finish_non_exhaustive()
    }
}

impl QueryClient {
    /// Whether a completion service is configured. When it is not, every
    /// question is answered from the fallback table.
    pub fn is_model_configured(&self) -> bool {
        self.adapter.is_configured()
    }

    pub fn storage_provider(&self) -> &dyn Storage {
        self.storage_provider.as_ref()
    }

    /// Reads a fresh schema snapshot from storage.
    pub async fn schema(&self) -> Result<SchemaDescriptor, PromptError> {
        self.storage_provider.read_schema().await
    }

    /// Renders the generation prompt for a question against the live schema.
    pub async fn build_prompt(&self, question: &str) -> Result<String, PromptError> {
        let schema = self.storage_provider.read_schema().await?;
        Ok(match &self.prompt_template {
            Some(template) => build_generation_prompt_with_template(template, &schema, question),
            None => build_generation_prompt(&schema, question),
        })
    }

    /// Answers a natural-language question.
    pub async fn ask(&self, question: &str) -> QueryOutcome {
        let question = question.trim();
        if question.is_empty() {
            return QueryOutcome::failure(ErrorKind::EmptyInputError, "Message cannot be empty");
        }
        info!("[ask] Processing query: {question}");

        let miss = match self.model_candidate(question).await {
            Ok(candidate) => match validate_statement(&candidate.sanitized) {
                ValidationVerdict::Accepted => return self.execute(candidate).await,
                ValidationVerdict::Rejected {
                    reason,
                    offending_token,
                } => {
                    let outcome = Self::rejection(candidate, reason, offending_token.as_deref());
                    warn!(
                        "[ask] Model statement rejected ({}); trying fallback. SQL: {}",
                        outcome.error_detail.as_deref().unwrap_or_default(),
                        outcome.statement.as_deref().unwrap_or_default()
                    );
                    ModelMiss::Rejected(outcome)
                }
            },
            Err(e) if e.kind() == ErrorKind::SchemaError => {
                error!("[ask] Schema introspection failed: {e}");
                return QueryOutcome::failure(ErrorKind::SchemaError, e.to_string());
            }
            Err(e) => {
                warn!("[ask] No model candidate ({e}); using fallback generator.");
                ModelMiss::NoCandidate(e.kind())
            }
        };

        let Some(statement) = self.fallback.generate(question) else {
            return match miss {
                ModelMiss::Rejected(outcome) => outcome,
                ModelMiss::NoCandidate(kind) => Self::no_match(kind),
            };
        };

        let candidate = GeneratedCandidate::from_fallback(&statement);
        match validate_statement(&candidate.sanitized) {
            ValidationVerdict::Accepted => self.execute(candidate).await,
            ValidationVerdict::Rejected {
                reason,
                offending_token,
            } => {
                warn!("[ask] Fallback statement rejected ({reason:?}): {statement}");
                Self::rejection(candidate, reason, offending_token.as_deref())
            }
        }
    }

    /// Runs BuildPrompt -> Generate -> Sanitize. An empty sanitized response counts
    /// as a failed call.
    async fn model_candidate(&self, question: &str) -> Result<GeneratedCandidate, PromptError> {
        if !self.adapter.is_configured() {
            return Err(PromptError::AdapterUnavailable);
        }

        let prompt = self.build_prompt(question).await?;
        let raw = self.adapter.complete(&prompt).await?;
        let candidate = GeneratedCandidate::from_model(raw);
        info!("[ask] Generated SQL: {}", candidate.sanitized);

        if candidate.sanitized.is_empty() {
            return Err(PromptError::AiApi(
                "AI provider returned an empty response".to_string(),
            ));
        }
        Ok(candidate)
    }

    async fn execute(&self, candidate: GeneratedCandidate) -> QueryOutcome {
        let GeneratedCandidate {
            sanitized,
            provenance,
            ..
        } = candidate;

        match self.storage_provider.execute_query(&sanitized).await {
            Ok(records) => {
                info!(
                    "[ask] Query executed successfully: {sanitized} | Results: {}",
                    records.len()
                );
                QueryOutcome::success(provenance, sanitized, records)
            }
            Err(e) => {
                error!("[ask] Query execution error: {e}");
                QueryOutcome::failure(ErrorKind::ExecutionError, e.to_string())
                    .with_statement(provenance, sanitized)
            }
        }
    }

    fn rejection(
        candidate: GeneratedCandidate,
        reason: RejectionReason,
        offending_token: Option<&str>,
    ) -> QueryOutcome {
        QueryOutcome::failure(
            reason.error_kind(),
            describe_rejection(reason, offending_token),
        )
        .with_statement(candidate.provenance, candidate.sanitized)
    }

    fn no_match(model_failure: ErrorKind) -> QueryOutcome {
        let mut detail = "Failed to generate SQL query.".to_string();
        if model_failure == ErrorKind::AdapterUnavailable {
            detail.push_str(" The completion service is not configured - please check your API key.");
        } else {
            detail.push_str(" Please try rephrasing your question.");
        }
        QueryOutcome::failure(ErrorKind::NoFallbackMatch, detail).with_suggestion(REPHRASE_SUGGESTION)
    }
}

/// A builder for creating `QueryClient` instances.
#[derive(Default)]
pub struct QueryClientBuilder {
    ai_provider: Option<Box<dyn AiProvider>>,
    storage_provider: Option<Box<dyn Storage>>,
    settings: Option<GenerationSettings>,
    timeout: Option<Duration>,
    prompt_template: Option<String>,
}

impl QueryClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the completion provider.
    pub fn ai_provider(mut self, ai_provider: Box<dyn AiProvider>) -> Self {
        self.ai_provider = Some(ai_provider);
        self
    }

    /// Sets the completion provider, or leaves the client unconfigured with `None`.
    pub fn maybe_ai_provider(mut self, ai_provider: Option<Box<dyn AiProvider>>) -> Self {
        self.ai_provider = ai_provider;
        self
    }

    pub fn storage_provider(mut self, storage_provider: Box<dyn Storage>) -> Self {
        self.storage_provider = Some(storage_provider);
        self
    }

    pub fn generation_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Sets how long a completion call may take before falling back.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Replaces the default generation prompt. The template should contain
    /// `{schema}` and `{question}`.
    pub fn prompt_template(mut self, template: Option<String>) -> Self {
        self.prompt_template = template;
        self
    }

    /// Builds the `QueryClient`.
    ///
    /// A missing AI provider is allowed (fallback-only mode); a missing storage
    /// provider is not.
    pub fn build(self) -> Result<QueryClient, PromptError> {
        let storage_provider = self
            .storage_provider
            .ok_or(PromptError::MissingStorageProvider)?;

        Ok(QueryClient {
            adapter: CompletionAdapter::new(
                self.ai_provider,
                self.settings.unwrap_or_default(),
                self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            ),
            storage_provider,
            fallback: FallbackGenerator::new(),
            prompt_template: self.prompt_template,
        })
    }
}
