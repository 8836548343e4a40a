use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Custom error types for the library.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Completion service is not configured")]
    AdapterUnavailable,
    #[error("Failed to send request to AI provider: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize AI provider response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("AI provider returned an error: {0}")]
    AiApi(String),
    #[error("AI provider did not respond within {}ms", .0.as_millis())]
    AdapterTimeout(Duration),
    #[error("Storage provider is not configured")]
    MissingStorageProvider,
    #[error("Failed to connect to storage: {0}")]
    StorageConnection(String),
    #[error("Failed to read schema metadata: {0}")]
    SchemaRead(String),
    #[error("Database error: {0}")]
    StorageOperationFailed(String),
}

impl PromptError {
    /// Maps the error onto the caller-facing taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PromptError::AdapterUnavailable => ErrorKind::AdapterUnavailable,
            PromptError::ReqwestClientBuild(_)
            | PromptError::AiRequest(_)
            | PromptError::AiDeserialization(_)
            | PromptError::AiApi(_)
            | PromptError::AdapterTimeout(_) => ErrorKind::AdapterError,
            PromptError::SchemaRead(_) => ErrorKind::SchemaError,
            PromptError::MissingStorageProvider
            | PromptError::StorageConnection(_)
            | PromptError::StorageOperationFailed(_) => ErrorKind::ExecutionError,
        }
    }
}

/// The fixed taxonomy of failure kinds reported in a `QueryOutcome`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    EmptyInputError,
    AdapterUnavailable,
    AdapterError,
    NoFallbackMatch,
    EmptyStatement,
    NonSelectStatement,
    ForbiddenKeyword,
    InjectionPatternDetected,
    SchemaError,
    ExecutionError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::EmptyInputError => "EmptyInputError",
            ErrorKind::AdapterUnavailable => "AdapterUnavailable",
            ErrorKind::AdapterError => "AdapterError",
            ErrorKind::NoFallbackMatch => "NoFallbackMatch",
            ErrorKind::EmptyStatement => "EmptyStatement",
            ErrorKind::NonSelectStatement => "NonSelectStatement",
            ErrorKind::ForbiddenKeyword => "ForbiddenKeyword",
            ErrorKind::InjectionPatternDetected => "InjectionPatternDetected",
            ErrorKind::SchemaError => "SchemaError",
            ErrorKind::ExecutionError => "ExecutionError",
        };
        f.write_str(name)
    }
}
