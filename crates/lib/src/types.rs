//! # Core Data Types
//!
//! Schema descriptors produced by introspection, the candidate statements that
//! flow through the pipeline, and the `QueryOutcome` envelope returned to callers.

use crate::errors::{ErrorKind, PromptError};
use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// A single result row: column name to normalized value, in result-set column order.
pub type Record = Map<String, Value>;

/// The result of running an accepted statement against storage.
pub type ExecutionOutcome = Result<Vec<Record>, PromptError>;

// --- Schema Descriptors ---

/// A column as reported by the storage engine's metadata catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    /// The declared type text, exactly as written in the table definition.
    #[serde(rename = "type")]
    pub declared_type: String,
    pub not_null: bool,
    pub primary_key: bool,
    pub default_value: Option<String>,
}

/// A foreign-key edge from a local column to `references_table.references_column`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyDescriptor {
    pub column: String,
    pub references_table: String,
    pub references_column: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDescriptor {
    #[serde(skip)]
    pub name: String,
    pub columns: Vec<ColumnDescriptor>,
    pub foreign_keys: Vec<ForeignKeyDescriptor>,
}

/// An ordered snapshot of every table in the database.
///
/// Tables keep the order in which the storage engine enumerated them. The
/// descriptor is rebuilt for every request and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaDescriptor {
    tables: Vec<TableDescriptor>,
}

impl SchemaDescriptor {
    pub fn new(tables: Vec<TableDescriptor>) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &[TableDescriptor] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&TableDescriptor> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl Serialize for SchemaDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.tables.len()))?;
        for table in &self.tables {
            map.serialize_entry(&table.name, table)?;
        }
        map.end()
    }
}

// --- Candidates ---

/// Where a candidate statement came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Model,
    Fallback,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Model => f.write_str("model"),
            Provenance::Fallback => f.write_str("fallback"),
        }
    }
}

/// A statement produced by the model or the fallback table, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCandidate {
    pub raw: String,
    pub sanitized: String,
    pub provenance: Provenance,
}

impl GeneratedCandidate {
    pub fn from_model(raw: String) -> Self {
        let sanitized = crate::sanitize::sanitize_response(&raw);
        Self {
            raw,
            sanitized,
            provenance: Provenance::Model,
        }
    }

    /// Fallback statements are canned, so the raw and sanitized text are identical.
    pub fn from_fallback(statement: &str) -> Self {
        Self {
            raw: statement.to_string(),
            sanitized: statement.to_string(),
            provenance: Provenance::Fallback,
        }
    }
}

// --- Outcome ---

/// The suggestion offered when no statement could be produced for a question.
pub const REPHRASE_SUGGESTION: &str =
    "Try asking: \"Show all customers\" or \"How many orders were placed?\"";

/// The structured result of handling a single question.
///
/// Every request ends in one of these, whether it succeeded or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryOutcome {
    pub accepted: bool,
    pub provenance: Option<Provenance>,
    pub statement: Option<String>,
    pub records: Option<Vec<Record>>,
    pub result_count: Option<usize>,
    pub error_kind: Option<ErrorKind>,
    pub error_detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl QueryOutcome {
    pub fn success(provenance: Provenance, statement: String, records: Vec<Record>) -> Self {
        Self {
            accepted: true,
            provenance: Some(provenance),
            statement: Some(statement),
            result_count: Some(records.len()),
            records: Some(records),
            error_kind: None,
            error_detail: None,
            suggestion: None,
        }
    }

    pub fn failure(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            accepted: false,
            provenance: None,
            statement: None,
            records: None,
            result_count: None,
            error_kind: Some(kind),
            error_detail: Some(detail.into()),
            suggestion: None,
        }
    }

    /// Attaches the statement that was rejected or failed, for transparency.
    pub fn with_statement(mut self, provenance: Provenance, statement: String) -> Self {
        self.provenance = Some(provenance);
        self.statement = Some(statement);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}
