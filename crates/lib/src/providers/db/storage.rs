use crate::{
    errors::PromptError,
    types::{ExecutionOutcome, SchemaDescriptor},
};
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

/// A trait for interacting with a storage backend.
///
/// The pipeline only ever reads through this interface: it introspects the
/// schema and runs statements that have already passed validation.
#[async_trait]
pub trait Storage: Send + Sync + DynClone + Debug {
    /// Returns the name of the storage provider (e.g., "SQLite").
    fn name(&self) -> &str;

    /// Reads table, column, and foreign-key metadata from the live catalog.
    ///
    /// Never cached: every call reflects the catalog as it is now.
    async fn read_schema(&self) -> Result<SchemaDescriptor, PromptError>;

    /// Executes a statement and returns its rows as ordered records.
    ///
    /// Engine errors are passed through with the engine's own message.
    async fn execute_query(&self, sql: &str) -> ExecutionOutcome;
}

dyn_clone::clone_trait_object!(Storage);
