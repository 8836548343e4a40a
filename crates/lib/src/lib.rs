//! # Natural Language to SQL
//!
//! This crate turns a plain-English question into a single read-only SQL statement,
//! runs it against a SQLite database, and returns the rows.
//!
//! A completion service writes the statement from a prompt built out of the live
//! schema. Whatever comes back is sanitized and checked by a lexical validator
//! before it touches the database. When the model is unavailable or its output is
//! rejected, a fixed table of keyword rules supplies the statement instead.
//!
//! The entry point is [`QueryClient::ask`], which always returns a [`QueryOutcome`].

pub mod adapter;
pub mod client;
pub mod constants;
pub mod errors;
pub mod fallback;
pub mod prompts;
pub mod providers;
pub mod sanitize;
pub mod types;
pub mod validator;

pub use client::{QueryClient, QueryClientBuilder};
pub use errors::{ErrorKind, PromptError};
pub use types::{Provenance, QueryOutcome, Record, SchemaDescriptor};
