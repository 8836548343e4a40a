//! # Shared Constants
//!
//! Constants shared by the `asksql` server and CLI so both binaries agree on
//! where the demo database lives.

/// The default path for the demo business database.
pub const DEFAULT_DB_FILE: &str = "db/asksql.db";
