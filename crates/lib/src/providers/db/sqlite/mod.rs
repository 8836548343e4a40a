use crate::{
    errors::PromptError,
    providers::db::storage::Storage,
    types::{
        ColumnDescriptor, ExecutionOutcome, ForeignKeyDescriptor, Record, SchemaDescriptor,
        TableDescriptor,
    },
};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt::{self, Debug};
use tracing::{debug, info};
use turso::{Connection, Database, Value as TursoValue};

mod ddl;
pub mod sql;

/// A provider for interacting with a local SQLite database using Turso.
///
/// Every operation takes its own connection, so no transaction spans more than
/// one step of a request. When cloned, it shares the same underlying database.
#[derive(Clone)]
pub struct SqliteProvider {
    /// The Turso database instance. It's cloneable and thread-safe.
    pub db: Database,
}

impl SqliteProvider {
    /// Creates a new `SqliteProvider` from a file path or in-memory.
    ///
    /// # Arguments
    ///
    /// * `db_path`: The path to the SQLite database file. Use ":memory:" for a unique,
    ///   isolated in-memory database. To share an in-memory database across multiple
    ///   `SqliteProvider` instances (e.g., in tests), create one provider and
    ///   then `.clone()` it.
    pub async fn new(db_path: &str) -> Result<Self, PromptError> {
        let db = turso::Builder::new_local(db_path)
            .build()
            .await
            .map_err(|e| PromptError::StorageConnection(e.to_string()))?;

        // Use `query` for PRAGMA statements that return a value to avoid "unexpected row" errors.
        let conn = db
            .connect()
            .map_err(|e| PromptError::StorageConnection(e.to_string()))?;
        conn.query("PRAGMA journal_mode=WAL;", ())
            .await
            .map_err(|e| PromptError::StorageConnection(e.to_string()))?;

        Ok(Self { db })
    }

    fn connect(&self) -> Result<Connection, PromptError> {
        self.db
            .connect()
            .map_err(|e| PromptError::StorageConnection(e.to_string()))
    }

    /// A helper for tests to pre-populate data by executing multiple SQL statements.
    pub async fn initialize_with_data(&self, init_sql: &str) -> Result<(), PromptError> {
        let conn = self.connect()?;

        for statement in init_sql.split(';').filter(|s| !s.trim().is_empty()) {
            conn.execute(statement, ())
                .await
                .map_err(|e| PromptError::StorageOperationFailed(e.to_string()))?;
        }
        Ok(())
    }

    /// Ensures that the demo business tables exist.
    /// This function is idempotent and safe to call on every application startup.
    pub async fn initialize_schema(&self) -> Result<(), PromptError> {
        let conn = self.connect()?;

        for statement in sql::ALL_TABLE_CREATION_SQL {
            conn.execute(statement, ())
                .await
                .map_err(|e| PromptError::StorageOperationFailed(e.to_string()))?;
        }
        Ok(())
    }

    /// Inserts the demo rows, but only into an empty `customers` table.
    ///
    /// Returns `true` if rows were inserted.
    pub async fn seed_sample_data(&self) -> Result<bool, PromptError> {
        let conn = self.connect()?;

        let mut rows = conn
            .query(sql::COUNT_CUSTOMERS, ())
            .await
            .map_err(|e| PromptError::StorageOperationFailed(e.to_string()))?;
        let existing = match rows
            .next()
            .await
            .map_err(|e| PromptError::StorageOperationFailed(e.to_string()))?
        {
            Some(row) => match row.get_value(0) {
                Ok(TursoValue::Integer(n)) => n,
                _ => 0,
            },
            None => 0,
        };
        drop(rows);

        if existing > 0 {
            info!("Sample data already present ({existing} customers). Skipping seed.");
            return Ok(false);
        }

        info!("Inserting sample data...");
        for statement in sql::SAMPLE_DATA_SQL {
            conn.execute(statement, ())
                .await
                .map_err(|e| PromptError::StorageOperationFailed(e.to_string()))?;
        }
        info!("Sample data inserted successfully.");
        Ok(true)
    }

    async fn read_columns(
        &self,
        conn: &Connection,
        table_name: &str,
    ) -> Result<Vec<ColumnDescriptor>, PromptError> {
        let mut rows = conn
            .query(&sql::table_info(table_name), ())
            .await
            .map_err(|e| PromptError::SchemaRead(e.to_string()))?;

        let mut columns = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| PromptError::SchemaRead(e.to_string()))?
        {
            // PRAGMA table_info columns: cid, name, type, notnull, dflt_value, pk
            let Ok(TursoValue::Text(name)) = row.get_value(1) else {
                continue;
            };
            let declared_type = match row.get_value(2) {
                Ok(TursoValue::Text(t)) => t,
                _ => String::new(),
            };
            let not_null = matches!(row.get_value(3), Ok(TursoValue::Integer(n)) if n != 0);
            let default_value = match row.get_value(4) {
                Ok(TursoValue::Text(d)) => Some(d),
                Ok(TursoValue::Integer(i)) => Some(i.to_string()),
                Ok(TursoValue::Real(f)) => Some(f.to_string()),
                _ => None,
            };
            let primary_key = matches!(row.get_value(5), Ok(TursoValue::Integer(n)) if n != 0);

            columns.push(ColumnDescriptor {
                name,
                declared_type,
                not_null,
                primary_key,
                default_value,
            });
        }
        Ok(columns)
    }
}

impl Debug for SqliteProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteProvider").finish_non_exhaustive()
    }
}

/// Strips trailing semicolons and refuses text that holds more than one statement.
///
/// Semicolons inside quoted literals or identifiers do not count.
fn single_statement(query: &str) -> Result<&str, PromptError> {
    let statement = query.trim().trim_end_matches(|c: char| c == ';' || c.is_whitespace());
    let mut quote: Option<char> = None;
    for ch in statement.chars() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"' | '`') => quote = Some(ch),
            (None, '[') => quote = Some(']'),
            (None, ';') => {
                return Err(PromptError::StorageOperationFailed(
                    "only a single statement may be executed".to_string(),
                ))
            }
            _ => {}
        }
    }
    Ok(statement)
}

/// Rounds a floating-point value to two decimal places.
pub fn normalize_real(f: f64) -> f64 {
    (f * 100.0).round() / 100.0
}

/// Converts a Turso value to a serde_json::Value.
///
/// Every REAL is rounded to two decimals; integers pass through untouched.
fn turso_value_to_json(v: TursoValue) -> Value {
    match v {
        TursoValue::Null => Value::Null,
        TursoValue::Integer(i) => Value::Number(i.into()),
        TursoValue::Real(f) => serde_json::Number::from_f64(normalize_real(f))
            .map(Value::Number)
            .unwrap_or(Value::Null),
        TursoValue::Text(s) => Value::String(s),
        TursoValue::Blob(_) => Value::String("<blob>".to_string()),
    }
}

/// Fills in foreign-key targets that the DDL left implicit with the referenced
/// table's primary key.
fn resolve_foreign_keys(tables: &mut [TableDescriptor], raw: Vec<Vec<ddl::RawForeignKey>>) {
    let primary_keys: Vec<(String, Option<String>)> = tables
        .iter()
        .map(|t| {
            (
                t.name.clone(),
                t.columns.iter().find(|c| c.primary_key).map(|c| c.name.clone()),
            )
        })
        .collect();

    for (table, keys) in tables.iter_mut().zip(raw) {
        table.foreign_keys = keys
            .into_iter()
            .map(|fk| {
                let references_column = fk.references_column.unwrap_or_else(|| {
                    primary_keys
                        .iter()
                        .find(|(name, _)| name.eq_ignore_ascii_case(&fk.references_table))
                        .and_then(|(_, pk)| pk.clone())
                        .unwrap_or_else(|| "rowid".to_string())
                });
                ForeignKeyDescriptor {
                    column: fk.column,
                    references_table: fk.references_table,
                    references_column,
                }
            })
            .collect();
    }
}

#[async_trait]
impl Storage for SqliteProvider {
    fn name(&self) -> &str {
        "SQLite"
    }

    async fn read_schema(&self) -> Result<SchemaDescriptor, PromptError> {
        let conn = self
            .db
            .connect()
            .map_err(|e| PromptError::SchemaRead(e.to_string()))?;

        let mut rows = conn
            .query(sql::LIST_TABLES, ())
            .await
            .map_err(|e| PromptError::SchemaRead(e.to_string()))?;

        let mut entries = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| PromptError::SchemaRead(e.to_string()))?
        {
            if let Ok(TursoValue::Text(name)) = row.get_value(0) {
                let create_sql = match row.get_value(1) {
                    Ok(TursoValue::Text(s)) => s,
                    _ => String::new(),
                };
                entries.push((name, create_sql));
            }
        }
        drop(rows);

        let mut tables = Vec::with_capacity(entries.len());
        let mut raw_keys = Vec::with_capacity(entries.len());
        for (name, create_sql) in entries {
            let columns = self.read_columns(&conn, &name).await?;
            raw_keys.push(ddl::parse_foreign_keys(&create_sql));
            tables.push(TableDescriptor {
                name,
                columns,
                foreign_keys: Vec::new(),
            });
        }
        resolve_foreign_keys(&mut tables, raw_keys);

        info!("Read schema with {} tables.", tables.len());
        Ok(SchemaDescriptor::new(tables))
    }

    /// Executes a statement on SQLite and returns the rows as ordered records.
    async fn execute_query(&self, query: &str) -> ExecutionOutcome {
        debug!(query = %query, "--> Executing SQLite query");

        let query = single_statement(query)?;
        let conn = self.connect()?;

        let mut stmt = conn
            .prepare(query)
            .await
            .map_err(|e| PromptError::StorageOperationFailed(e.to_string()))?;

        let column_names: Vec<String> = stmt
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        let mut rows = stmt
            .query(())
            .await
            .map_err(|e| PromptError::StorageOperationFailed(e.to_string()))?;

        let mut records = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| PromptError::StorageOperationFailed(e.to_string()))?
        {
            let mut record = Record::new();
            for (i, name) in column_names.iter().enumerate() {
                let value = row
                    .get_value(i)
                    .map_err(|e| PromptError::StorageOperationFailed(e.to_string()))?;
                record.insert(name.clone(), turso_value_to_json(value));
            }
            records.push(record);
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_reals_to_cents() {
        assert_eq!(normalize_real(2499.99), 2499.99);
        assert_eq!(normalize_real(1.005_1), 1.01);
        assert_eq!(normalize_real(33.333_333), 33.33);
        assert_eq!(normalize_real(95000.0), 95000.0);
    }

    #[test]
    fn single_statement_guard() {
        assert_eq!(single_statement("SELECT 1;  ").unwrap(), "SELECT 1");
        assert_eq!(
            single_statement("SELECT * FROM t WHERE name = 'a;b'").unwrap(),
            "SELECT * FROM t WHERE name = 'a;b'"
        );
        for stacked in ["SELECT 1;CREATE TABLE x (a)", "SELECT 1; PRAGMA query_only=0;"] {
            assert!(matches!(
                single_statement(stacked),
                Err(PromptError::StorageOperationFailed(_))
            ));
        }
    }

    #[test]
    fn integers_are_not_converted_to_floats() {
        assert_eq!(turso_value_to_json(TursoValue::Integer(7)), Value::from(7));
        assert_eq!(turso_value_to_json(TursoValue::Real(0.125)), Value::from(0.13));
        assert_eq!(turso_value_to_json(TursoValue::Null), Value::Null);
    }
}
