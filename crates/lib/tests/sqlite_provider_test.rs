//! # SQLite Provider Tests
//!
//! Schema introspection and query execution against in-memory databases. Each
//! test creates its own `:memory:` provider, so tests never see each other's data.

mod common;

use crate::common::{seeded_provider, setup_tracing};
use asksql::providers::db::sqlite::{sql, SqliteProvider};
use asksql::providers::db::storage::Storage;
use asksql::{ErrorKind, PromptError};
use serde_json::json;

#[tokio::test]
async fn test_sqlite_provider_basic_query() {
    setup_tracing();

    let provider = SqliteProvider::new(":memory:")
        .await
        .expect("Failed to create SqliteProvider");
    provider
        .initialize_with_data(
            "
            CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
            INSERT INTO users (id, name) VALUES (1, 'Alice');
            INSERT INTO users (id, name) VALUES (2, 'Bob');
        ",
        )
        .await
        .expect("Failed to initialize database with test data");

    let records = provider
        .execute_query("SELECT id, name FROM users ORDER BY id ASC")
        .await
        .expect("Failed to execute query");

    assert_eq!(
        serde_json::to_value(&records).unwrap(),
        json!([
            {"id": 1, "name": "Alice"},
            {"id": 2, "name": "Bob"}
        ])
    );
}

#[tokio::test]
async fn test_records_keep_select_column_order() {
    setup_tracing();
    let provider = seeded_provider().await;

    let records = provider
        .execute_query("SELECT status, name, id FROM customers WHERE id = 1")
        .await
        .unwrap();

    let keys: Vec<&str> = records[0].keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["status", "name", "id"]);
}

#[tokio::test]
async fn test_reals_are_rounded_and_integers_untouched() {
    setup_tracing();
    let provider = SqliteProvider::new(":memory:").await.unwrap();
    provider
        .initialize_with_data(
            "
            CREATE TABLE m (id INTEGER PRIMARY KEY, ratio REAL, label TEXT);
            INSERT INTO m (id, ratio, label) VALUES (1, 33.333333, NULL);
            INSERT INTO m (id, ratio, label) VALUES (2, 95000.0, '3.14159');
        ",
        )
        .await
        .unwrap();

    let records = provider
        .execute_query("SELECT id, ratio, label FROM m ORDER BY id")
        .await
        .unwrap();

    assert_eq!(records[0]["id"], json!(1));
    assert_eq!(records[0]["ratio"], json!(33.33));
    assert_eq!(records[0]["label"], json!(null));
    assert_eq!(records[1]["ratio"], json!(95000.0));
    // Text that looks numeric stays text.
    assert_eq!(records[1]["label"], json!("3.14159"));
}

#[tokio::test]
async fn test_aggregate_over_reals_is_rounded() {
    setup_tracing();
    let provider = seeded_provider().await;

    let records = provider
        .execute_query(
            "SELECT SUM(total_amount) as total_revenue FROM orders WHERE category = 'Furniture'",
        )
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["total_revenue"], json!(869.96));
}

#[tokio::test]
async fn test_zero_rows_is_not_an_error() {
    setup_tracing();
    let provider = seeded_provider().await;

    let records = provider
        .execute_query("SELECT * FROM customers WHERE id = -1")
        .await
        .unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_missing_table_is_an_execution_error() {
    setup_tracing();
    let provider = seeded_provider().await;

    let err = provider
        .execute_query("SELECT * FROM nonexistent_table")
        .await
        .unwrap_err();

    assert!(matches!(err, PromptError::StorageOperationFailed(_)));
    assert_eq!(err.kind(), ErrorKind::ExecutionError);
}

#[tokio::test]
async fn test_sqlite_in_memory_is_isolated() {
    setup_tracing();

    let provider1 = SqliteProvider::new(":memory:").await.unwrap();
    provider1
        .initialize_with_data("CREATE TABLE t1 (id INTEGER); INSERT INTO t1 (id) VALUES (1);")
        .await
        .unwrap();

    let provider2 = SqliteProvider::new(":memory:").await.unwrap();
    let result = provider2.execute_query("SELECT * FROM t1").await;
    assert!(result.is_err(), "Table t1 should not exist in provider2");

    let schema = provider2.read_schema().await.unwrap();
    assert!(schema.is_empty());
}

#[tokio::test]
async fn test_read_schema_describes_demo_tables() {
    setup_tracing();
    let provider = seeded_provider().await;

    let schema = provider.read_schema().await.unwrap();
    assert_eq!(
        schema.table_names(),
        vec!["customers", "orders", "products", "employees"]
    );

    let customers = schema.table("customers").unwrap();
    let id = &customers.columns[0];
    assert_eq!(id.name, "id");
    assert_eq!(id.declared_type, "INTEGER");
    assert!(id.primary_key);

    let email = customers.columns.iter().find(|c| c.name == "email").unwrap();
    assert!(email.not_null);
    assert!(!email.primary_key);

    let status = customers.columns.iter().find(|c| c.name == "status").unwrap();
    assert!(status.default_value.as_deref().unwrap_or_default().contains("active"));
    assert!(customers.foreign_keys.is_empty());
}

#[tokio::test]
async fn test_read_schema_reports_foreign_keys() {
    setup_tracing();
    let provider = seeded_provider().await;

    let schema = provider.read_schema().await.unwrap();

    let orders = schema.table("orders").unwrap();
    assert_eq!(orders.foreign_keys.len(), 1);
    assert_eq!(orders.foreign_keys[0].column, "customer_id");
    assert_eq!(orders.foreign_keys[0].references_table, "customers");
    assert_eq!(orders.foreign_keys[0].references_column, "id");

    let employees = schema.table("employees").unwrap();
    assert_eq!(employees.foreign_keys[0].column, "manager_id");
    assert_eq!(employees.foreign_keys[0].references_table, "employees");
}

#[tokio::test]
async fn test_schema_serializes_as_table_map() {
    setup_tracing();
    let provider = seeded_provider().await;

    let value = serde_json::to_value(provider.read_schema().await.unwrap()).unwrap();
    assert_eq!(value["orders"]["columns"][0]["name"], json!("id"));
    assert_eq!(value["orders"]["columns"][0]["type"], json!("INTEGER"));
    assert_eq!(
        value["orders"]["foreign_keys"][0]["references_table"],
        json!("customers")
    );
}

#[tokio::test]
async fn test_seed_is_idempotent() {
    setup_tracing();
    let provider = seeded_provider().await;

    assert!(!provider.seed_sample_data().await.unwrap());

    let counts = provider
        .execute_query("SELECT COUNT(*) as n FROM customers")
        .await
        .unwrap();
    assert_eq!(counts[0]["n"], json!(sql::SAMPLE_CUSTOMER_COUNT));

    let employees = provider
        .execute_query("SELECT COUNT(*) as n FROM employees")
        .await
        .unwrap();
    assert_eq!(employees[0]["n"], json!(sql::SAMPLE_EMPLOYEE_COUNT));

    for (table, expected) in [
        ("products", sql::SAMPLE_PRODUCT_COUNT),
        ("orders", sql::SAMPLE_ORDER_COUNT),
    ] {
        let rows = provider
            .execute_query(&format!("SELECT COUNT(*) as n FROM {table}"))
            .await
            .unwrap();
        assert_eq!(rows[0]["n"], json!(expected), "{table}");
    }
}

#[tokio::test]
async fn test_repeated_execution_returns_identical_records() {
    setup_tracing();
    let provider = seeded_provider().await;
    let query = "SELECT c.name, SUM(o.total_amount) AS total_spent FROM customers c JOIN orders o ON c.id = o.customer_id GROUP BY c.id ORDER BY total_spent DESC";

    let first = provider.execute_query(query).await.unwrap();
    let second = provider.execute_query(query).await.unwrap();

    assert!(!first.is_empty());
    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
}

#[tokio::test]
async fn test_schema_is_read_fresh_each_time() {
    setup_tracing();
    let provider = seeded_provider().await;

    let before = provider.read_schema().await.unwrap();
    assert!(before.table("suppliers").is_none());

    provider
        .initialize_with_data("CREATE TABLE suppliers (id INTEGER PRIMARY KEY, name TEXT)")
        .await
        .unwrap();

    let after = provider.read_schema().await.unwrap();
    let suppliers = after.table("suppliers").expect("new table should be listed");
    assert_eq!(suppliers.columns.len(), 2);
    assert_eq!(before.tables().len() + 1, after.tables().len());
}

#[tokio::test]
async fn test_read_schema_handles_quoted_table_names() {
    setup_tracing();
    let provider = SqliteProvider::new(":memory:").await.unwrap();
    provider
        .initialize_with_data(
            r#"
            CREATE TABLE "order" (id INTEGER PRIMARY KEY, placed TEXT);
            CREATE TABLE "order items" (id INTEGER PRIMARY KEY, "order id" INTEGER REFERENCES "order" (id), qty INTEGER NOT NULL);
        "#,
        )
        .await
        .unwrap();

    let schema = provider.read_schema().await.unwrap();
    assert_eq!(schema.table_names(), vec!["order", "order items"]);

    let items = schema.table("order items").unwrap();
    let names: Vec<&str> = items.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["id", "order id", "qty"]);
    assert_eq!(items.foreign_keys.len(), 1);
    assert_eq!(items.foreign_keys[0].column, "order id");
    assert_eq!(items.foreign_keys[0].references_table, "order");
    assert_eq!(items.foreign_keys[0].references_column, "id");
}

#[tokio::test]
async fn test_stacked_statements_are_not_executed() {
    setup_tracing();
    let provider = seeded_provider().await;

    let err = provider
        .execute_query("SELECT 1;CREATE TABLE pwned (a INTEGER)")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExecutionError);

    let schema = provider.read_schema().await.unwrap();
    assert!(schema.table("pwned").is_none());

    let records = provider.execute_query("SELECT COUNT(*) AS n FROM orders;").await.unwrap();
    assert_eq!(records[0]["n"], json!(sql::SAMPLE_ORDER_COUNT));
}
