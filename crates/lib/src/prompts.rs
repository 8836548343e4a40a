//! # Prompt Builder
//!
//! Renders a `SchemaDescriptor` and the user's question into the single prompt
//! sent to the completion service. The default template can be replaced through
//! configuration; it must keep the `{schema}` and `{question}` placeholders.

use crate::types::{SchemaDescriptor, TableDescriptor};
use std::fmt::Write;

pub const QUERY_GENERATION_PROMPT: &str = r#"You are an expert SQL analyst for a business database. Convert natural language questions to precise SQLite SELECT queries.

DATABASE SCHEMA:
{schema}

QUERY GUIDELINES:
1. Generate ONLY SELECT statements (security requirement)
2. Use proper SQLite syntax with correct JOINs
3. Apply appropriate WHERE clauses for filtering
4. Use aggregate functions (COUNT, SUM, AVG, MAX, MIN) when needed
5. Include proper GROUP BY and ORDER BY clauses
6. Handle date comparisons correctly
7. Return ONLY the SQL query without explanations

USER QUESTION: {question}

SQL QUERY:"#;

fn format_table(out: &mut String, table: &TableDescriptor) {
    let _ = writeln!(out, "Table: {}", table.name.to_uppercase());
    for column in &table.columns {
        let mut constraints = Vec::new();
        if column.primary_key {
            constraints.push("PRIMARY KEY");
        }
        if column.not_null {
            constraints.push("NOT NULL");
        }
        let constraint_text = if constraints.is_empty() {
            String::new()
        } else {
            format!(" [{}]", constraints.join(", "))
        };
        let _ = writeln!(
            out,
            "   - {}: {}{}",
            column.name, column.declared_type, constraint_text
        );
    }
    if !table.foreign_keys.is_empty() {
        out.push_str("   Foreign Keys:\n");
        for fk in &table.foreign_keys {
            let _ = writeln!(
                out,
                "      - {} -> {}.{}",
                fk.column, fk.references_table, fk.references_column
            );
        }
    }
}

/// Renders every table, in enumeration order, with its columns and relationships.
pub fn format_schema_for_prompt(schema: &SchemaDescriptor) -> String {
    let mut out = String::new();
    for table in schema.tables() {
        out.push('\n');
        format_table(&mut out, table);
    }
    out
}

/// Builds the generation request with the default template.
pub fn build_generation_prompt(schema: &SchemaDescriptor, question: &str) -> String {
    build_generation_prompt_with_template(QUERY_GENERATION_PROMPT, schema, question)
}

/// Builds the generation request from a caller-supplied template.
pub fn build_generation_prompt_with_template(
    template: &str,
    schema: &SchemaDescriptor,
    question: &str,
) -> String {
    template
        .replace("{schema}", &format_schema_for_prompt(schema))
        .replace("{question}", question)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ColumnDescriptor, ForeignKeyDescriptor};

    fn column(name: &str, ty: &str, not_null: bool, pk: bool) -> ColumnDescriptor {
        ColumnDescriptor {
            name: name.to_string(),
            declared_type: ty.to_string(),
            not_null,
            primary_key: pk,
            default_value: None,
        }
    }

    fn sample_schema() -> SchemaDescriptor {
        SchemaDescriptor::new(vec![
            TableDescriptor {
                name: "orders".to_string(),
                columns: vec![
                    column("id", "INTEGER", false, true),
                    column("customer_id", "INTEGER", true, false),
                    column("category", "TEXT", false, false),
                ],
                foreign_keys: vec![ForeignKeyDescriptor {
                    column: "customer_id".to_string(),
                    references_table: "customers".to_string(),
                    references_column: "id".to_string(),
                }],
            },
            TableDescriptor {
                name: "customers".to_string(),
                columns: vec![column("id", "INTEGER", false, true)],
                foreign_keys: vec![],
            },
        ])
    }

    #[test]
    fn renders_tables_in_enumeration_order() {
        let text = format_schema_for_prompt(&sample_schema());
        let orders = text.find("Table: ORDERS").unwrap();
        let customers = text.find("Table: CUSTOMERS").unwrap();
        assert!(orders < customers);
    }

    #[test]
    fn renders_constraints_and_foreign_keys() {
        let text = format_schema_for_prompt(&sample_schema());
        assert!(text.contains("   - id: INTEGER [PRIMARY KEY]\n"));
        assert!(text.contains("   - customer_id: INTEGER [NOT NULL]\n"));
        assert!(text.contains("   - category: TEXT\n"));
        assert!(text.contains("      - customer_id -> customers.id\n"));
    }

    #[test]
    fn prompt_contains_rules_and_question() {
        let prompt = build_generation_prompt(&sample_schema(), "How many orders were placed?");
        assert!(prompt.contains("Generate ONLY SELECT statements"));
        assert!(prompt.contains("Return ONLY the SQL query without explanations"));
        assert!(prompt.contains("USER QUESTION: How many orders were placed?"));
        assert!(prompt.contains("Table: ORDERS"));
    }

    #[test]
    fn prompt_is_deterministic() {
        let schema = sample_schema();
        assert_eq!(
            build_generation_prompt(&schema, "q"),
            build_generation_prompt(&schema, "q")
        );
    }

    #[test]
    fn custom_template_is_filled() {
        let prompt =
            build_generation_prompt_with_template("S:{schema}|Q:{question}", &sample_schema(), "hi");
        assert!(prompt.starts_with("S:\nTable: ORDERS"));
        assert!(prompt.ends_with("|Q:hi"));
    }
}
