//! Foreign-key recovery from stored `CREATE TABLE` text.
//!
//! Handles both table constraints (`FOREIGN KEY (a) REFERENCES t (b)`) and column
//! constraints (`a INTEGER REFERENCES t (b)`), including composite keys.

use regex::Regex;
use std::sync::LazyLock;

/// A bare word or a `"quoted"`, `` `quoted` `` or `[bracketed]` name.
const IDENTIFIER: &str = r#""(?:[^"]|"")+"|`[^`]+`|\[[^\]]+\]|\w+"#;

static TABLE_CONSTRAINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"(?is)^\s*(?:CONSTRAINT\s+\S+\s+)?FOREIGN\s+KEY\s*\(([^)]*)\)\s*REFERENCES\s+({IDENTIFIER})\s*(?:\(([^)]*)\))?"#
    ))
    .expect("valid table constraint regex")
});

static COLUMN_CONSTRAINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"(?is)^\s*({IDENTIFIER})\s.*?\bREFERENCES\s+({IDENTIFIER})\s*(?:\(([^)]*)\))?"#
    ))
    .expect("valid column constraint regex")
});

/// A foreign-key edge as written in the DDL. `references_column` is `None` when
/// the definition relies on the referenced table's primary key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawForeignKey {
    pub column: String,
    pub references_table: String,
    pub references_column: Option<String>,
}

fn unquote(name: &str) -> String {
    let name = name.trim();
    match name.chars().next() {
        Some('"') if name.len() >= 2 => name[1..name.len() - 1].replace("\"\"", "\""),
        Some('`' | '[') if name.len() >= 2 => name[1..name.len() - 1].to_string(),
        _ => name.to_string(),
    }
}

fn identifiers(list: &str) -> Vec<String> {
    list.split(',')
        .map(unquote)
        .filter(|s| !s.is_empty())
        .collect()
}

/// The text between the first `(` and its matching `)`.
fn table_body(create_sql: &str) -> Option<&str> {
    let start = create_sql.find('(')?;
    let mut depth = 0usize;
    for (i, ch) in create_sql[start..].char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&create_sql[start + 1..start + i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Splits a table body on commas that are outside parentheses and quotes.
fn split_definitions(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut last = 0;
    for (i, ch) in body.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"' | '`') => quote = Some(ch),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(&body[last..i]);
                last = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&body[last..]);
    parts
}

/// Extracts every foreign-key edge declared in a `CREATE TABLE` statement.
pub(crate) fn parse_foreign_keys(create_sql: &str) -> Vec<RawForeignKey> {
    let Some(body) = table_body(create_sql) else {
        return Vec::new();
    };

    let mut keys = Vec::new();
    for definition in split_definitions(body) {
        if let Some(caps) = TABLE_CONSTRAINT.captures(definition) {
            let locals = identifiers(&caps[1]);
            let remotes = caps.get(3).map(|m| identifiers(m.as_str())).unwrap_or_default();
            for (i, column) in locals.into_iter().enumerate() {
                keys.push(RawForeignKey {
                    column,
                    references_table: unquote(&caps[2]),
                    references_column: remotes.get(i).cloned(),
                });
            }
        } else if let Some(caps) = COLUMN_CONSTRAINT.captures(definition) {
            let column = unquote(&caps[1]);
            if caps[1].chars().all(|c| c.is_alphanumeric() || c == '_')
                && matches!(
                    column.to_uppercase().as_str(),
                    "PRIMARY" | "UNIQUE" | "CHECK" | "CONSTRAINT"
                )
            {
                continue;
            }
            keys.push(RawForeignKey {
                column,
                references_table: unquote(&caps[2]),
                references_column: caps
                    .get(3)
                    .and_then(|m| identifiers(m.as_str()).into_iter().next()),
            });
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fk(column: &str, table: &str, target: Option<&str>) -> RawForeignKey {
        RawForeignKey {
            column: column.to_string(),
            references_table: table.to_string(),
            references_column: target.map(String::from),
        }
    }

    #[test]
    fn table_level_constraint() {
        let sql = "CREATE TABLE orders (id INTEGER PRIMARY KEY, customer_id INTEGER NOT NULL, FOREIGN KEY (customer_id) REFERENCES customers (id))";
        assert_eq!(parse_foreign_keys(sql), vec![fk("customer_id", "customers", Some("id"))]);
    }

    #[test]
    fn column_level_constraint_without_target_column() {
        let sql = "CREATE TABLE t (id INTEGER PRIMARY KEY, owner INTEGER REFERENCES users, note TEXT DEFAULT 'a,b')";
        assert_eq!(parse_foreign_keys(sql), vec![fk("owner", "users", None)]);
    }

    #[test]
    fn composite_constraint() {
        let sql = "CREATE TABLE x (a INT, b INT, CONSTRAINT fk_ab FOREIGN KEY (a, b) REFERENCES y (c, d))";
        assert_eq!(
            parse_foreign_keys(sql),
            vec![fk("a", "y", Some("c")), fk("b", "y", Some("d"))]
        );
    }

    #[test]
    fn quoted_table_and_column_names() {
        let sql = r#"CREATE TABLE "order items" ("order id" INTEGER REFERENCES "orders" (id), sku TEXT, FOREIGN KEY (sku) REFERENCES [product catalog] ("sku code"))"#;
        assert_eq!(
            parse_foreign_keys(sql),
            vec![
                fk("order id", "orders", Some("id")),
                fk("sku", "product catalog", Some("sku code")),
            ]
        );
    }

    #[test]
    fn no_foreign_keys() {
        let sql = "CREATE TABLE products (id INTEGER PRIMARY KEY, price DECIMAL(10,2) NOT NULL)";
        assert!(parse_foreign_keys(sql).is_empty());
    }
}
