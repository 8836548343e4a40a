//! # Response Sanitizer
//!
//! Strips markdown fences that chat models like to wrap around SQL.

use regex::Regex;
use std::sync::LazyLock;

static OPENING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```(?:[A-Za-z0-9_-]*[ \t]*\r?\n)?").expect("valid fence regex"));
static CLOSING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n?```$").expect("valid fence regex"));

/// Removes a leading opening fence (with an optional language tag) and a trailing
/// closing fence, then trims surrounding whitespace.
///
/// Never fails: text without fences comes back trimmed but otherwise unchanged.
pub fn sanitize_response(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_open = OPENING_FENCE.replace(trimmed, "");
    let without_close = CLOSING_FENCE.replace(without_open.trim_end(), "");
    without_close.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_sql_fence() {
        let raw = "```sql\nSELECT * FROM customers\n```";
        assert_eq!(sanitize_response(raw), "SELECT * FROM customers");
    }

    #[test]
    fn strips_bare_fence_and_whitespace() {
        let raw = "  \n```\nSELECT name FROM products;\n```\n\n";
        assert_eq!(sanitize_response(raw), "SELECT name FROM products;");
    }

    #[test]
    fn leaves_plain_text_trimmed() {
        assert_eq!(
            sanitize_response("   SELECT COUNT(*) FROM orders  "),
            "SELECT COUNT(*) FROM orders"
        );
    }

    #[test]
    fn fence_only_yields_empty() {
        assert_eq!(sanitize_response("```sql\n```"), "");
    }

    #[test]
    fn single_line_fence_keeps_statement() {
        assert_eq!(sanitize_response("```SELECT 1```"), "SELECT 1");
    }

    #[test]
    fn does_not_touch_inner_backticks() {
        let raw = "SELECT `name` FROM `customers`";
        assert_eq!(sanitize_response(raw), raw);
    }
}
