//! # Fallback Query Generator
//!
//! A deterministic phrase matcher used when the completion service is unavailable
//! or produces nothing usable. Questions are lower-cased and tested against
//! `FALLBACK_RULES` in order; the first rule whose trigger fires produces the
//! statement.
//!
//! Rule order:
//!
//! 1. customer listing (`active` refinement)
//! 2. customer count
//! 3. order listing
//! 4. order count
//! 5. product listing (category refinement)
//! 6. employee listing
//! 7. revenue by category
//! 8. top-N customers by spend

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

/// Product categories present in the demo catalog, used for category-scoped rules.
pub const PRODUCT_CATEGORIES: &[&str] = &["Electronics", "Furniture", "Kitchen"];

const DEFAULT_TOP_N: u32 = 5;
const MAX_TOP_N: u32 = 100;

static TOP_N: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\btop\s+(\d{1,3})\b").expect("valid top-n regex"));

/// How a rule decides whether it applies to a lower-cased question.
#[derive(Debug, Clone, Copy)]
pub enum Trigger {
    /// Fires if any of the phrases appears as a substring.
    AnyPhrase(&'static [&'static str]),
    /// Fires only if every word appears as a substring.
    AllWords(&'static [&'static str]),
}

impl Trigger {
    fn fires(&self, question: &str) -> bool {
        match self {
            Trigger::AnyPhrase(phrases) => phrases.iter().any(|p| question.contains(p)),
            Trigger::AllWords(words) => words.iter().all(|w| question.contains(w)),
        }
    }
}

/// What a rule produces once its trigger fires.
#[derive(Debug, Clone, Copy)]
pub enum Template {
    /// A fixed statement, optionally swapped for a refined one when a modifier word is present.
    Fixed {
        statement: &'static str,
        refinement: Option<(&'static str, &'static str)>,
    },
    /// Product listing, narrowed to a category when the question names one.
    ProductsByCategory,
    /// Revenue totals, for a named category or grouped across all of them.
    RevenueByCategory,
    /// The N biggest spenders, N taken from "top N" in the question.
    TopCustomersBySpend,
}

#[derive(Debug, Clone, Copy)]
pub struct FallbackRule {
    pub name: &'static str,
    pub trigger: Trigger,
    pub template: Template,
}

pub static FALLBACK_RULES: &[FallbackRule] = &[
    FallbackRule {
        name: "list_customers",
        trigger: Trigger::AnyPhrase(&["all customers", "show customers", "list customers"]),
        template: Template::Fixed {
            statement: "SELECT * FROM customers",
            refinement: Some(("active", "SELECT * FROM customers WHERE status = 'active'")),
        },
    },
    FallbackRule {
        name: "count_customers",
        trigger: Trigger::AnyPhrase(&["count customers", "how many customers"]),
        template: Template::Fixed {
            statement: "SELECT COUNT(*) as customer_count FROM customers",
            refinement: None,
        },
    },
    FallbackRule {
        name: "list_orders",
        trigger: Trigger::AnyPhrase(&["all orders", "show orders", "list orders"]),
        template: Template::Fixed {
            statement: "SELECT * FROM orders ORDER BY order_date DESC",
            refinement: None,
        },
    },
    FallbackRule {
        name: "count_orders",
        trigger: Trigger::AnyPhrase(&["count orders", "how many orders"]),
        template: Template::Fixed {
            statement: "SELECT COUNT(*) as order_count FROM orders",
            refinement: None,
        },
    },
    FallbackRule {
        name: "list_products",
        trigger: Trigger::AnyPhrase(&["all products", "show products", "list products"]),
        template: Template::ProductsByCategory,
    },
    FallbackRule {
        name: "list_employees",
        trigger: Trigger::AnyPhrase(&["all employees", "show employees", "list employees"]),
        template: Template::Fixed {
            statement: "SELECT * FROM employees WHERE status = 'active'",
            refinement: None,
        },
    },
    FallbackRule {
        name: "revenue_by_category",
        trigger: Trigger::AllWords(&["revenue"]),
        template: Template::RevenueByCategory,
    },
    FallbackRule {
        name: "top_customers",
        trigger: Trigger::AllWords(&["top", "customers"]),
        template: Template::TopCustomersBySpend,
    },
];

fn mentioned_category(question: &str) -> Option<&'static str> {
    PRODUCT_CATEGORIES
        .iter()
        .copied()
        .find(|c| question.contains(&c.to_lowercase()))
}

impl Template {
    /// Renders the statement, or `None` when the template needs context the question lacks.
    fn render(&self, question: &str) -> Option<String> {
        match self {
            Template::Fixed {
                statement,
                refinement,
            } => match refinement {
                Some((word, refined)) if question.contains(word) => Some(refined.to_string()),
                _ => Some(statement.to_string()),
            },
            Template::ProductsByCategory => Some(match mentioned_category(question) {
                Some(category) => format!("SELECT * FROM products WHERE category = '{category}'"),
                None => "SELECT * FROM products".to_string(),
            }),
            Template::RevenueByCategory => {
                if let Some(category) = mentioned_category(question) {
                    Some(format!(
                        "SELECT SUM(total_amount) as total_revenue FROM orders WHERE category = '{category}'"
                    ))
                } else if question.contains("by category") || question.contains("per category") {
                    Some(
                        "SELECT category, SUM(total_amount) as total_revenue FROM orders GROUP BY category ORDER BY total_revenue DESC"
                            .to_string(),
                    )
                } else {
                    None
                }
            }
            Template::TopCustomersBySpend => {
                let limit = TOP_N
                    .captures(question)
                    .and_then(|caps| caps[1].parse::<u32>().ok())
                    .filter(|n| (1..=MAX_TOP_N).contains(n))
                    .unwrap_or(DEFAULT_TOP_N);
                Some(format!(
                    "SELECT c.name, c.email, SUM(o.total_amount) as total_spent FROM customers c JOIN orders o ON c.id = o.customer_id GROUP BY c.id, c.name, c.email ORDER BY total_spent DESC LIMIT {limit}"
                ))
            }
        }
    }
}

/// Maps common question shapes onto canned statements.
#[derive(Debug, Clone, Copy)]
pub struct FallbackGenerator {
    rules: &'static [FallbackRule],
}

impl Default for FallbackGenerator {
    fn default() -> Self {
        Self {
            rules: FALLBACK_RULES,
        }
    }
}

impl FallbackGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the statement for the first matching rule, or `None` if no rule applies.
    ///
    /// A rule whose trigger fires but whose template cannot render (e.g. "revenue"
    /// with no category) does not stop the search; later rules are still tried.
    pub fn generate(&self, question: &str) -> Option<String> {
        let question = question.to_lowercase();
        for rule in self.rules {
            if !rule.trigger.fires(&question) {
                continue;
            }
            if let Some(statement) = rule.template.render(&question) {
                debug!(rule = rule.name, statement = %statement, "Fallback rule matched");
                return Some(statement);
            }
        }
        warn!("No fallback SQL pattern matched for: {question}");
        None
    }
}
