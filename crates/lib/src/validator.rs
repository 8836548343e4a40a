//! # Statement Validator
//!
//! A lexical security gate that every candidate statement must pass before it
//! reaches storage, whether it came from the model or from the fallback table.
//!
//! This is not a parser. It over-rejects rather than under-rejects: a statement
//! is accepted only if it starts with `SELECT`, contains none of the
//! `FORBIDDEN_KEYWORDS` as a token delimited by whitespace or `;`, and matches
//! none of the injection heuristics. Verdicts are final; nothing here repairs a statement.

use crate::errors::ErrorKind;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

/// Keywords that mutate schema or data, execute code, or touch the database file.
pub const FORBIDDEN_KEYWORDS: &[&str] = &[
    "DROP", "DELETE", "INSERT", "UPDATE", "ALTER", "CREATE", "TRUNCATE", "EXEC", "EXECUTE",
    "REPLACE", "MERGE", "PRAGMA", "ATTACH", "DETACH",
];

/// `SELECT` as the first token: followed by the end of input or a non-identifier character.
static LEADING_SELECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^SELECT(?:$|[^A-Z0-9_])").expect("valid select regex"));

static FORBIDDEN_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives = FORBIDDEN_KEYWORDS.join("|");
    Regex::new(&format!(r"(?:^|[\s;])({alternatives})(?:[\s;]|$)")).expect("valid keyword regex")
});

/// Injection heuristics, checked in order against the upper-cased statement.
static INJECTION_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    let stacked = format!(r";\s*(?:{})\b", FORBIDDEN_KEYWORDS.join("|"));
    [
        ("stacked mutating statement", stacked.as_str()),
        ("inline comment", r"--"),
        ("block comment", r"/\*|\*/"),
        ("union select", r"(?s)\bUNION\b.*\bSELECT\b"),
        ("tautology", r"(?s)\bOR\b.*\b1\s*=\s*1\b"),
        ("tautology", r"(?s)\bAND\b.*\b1\s*=\s*1\b"),
    ]
    .into_iter()
    .map(|(label, pattern)| (label, Regex::new(pattern).expect("valid injection regex")))
    .collect()
});

/// Why a candidate statement was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RejectionReason {
    EmptyStatement,
    NonSelectStatement,
    ForbiddenKeyword,
    InjectionPatternDetected,
}

impl RejectionReason {
    pub fn error_kind(self) -> ErrorKind {
        match self {
            RejectionReason::EmptyStatement => ErrorKind::EmptyStatement,
            RejectionReason::NonSelectStatement => ErrorKind::NonSelectStatement,
            RejectionReason::ForbiddenKeyword => ErrorKind::ForbiddenKeyword,
            RejectionReason::InjectionPatternDetected => ErrorKind::InjectionPatternDetected,
        }
    }
}

/// The validator's decision for a single candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationVerdict {
    Accepted,
    Rejected {
        reason: RejectionReason,
        /// The keyword or pattern that triggered the rejection, if any.
        offending_token: Option<String>,
    },
}

impl ValidationVerdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationVerdict::Accepted)
    }

    fn rejected(reason: RejectionReason, token: Option<&str>) -> Self {
        ValidationVerdict::Rejected {
            reason,
            offending_token: token.map(String::from),
        }
    }
}

/// The human-readable detail for a rejection.
pub fn describe_rejection(reason: RejectionReason, offending_token: Option<&str>) -> String {
    match reason {
        RejectionReason::EmptyStatement => "Query cannot be empty".to_string(),
        RejectionReason::NonSelectStatement => {
            "Security: Only SELECT queries are allowed".to_string()
        }
        RejectionReason::ForbiddenKeyword => format!(
            "Forbidden keyword detected: {}",
            offending_token.unwrap_or("unknown")
        ),
        RejectionReason::InjectionPatternDetected => match offending_token {
            Some(pattern) => format!("Potential SQL injection detected ({pattern})"),
            None => "Potential SQL injection detected".to_string(),
        },
    }
}

impl fmt::Display for ValidationVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationVerdict::Accepted => write!(f, "Query passed security validation"),
            ValidationVerdict::Rejected {
                reason,
                offending_token,
            } => f.write_str(&describe_rejection(*reason, offending_token.as_deref())),
        }
    }
}

/// Runs every check, in order, and returns the first rejection or `Accepted`.
///
/// The statement itself is never modified; checks run against an upper-cased copy.
pub fn validate_statement(statement: &str) -> ValidationVerdict {
    let trimmed = statement.trim();
    if trimmed.is_empty() {
        return ValidationVerdict::rejected(RejectionReason::EmptyStatement, None);
    }

    let normalized = trimmed.to_uppercase();

    if !LEADING_SELECT.is_match(&normalized) {
        return ValidationVerdict::rejected(RejectionReason::NonSelectStatement, None);
    }

    if let Some(caps) = FORBIDDEN_TOKEN.captures(&normalized) {
        let keyword = caps.get(1).map(|m| m.as_str());
        return ValidationVerdict::rejected(RejectionReason::ForbiddenKeyword, keyword);
    }

    for (label, pattern) in INJECTION_PATTERNS.iter() {
        if pattern.is_match(&normalized) {
            return ValidationVerdict::rejected(
                RejectionReason::InjectionPatternDetected,
                Some(label),
            );
        }
    }

    ValidationVerdict::Accepted
}
