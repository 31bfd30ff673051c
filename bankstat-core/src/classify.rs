//! Transaction classification: transfer exclusion and payee extraction.
//!
//! Both duties are deterministic text heuristics over the description.
//! No LLM, no lookup tables — ordered regex patterns cover the common
//! statement phrasings, with a word-truncation fallback for the rest.

use regex::Regex;
use std::sync::LazyLock;

use crate::transaction::{ClassifiedTransaction, Transaction};

/// Counterparty capture patterns, in priority order. First match wins.
/// The captured fragment runs up to the next hyphen.
static PAYEE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)money transferred to\s+([^-]+)",
        r"(?i)\bto\s+([^-]+)",
        r"(?i)paid to\s+([^-]+)",
        r"(?i)transfer to\s+([^-]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

const FALLBACK_WORDS: usize = 3;
const FALLBACK_CHARS: usize = 30;

/// Extract a counterparty label from a free-text description.
///
/// Total and deterministic: every description yields a label. When no
/// pattern matches, falls back to the first three words (or the first
/// 30 characters for short word counts), ellipsized when truncated.
pub fn extract_payee(description: &str) -> String {
    for re in PAYEE_PATTERNS.iter() {
        if let Some(caps) = re.captures(description) {
            return caps[1].trim().to_string();
        }
    }

    let words: Vec<&str> = description.split_whitespace().collect();
    if words.len() > FALLBACK_WORDS {
        return format!("{}...", words[..FALLBACK_WORDS].join(" "));
    }

    let trimmed = description.trim();
    if trimmed.chars().count() > FALLBACK_CHARS {
        let head: String = trimmed.chars().take(FALLBACK_CHARS).collect();
        format!("{}...", head.trim())
    } else {
        trimmed.to_string()
    }
}

/// Classifies transactions against a configured excluded-counterparty list.
#[derive(Debug, Clone)]
pub struct Classifier {
    /// Lowercased name fragments; a row is an excluded transfer iff its
    /// description contains "to <fragment>" for any of them.
    excluded: Vec<String>,
}

impl Classifier {
    pub fn new(excluded_counterparties: &[String]) -> Self {
        Self {
            excluded: excluded_counterparties
                .iter()
                .map(|n| n.trim().to_lowercase())
                .filter(|n| !n.is_empty())
                .collect(),
        }
    }

    /// Case-insensitive "to <name>" substring check.
    pub fn is_excluded_transfer(&self, description: &str) -> bool {
        let desc = description.to_lowercase();
        self.excluded
            .iter()
            .any(|name| desc.contains(&format!("to {name}")))
    }

    /// Derive a `ClassifiedTransaction`. Payee labels are only computed
    /// for expense rows; income rows never feed the payee aggregates.
    pub fn classify(&self, txn: Transaction) -> ClassifiedTransaction {
        let is_excluded_transfer = self.is_excluded_transfer(&txn.description);
        let payee = txn.is_expense().then(|| extract_payee(&txn.description));
        ClassifiedTransaction {
            txn,
            is_excluded_transfer,
            payee,
        }
    }
}
