//! Parsers for the mining engine's newline-delimited output
//!
//! Two record formats are accepted, one record per line:
//!
//! - Itemset: `<item> <item> ... #SUP: <n>`
//! - Rule:    `<item>,<item>,... ==> <consequent> #SUP: <n> #CONF: <c>`
//!
//! Input order is preserved and nothing is deduplicated here; redundancy
//! removal is a separate stage. A malformed record fails the whole parse
//! call, surfaced with its line number.

use crate::pattern::{ItemSet, PatternError, Rule};
use thiserror::Error;

/// Errors for malformed mining-engine records
#[derive(Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("line {line}: missing '#SUP:' marker")]
    MissingSupportMarker { line: usize },

    #[error("line {line}: missing '==>' separator")]
    MissingRuleSeparator { line: usize },

    #[error("line {line}: missing '#CONF:' marker")]
    MissingConfidenceMarker { line: usize },

    #[error("line {line}: invalid item code {token:?}")]
    InvalidItem { line: usize, token: String },

    #[error("line {line}: invalid support count {token:?}")]
    InvalidSupport { line: usize, token: String },

    #[error("line {line}: invalid confidence {token:?}")]
    InvalidConfidence { line: usize, token: String },

    #[error("line {line}: {source}")]
    InvalidPattern {
        line: usize,
        #[source]
        source: PatternError,
    },
}

/// Parse rule records, one per non-empty line, preserving input order.
pub fn parse_rules(text: &str) -> Result<Vec<Rule>, ParseError> {
    let mut rules = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        if raw.trim().is_empty() {
            continue;
        }
        rules.push(parse_rule_line(raw, line)?);
    }
    Ok(rules)
}

/// Parse itemset records, one per non-empty line, preserving input order.
pub fn parse_itemsets(text: &str) -> Result<Vec<ItemSet>, ParseError> {
    let mut itemsets = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        if raw.trim().is_empty() {
            continue;
        }
        itemsets.push(parse_itemset_line(raw, line)?);
    }
    Ok(itemsets)
}

fn parse_rule_line(raw: &str, line: usize) -> Result<Rule, ParseError> {
    let (lhs, rest) = raw
        .split_once("==>")
        .ok_or(ParseError::MissingRuleSeparator { line })?;

    let antecedent = lhs
        .split(',')
        .map(|token| parse_item(token.trim(), line))
        .collect::<Result<Vec<u32>, ParseError>>()?;

    // After the separator the miner emits: <consequent> #SUP: <n> #CONF: <c>
    let tokens: Vec<&str> = rest.split_whitespace().collect();
    if tokens.len() < 3 || tokens[1] != "#SUP:" {
        return Err(ParseError::MissingSupportMarker { line });
    }
    if tokens.len() < 5 || tokens[3] != "#CONF:" {
        return Err(ParseError::MissingConfidenceMarker { line });
    }

    let consequent = parse_item(tokens[0], line)?;
    let support = tokens[2]
        .parse::<u64>()
        .map_err(|_| ParseError::InvalidSupport {
            line,
            token: tokens[2].to_string(),
        })?;
    let confidence = tokens[4]
        .parse::<f64>()
        .map_err(|_| ParseError::InvalidConfidence {
            line,
            token: tokens[4].to_string(),
        })?;
    // Two-decimal precision; the derived id encodes confidence as an integer
    // percentage, so finer precision would produce unstable ids.
    let confidence = (confidence * 100.0).round() / 100.0;

    Rule::new(antecedent, consequent, support, confidence)
        .map_err(|source| ParseError::InvalidPattern { line, source })
}

fn parse_itemset_line(raw: &str, line: usize) -> Result<ItemSet, ParseError> {
    let (items_part, support_part) = raw
        .split_once("#SUP:")
        .ok_or(ParseError::MissingSupportMarker { line })?;

    let items = items_part
        .split_whitespace()
        .map(|token| parse_item(token, line))
        .collect::<Result<Vec<u32>, ParseError>>()?;

    let support_token = support_part.trim();
    let support = support_token
        .parse::<u64>()
        .map_err(|_| ParseError::InvalidSupport {
            line,
            token: support_token.to_string(),
        })?;

    ItemSet::new(items, support).map_err(|source| ParseError::InvalidPattern { line, source })
}

fn parse_item(token: &str, line: usize) -> Result<u32, ParseError> {
    token.parse::<u32>().map_err(|_| ParseError::InvalidItem {
        line,
        token: token.to_string(),
    })
}
