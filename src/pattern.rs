//! Pattern entities produced by the mining engine
//!
//! `ItemSet` and `Rule` are plain data carriers: constructed once from parsed
//! mining output, then enriched exactly once by the sequence matcher with
//! supporting-sequence ids and a support fraction. Their ids are derived by
//! concatenating the identity fields in a fixed order, so two records with
//! identical fields collapse to the same id. This is a deterministic
//! cache-key strategy, not a hash.

use serde::Serialize;
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors raised when constructing pattern entities from parsed fields
#[derive(Error, Debug, PartialEq)]
pub enum PatternError {
    #[error("itemset has no items")]
    EmptyItemSet,

    #[error("rule has an empty antecedent")]
    EmptyAntecedent,

    #[error("confidence {0} is outside [0, 1]")]
    ConfidenceOutOfRange(f64),

    #[error("consequent {0} also appears in the antecedent")]
    SelfReferentialRule(u32),
}

/// A frequent itemset: unordered set of item codes plus its mined support
#[derive(Debug, Clone, Serialize)]
pub struct ItemSet {
    /// Item codes, unique, order-irrelevant
    pub items: BTreeSet<u32>,
    /// Raw count of transactions containing the itemset (from the miner)
    pub support: u64,
    /// support / total sequences, attached by the sequence matcher
    pub support_fraction: Option<f64>,
    /// Ids of the sequences that contain the itemset
    pub supporting_sequence_ids: BTreeSet<String>,
    /// Derived identity: sorted items + support
    pub id: String,
}

impl ItemSet {
    /// Build an itemset from item codes and a support count.
    ///
    /// Duplicate codes collapse; the item set must be non-empty.
    pub fn new(items: impl IntoIterator<Item = u32>, support: u64) -> Result<Self, PatternError> {
        let items: BTreeSet<u32> = items.into_iter().collect();
        if items.is_empty() {
            return Err(PatternError::EmptyItemSet);
        }
        let id = derive_itemset_id(&items, support);
        Ok(Self {
            items,
            support,
            support_fraction: None,
            supporting_sequence_ids: BTreeSet::new(),
            id,
        })
    }
}

/// A sequential association rule: ordered antecedent, single consequent
#[derive(Debug, Clone, Serialize)]
pub struct Rule {
    /// Antecedent item codes in mining-engine order (not necessarily sorted)
    pub antecedent: Vec<u32>,
    /// Single consequent item code
    pub consequent: u32,
    /// Raw count of sequences supporting the rule (from the miner)
    pub support: u64,
    /// Conditional confidence in [0, 1], two-decimal precision
    pub confidence: f64,
    /// support / total sequences, attached by the sequence matcher
    pub support_fraction: Option<f64>,
    /// Ids of the sequences that support the rule
    pub supporting_sequence_ids: BTreeSet<String>,
    /// Derived identity: antecedent + consequent + support + confidence×100
    pub id: String,
}

impl Rule {
    /// Build a rule, validating the confidence range and the no-self-loop
    /// invariant the downstream DAG builder relies on.
    pub fn new(
        antecedent: Vec<u32>,
        consequent: u32,
        support: u64,
        confidence: f64,
    ) -> Result<Self, PatternError> {
        if antecedent.is_empty() {
            return Err(PatternError::EmptyAntecedent);
        }
        if !(0.0..=1.0).contains(&confidence) {
            return Err(PatternError::ConfidenceOutOfRange(confidence));
        }
        if antecedent.contains(&consequent) {
            return Err(PatternError::SelfReferentialRule(consequent));
        }
        let id = derive_rule_id(&antecedent, consequent, support, confidence);
        Ok(Self {
            antecedent,
            consequent,
            support,
            confidence,
            support_fraction: None,
            supporting_sequence_ids: BTreeSet::new(),
            id,
        })
    }

    /// Antecedent items as a set, for subset tests
    pub fn antecedent_set(&self) -> BTreeSet<u32> {
        self.antecedent.iter().copied().collect()
    }
}

fn derive_itemset_id(items: &BTreeSet<u32>, support: u64) -> String {
    let mut id = String::new();
    for item in items {
        id.push_str(&item.to_string());
    }
    id.push_str(&support.to_string());
    id
}

fn derive_rule_id(antecedent: &[u32], consequent: u32, support: u64, confidence: f64) -> String {
    let mut id = String::new();
    for item in antecedent {
        id.push_str(&item.to_string());
    }
    id.push_str(&consequent.to_string());
    id.push_str(&support.to_string());
    id.push_str(&((confidence * 100.0).round() as i64).to_string());
    id
}

/// Common view over `ItemSet` and `Rule` for grouping and selection.
///
/// A rule's item set is its antecedent plus the consequent.
pub trait Pattern {
    fn pattern_id(&self) -> &str;
    fn item_codes(&self) -> BTreeSet<u32>;
    fn supporting_ids(&self) -> &BTreeSet<String>;
}

impl Pattern for ItemSet {
    fn pattern_id(&self) -> &str {
        &self.id
    }

    fn item_codes(&self) -> BTreeSet<u32> {
        self.items.clone()
    }

    fn supporting_ids(&self) -> &BTreeSet<String> {
        &self.supporting_sequence_ids
    }
}

impl Pattern for Rule {
    fn pattern_id(&self) -> &str {
        &self.id
    }

    fn item_codes(&self) -> BTreeSet<u32> {
        let mut items = self.antecedent_set();
        items.insert(self.consequent);
        items
    }

    fn supporting_ids(&self) -> &BTreeSet<String> {
        &self.supporting_sequence_ids
    }
}

/// Find a pattern by its derived id
pub fn find_by_id<'a, P: Pattern>(patterns: &'a [P], id: &str) -> Option<&'a P> {
    patterns.iter().find(|p| p.pattern_id() == id)
}
