//! Matching mined patterns back to the sequences that support them
//!
//! The mining engine reports only aggregate support counts, so to drill down
//! from a pattern to the underlying data the matcher re-scans the labeled
//! sequence table and attaches the ids of the sequences that contain each
//! pattern, plus a support fraction.
//!
//! Itemset containment ignores order entirely; rule matching is a positional
//! precedence check: every antecedent item's first occurrence must come
//! strictly before the consequent's first occurrence. It does not verify
//! inter-antecedent ordering and it is not a subsequence-pattern match.
//!
//! Rule-level id attribution is only defined for flat sequences. For tables
//! with simultaneous-event tuples the exact positional match is
//! combinatorially expensive and the mining engine exposes no per-rule
//! sequence ids, so that path surfaces a typed error instead of an
//! approximation.

use crate::pattern::{ItemSet, Rule};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::debug;

/// One step of a sequence: a single event or a tuple of simultaneous events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Element {
    Item(u32),
    Simultaneous(Vec<u32>),
}

impl Element {
    fn contains(&self, code: u32) -> bool {
        match self {
            Element::Item(item) => *item == code,
            Element::Simultaneous(items) => items.contains(&code),
        }
    }
}

/// A labeled sequence: opaque id plus its ordered events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledSequence {
    pub id: String,
    pub events: Vec<Element>,
}

/// The full labeled sequence table, materialized in memory and read-only
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SequenceTable {
    sequences: Vec<LabeledSequence>,
}

impl SequenceTable {
    pub fn new(sequences: Vec<LabeledSequence>) -> Self {
        Self { sequences }
    }

    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LabeledSequence> {
        self.sequences.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.sequences.iter().map(|s| s.id.as_str())
    }

    /// Whether any sequence contains a simultaneous-event tuple
    pub fn has_simultaneous(&self) -> bool {
        self.sequences
            .iter()
            .any(|s| s.events.iter().any(|e| matches!(e, Element::Simultaneous(_))))
    }

    /// Keep only the sequences with the given ids, preserving table order
    pub fn retain_ids(&self, ids: &BTreeSet<String>) -> SequenceTable {
        SequenceTable {
            sequences: self
                .sequences
                .iter()
                .filter(|s| ids.contains(&s.id))
                .cloned()
                .collect(),
        }
    }
}

/// Errors for unsupported matching requests
#[derive(Error, Debug, PartialEq)]
pub enum MatchError {
    #[error(
        "rule-level sequence attribution is not defined for tables with \
         simultaneous-event tuples"
    )]
    SimultaneousEvents,
}

/// Ids of the sequences containing every item of the itemset.
///
/// Order is irrelevant; members of a simultaneous tuple count as present.
pub fn itemset_supporting_ids(itemset: &ItemSet, table: &SequenceTable) -> BTreeSet<String> {
    table
        .iter()
        .filter(|seq| {
            itemset
                .items
                .iter()
                .all(|&item| seq.events.iter().any(|e| e.contains(item)))
        })
        .map(|seq| seq.id.clone())
        .collect()
}

/// Ids of the flat sequences supporting the rule.
///
/// A sequence supports the rule iff the consequent occurs, every antecedent
/// item occurs, and each antecedent item's first occurrence index is
/// strictly below the consequent's first occurrence index.
pub fn rule_supporting_ids(
    rule: &Rule,
    table: &SequenceTable,
) -> Result<BTreeSet<String>, MatchError> {
    let mut ids = BTreeSet::new();
    for seq in table.iter() {
        let mut flat = Vec::with_capacity(seq.events.len());
        for e in &seq.events {
            match e {
                Element::Item(item) => flat.push(*item),
                Element::Simultaneous(_) => return Err(MatchError::SimultaneousEvents),
            }
        }

        let Some(consequent_at) = flat.iter().position(|&i| i == rule.consequent) else {
            continue;
        };
        let precedes = rule.antecedent.iter().all(|&item| {
            flat.iter()
                .position(|&i| i == item)
                .is_some_and(|at| at < consequent_at)
        });
        if precedes {
            ids.insert(seq.id.clone());
        }
    }
    Ok(ids)
}

/// Attach supporting ids and support fraction to every itemset.
///
/// Recomputation over the same table is idempotent. An empty table leaves
/// every fraction at 0.
pub fn attach_itemset_support(itemsets: &mut [ItemSet], table: &SequenceTable) {
    let total = table.len();
    for itemset in itemsets.iter_mut() {
        let ids = itemset_supporting_ids(itemset, table);
        itemset.support_fraction = Some(if total == 0 {
            0.0
        } else {
            ids.len() as f64 / total as f64
        });
        itemset.supporting_sequence_ids = ids;
    }
    debug!(itemsets = itemsets.len(), sequences = total, "attached itemset support");
}

/// Attach supporting ids and support fraction to every rule.
///
/// Fails for tables with simultaneous-event tuples; use
/// [`attach_rule_support_fraction`] there instead.
pub fn attach_rule_support(rules: &mut [Rule], table: &SequenceTable) -> Result<(), MatchError> {
    let total = table.len();
    for rule in rules.iter_mut() {
        let ids = rule_supporting_ids(rule, table)?;
        rule.support_fraction = Some(if total == 0 {
            0.0
        } else {
            ids.len() as f64 / total as f64
        });
        rule.supporting_sequence_ids = ids;
    }
    debug!(rules = rules.len(), sequences = total, "attached rule support");
    Ok(())
}

/// Fallback attachment from the raw mined support count, for tables where
/// id attribution is unsupported. Supporting-id sets are left empty.
pub fn attach_rule_support_fraction(rules: &mut [Rule], total_sequences: usize) {
    for rule in rules.iter_mut() {
        rule.support_fraction = Some(if total_sequences == 0 {
            0.0
        } else {
            rule.support as f64 / total_sequences as f64
        });
    }
}
