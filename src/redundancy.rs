//! Redundant-rule elimination
//!
//! A rule `ra: X → Y` is redundant with respect to `rb: X1 → Y1` iff
//! conf(ra) = conf(rb), sup(ra) = sup(rb), X1 ⊆ X and Y = Y1: `rb` is
//! at least as general and carries the same support and confidence, so `ra`
//! adds no information.
//!
//! Rules compare by derived id: a rule never eliminates another rule with
//! the same id, so byte-identical records are retained together. They both
//! disappear only when a strictly more general rule with equal
//! support/confidence exists.

use crate::pattern::Rule;
use std::collections::HashSet;
use tracing::debug;

/// Drop every rule dominated by a distinct, at-least-as-general rule with
/// equal consequent, support, and confidence. Output keeps the input order.
pub fn remove_redundant_rules(rules: Vec<Rule>) -> Vec<Rule> {
    let antecedent_sets: Vec<_> = rules.iter().map(Rule::antecedent_set).collect();
    let mut redundant_ids: HashSet<String> = HashSet::new();

    for (i, ra) in rules.iter().enumerate() {
        for (j, rb) in rules.iter().enumerate() {
            if ra.id == rb.id {
                continue;
            }
            if rb.consequent == ra.consequent
                && rb.support == ra.support
                && rb.confidence == ra.confidence
                && antecedent_sets[j].is_subset(&antecedent_sets[i])
            {
                redundant_ids.insert(ra.id.clone());
            }
        }
    }

    let before = rules.len();
    let kept: Vec<Rule> = rules
        .into_iter()
        .filter(|rule| !redundant_ids.contains(&rule.id))
        .collect();
    debug!(before, after = kept.len(), "removed redundant rules");
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(antecedent: &[u32], consequent: u32, support: u64, confidence: f64) -> Rule {
        Rule::new(antecedent.to_vec(), consequent, support, confidence).unwrap()
    }

    #[test]
    fn specific_rule_is_dominated_by_general_rule() {
        // A,B ==> C and A ==> C with equal support/confidence: the first is
        // redundant, the second stays.
        let rules = vec![rule(&[1, 2], 3, 10, 0.8), rule(&[1], 3, 10, 0.8)];
        let kept = remove_redundant_rules(rules);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].antecedent, vec![1]);
    }

    #[test]
    fn different_support_blocks_domination() {
        let rules = vec![rule(&[1, 2], 3, 10, 0.8), rule(&[1], 3, 9, 0.8)];
        assert_eq!(remove_redundant_rules(rules).len(), 2);
    }

    #[test]
    fn different_confidence_blocks_domination() {
        let rules = vec![rule(&[1, 2], 3, 10, 0.8), rule(&[1], 3, 10, 0.7)];
        assert_eq!(remove_redundant_rules(rules).len(), 2);
    }

    #[test]
    fn different_consequent_blocks_domination() {
        let rules = vec![rule(&[1, 2], 3, 10, 0.8), rule(&[1], 4, 10, 0.8)];
        assert_eq!(remove_redundant_rules(rules).len(), 2);
    }

    #[test]
    fn identical_records_retain_each_other() {
        // Same id on both sides: neither eliminates the other.
        let rules = vec![rule(&[1, 2], 3, 10, 0.8), rule(&[1, 2], 3, 10, 0.8)];
        assert_eq!(remove_redundant_rules(rules).len(), 2);
    }

    #[test]
    fn identical_records_fall_with_a_more_general_rule() {
        let rules = vec![
            rule(&[1, 2], 3, 10, 0.8),
            rule(&[1, 2], 3, 10, 0.8),
            rule(&[1], 3, 10, 0.8),
        ];
        let kept = remove_redundant_rules(rules);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].antecedent, vec![1]);
    }

    #[test]
    fn output_preserves_input_order() {
        let rules = vec![
            rule(&[5], 6, 1, 0.1),
            rule(&[1, 2], 3, 10, 0.8),
            rule(&[7], 8, 2, 0.2),
            rule(&[1], 3, 10, 0.8),
        ];
        let kept = remove_redundant_rules(rules);
        let consequents: Vec<u32> = kept.iter().map(|r| r.consequent).collect();
        assert_eq!(consequents, vec![6, 8, 3]);
    }
}
