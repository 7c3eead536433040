//! End-to-end pipeline tests over the shared fixtures
//!
//! The fixture set is a miniature of real mining output: four sequential
//! rules (one redundant, one cycle-forcing), three itemsets forming two
//! overlap groups, and a four-sequence table.

use patsift::mapping::EventMapping;
use patsift::matcher::SequenceTable;
use patsift::pipeline::{
    run_itemsets, run_rules, select_patterns, ItemsetOptions, Outcome, RuleOptions,
};
use std::collections::BTreeSet;
use std::path::PathBuf;

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    std::fs::read_to_string(path).expect("fixture should exist")
}

fn mapping() -> EventMapping {
    EventMapping::from_json_str(&fixture("mapping.json")).expect("fixture mapping should parse")
}

fn table() -> SequenceTable {
    SequenceTable::from_json_str(&fixture("sequences.json"))
        .expect("fixture sequence table should parse")
}

#[test]
fn rule_pipeline_produces_two_dag_matrices() {
    let outcome = run_rules(
        &fixture("rules_small.txt"),
        &table(),
        &mapping(),
        &RuleOptions::default(),
    )
    .unwrap();

    let Outcome::Ready(analysis) = outcome else {
        panic!("expected ready outcome");
    };

    // `1,2 ==> 3` is dominated by `1 ==> 3` (equal support/confidence);
    // three rules survive.
    assert_eq!(analysis.rules.len(), 3);
    assert_eq!(analysis.views.counts.patterns, 3);
    assert_eq!(analysis.views.counts.sequences, 4);

    // `4 ==> 2` closes a cycle against `2 ==> 4` and opens a second DAG.
    assert_eq!(analysis.views.matrices.len(), 2);
    assert_eq!(analysis.views.matrix_columns.len(), 2);

    // Headers end with the metadata columns in order.
    let headers = &analysis.views.matrix_columns[0];
    assert_eq!(headers[headers.len() - 2..], ["support", "confidence"]);
}

#[test]
fn rule_pipeline_attaches_supporting_sequences() {
    let outcome = run_rules(
        &fixture("rules_small.txt"),
        &table(),
        &mapping(),
        &RuleOptions::default(),
    )
    .unwrap();
    let Outcome::Ready(analysis) = outcome else {
        panic!("expected ready outcome");
    };

    // 1 ==> 3: fueler before pushback in T1 and T4; T3 starts with pushback.
    let first = &analysis.rules[0];
    assert_eq!(first.antecedent, vec![1]);
    assert_eq!(
        first.supporting_sequence_ids,
        BTreeSet::from(["T1".to_string(), "T4".to_string()])
    );
    assert_eq!(first.support_fraction, Some(0.5));

    // 4 ==> 2: cleaning never precedes catering in any sequence.
    let last = &analysis.rules[2];
    assert_eq!(last.antecedent, vec![4]);
    assert!(last.supporting_sequence_ids.is_empty());
    assert_eq!(last.support_fraction, Some(0.0));

    for rule in &analysis.rules {
        let fraction = rule.support_fraction.unwrap();
        assert!((0.0..=1.0).contains(&fraction));
        assert_eq!(
            fraction,
            rule.supporting_sequence_ids.len() as f64 / 4.0
        );
    }
}

#[test]
fn rule_overview_covers_every_dag_node() {
    let outcome = run_rules(
        &fixture("rules_small.txt"),
        &table(),
        &mapping(),
        &RuleOptions::default(),
    )
    .unwrap();
    let Outcome::Ready(analysis) = outcome else {
        panic!("expected ready outcome");
    };

    let overview = &analysis.views.overview;
    // DAG 0 holds nodes {1, 2, 3, 4}; DAG 1 holds {2, 4} again.
    assert_eq!(overview.nodes.len(), 6);
    assert_eq!(overview.edges.len(), 3);
    assert!(overview.nodes.iter().any(|n| n.code == "10"));
    assert!(overview.nodes.iter().any(|n| n.code == "41"));
    assert!(overview.max_f >= overview.min_f);
    assert!(overview.max_c >= overview.min_c);
}

#[test]
fn itemset_pipeline_groups_overlapping_sets() {
    let outcome = run_itemsets(
        &fixture("itemsets_small.txt"),
        &table(),
        &mapping(),
        &ItemsetOptions::default(),
    )
    .unwrap();
    let Outcome::Ready(analysis) = outcome else {
        panic!("expected ready outcome");
    };

    assert_eq!(analysis.itemsets.len(), 3);
    // {1,2} and {2,3} share an item; {9} stands alone: 3 pattern rows plus
    // 2 group header rows.
    assert_eq!(analysis.views.matrix.rows.len(), 5);
    assert_eq!(analysis.views.overview.edges.len(), 1);
    assert_eq!(
        analysis.views.matrix_columns.last().map(String::as_str),
        Some("support")
    );

    // {1,2} appears in every sequence; {2,3} misses T2; {9} never occurs.
    assert_eq!(analysis.itemsets[0].support_fraction, Some(1.0));
    assert_eq!(analysis.itemsets[1].support_fraction, Some(0.75));
    assert_eq!(analysis.itemsets[2].support_fraction, Some(0.0));
}

#[test]
fn over_cap_input_reports_too_many() {
    let options = RuleOptions {
        cap: 2,
        ..RuleOptions::default()
    };
    let outcome = run_rules(&fixture("rules_small.txt"), &table(), &mapping(), &options).unwrap();
    assert!(matches!(outcome, Outcome::TooMany { count: 4, cap: 2 }));
}

#[test]
fn empty_mining_output_reports_empty() {
    let outcome = run_rules("", &table(), &mapping(), &RuleOptions::default()).unwrap();
    assert!(matches!(outcome, Outcome::Empty));
}

#[test]
fn malformed_record_fails_the_parse_call() {
    let text = "1 ==> 2 #SUP: 1 #CONF: 0.5\nnot a rule\n";
    let err = run_rules(text, &table(), &mapping(), &RuleOptions::default()).unwrap_err();
    assert!(err.to_string().contains("line 2"));
}

#[test]
fn selection_over_pipeline_output_matches_per_rule_ids() {
    let outcome = run_rules(
        &fixture("rules_small.txt"),
        &table(),
        &mapping(),
        &RuleOptions::default(),
    )
    .unwrap();
    let Outcome::Ready(analysis) = outcome else {
        panic!("expected ready outcome");
    };

    let ids: Vec<String> = analysis.rules.iter().map(|r| r.id.clone()).collect();
    let selection = select_patterns(&analysis.rules, &ids, &mapping());

    let mut expected = BTreeSet::new();
    for rule in &analysis.rules {
        expected.extend(rule.supporting_sequence_ids.iter().cloned());
    }
    assert_eq!(selection.sequence_ids, expected);
    assert_eq!(selection.ids_per_pattern.len(), 3);
    // All four base categories are referenced by the surviving rules.
    assert_eq!(selection.category_items, BTreeSet::from([1, 2, 3, 4]));
}

#[test]
fn pipeline_is_deterministic_across_runs() {
    let run = || {
        serde_json::to_string(
            &run_rules(
                &fixture("rules_small.txt"),
                &table(),
                &mapping(),
                &RuleOptions::default(),
            )
            .unwrap(),
        )
        .unwrap()
    };
    assert_eq!(run(), run());
}
