//! End-to-end post-processing pipelines
//!
//! Batch transforms over fully materialized input: parse → capacity check →
//! [redundancy removal] → support attachment → forest/groups → matrices +
//! overview. Nothing here suspends, retries, or returns partial results;
//! every outcome is a deterministic function of the inputs.
//!
//! Capacity and emptiness are results, not errors: `TooMany` fires before
//! any quadratic stage runs, `Empty` replaces a zero-pattern or
//! zero-sequence computation.

use crate::dag::{build_forest, DagError, NodeMode};
use crate::grouping::group_patterns;
use crate::mapping::EventMapping;
use crate::matcher::{
    attach_itemset_support, attach_rule_support, attach_rule_support_fraction, MatchError,
    SequenceTable,
};
use crate::matrix::{
    itemset_overview, project_itemset_matrix, project_rule_matrices, GraphSummary, PatternMatrix,
    ProjectError,
};
use crate::parse::{parse_itemsets, parse_rules, ParseError};
use crate::pattern::{find_by_id, Pattern, Rule};
use crate::redundancy::remove_redundant_rules;
use serde::Serialize;
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::{debug, warn};

/// Hard cap on patterns accepted per call, checked before the quadratic
/// redundancy and DAG stages.
pub const PATTERN_CAP: usize = 2000;

/// Fatal pipeline errors. Capacity and emptiness are NOT errors; they are
/// [`Outcome`] variants.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error(transparent)]
    Dag(#[from] DagError),

    #[error(transparent)]
    Project(#[from] ProjectError),
}

/// Three-way pipeline result
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Outcome<T> {
    /// Full computation
    Ready(T),
    /// Pattern count over the cap; no post-processing was attempted
    TooMany { count: usize, cap: usize },
    /// Zero patterns or zero sequences
    Empty,
}

/// Record counts echoed to the caller
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Counts {
    pub sequences: usize,
    pub patterns: usize,
}

/// Options for the rule pipeline
#[derive(Debug, Clone)]
pub struct RuleOptions {
    pub remove_redundant: bool,
    pub mode: NodeMode,
    pub cap: usize,
}

impl Default for RuleOptions {
    fn default() -> Self {
        Self {
            remove_redundant: true,
            mode: NodeMode::Untagged,
            cap: PATTERN_CAP,
        }
    }
}

/// Visualization payload of the rule pipeline
#[derive(Debug, Clone, Serialize)]
pub struct RuleViews {
    pub overview: GraphSummary,
    pub matrices: Vec<PatternMatrix>,
    pub matrix_columns: Vec<Vec<String>>,
    pub counts: Counts,
}

/// Rule pipeline result: the enriched rules plus their views
#[derive(Debug, Clone, Serialize)]
pub struct RuleAnalysis {
    pub rules: Vec<Rule>,
    pub views: RuleViews,
}

/// Run the full rule pipeline over raw mining output.
pub fn run_rules(
    text: &str,
    table: &SequenceTable,
    mapping: &EventMapping,
    options: &RuleOptions,
) -> Result<Outcome<RuleAnalysis>, PipelineError> {
    let rules = parse_rules(text)?;
    debug!(parsed = rules.len(), "parsed rule records");

    if rules.len() > options.cap {
        return Ok(Outcome::TooMany {
            count: rules.len(),
            cap: options.cap,
        });
    }
    if rules.is_empty() || table.is_empty() {
        return Ok(Outcome::Empty);
    }

    let mut rules = if options.remove_redundant {
        remove_redundant_rules(rules)
    } else {
        rules
    };

    if table.has_simultaneous() {
        // Exact positional matching under simultaneity is combinatorially
        // expensive and the miner exposes no per-rule sequence ids.
        warn!("sequence table has simultaneous events; skipping rule-level id attribution");
        attach_rule_support_fraction(&mut rules, table.len());
    } else {
        attach_rule_support(&mut rules, table)?;
    }

    let forest = build_forest(&rules, options.mode, mapping)?;
    let (matrices, overview) = project_rule_matrices(&rules, &forest, mapping)?;
    debug!(matrices = matrices.len(), "projected rule matrices");

    let matrix_columns = matrices
        .iter()
        .map(|m| {
            let mut columns = m.columns.clone();
            columns.push("support".to_string());
            columns.push("confidence".to_string());
            columns
        })
        .collect();

    let counts = Counts {
        sequences: table.len(),
        patterns: rules.len(),
    };
    Ok(Outcome::Ready(RuleAnalysis {
        views: RuleViews {
            overview,
            matrices,
            matrix_columns,
            counts,
        },
        rules,
    }))
}

/// Options for the itemset pipeline
#[derive(Debug, Clone)]
pub struct ItemsetOptions {
    pub cap: usize,
}

impl Default for ItemsetOptions {
    fn default() -> Self {
        Self { cap: PATTERN_CAP }
    }
}

/// Visualization payload of the itemset pipeline
#[derive(Debug, Clone, Serialize)]
pub struct ItemsetViews {
    pub overview: GraphSummary,
    pub matrix: PatternMatrix,
    pub matrix_columns: Vec<String>,
    pub counts: Counts,
}

/// Itemset pipeline result
#[derive(Debug, Clone, Serialize)]
pub struct ItemsetAnalysis {
    pub itemsets: Vec<crate::pattern::ItemSet>,
    pub views: ItemsetViews,
}

/// Run the full itemset pipeline over raw mining output.
pub fn run_itemsets(
    text: &str,
    table: &SequenceTable,
    mapping: &EventMapping,
    options: &ItemsetOptions,
) -> Result<Outcome<ItemsetAnalysis>, PipelineError> {
    let mut itemsets = parse_itemsets(text)?;
    debug!(parsed = itemsets.len(), "parsed itemset records");

    if itemsets.len() > options.cap {
        return Ok(Outcome::TooMany {
            count: itemsets.len(),
            cap: options.cap,
        });
    }
    if itemsets.is_empty() || table.is_empty() {
        return Ok(Outcome::Empty);
    }

    attach_itemset_support(&mut itemsets, table);
    let groups = group_patterns(&itemsets);
    let matrix = project_itemset_matrix(&itemsets, &groups, mapping);
    let overview = itemset_overview(&itemsets, mapping);

    // Support must stay the last header for the front end.
    let mut matrix_columns = matrix.columns.clone();
    matrix_columns.push("support".to_string());

    let counts = Counts {
        sequences: table.len(),
        patterns: itemsets.len(),
    };
    Ok(Outcome::Ready(ItemsetAnalysis {
        views: ItemsetViews {
            overview,
            matrix,
            matrix_columns,
            counts,
        },
        itemsets,
    }))
}

/// Aggregated sequence attribution over a set of selected patterns
#[derive(Debug, Clone, Serialize)]
pub struct PatternSelection {
    /// Union of supporting sequence ids across the selected patterns
    pub sequence_ids: BTreeSet<String>,
    /// Supporting ids per selected pattern, in request order
    pub ids_per_pattern: Vec<Vec<String>>,
    /// Parent categories of all items used by the selected patterns
    pub category_items: BTreeSet<u32>,
}

/// Collect sequence attribution for the detail views: which sequences back
/// the selected patterns, individually and combined, and which categories
/// their items belong to. Unknown ids are skipped.
pub fn select_patterns<P: Pattern>(
    patterns: &[P],
    pattern_ids: &[String],
    mapping: &EventMapping,
) -> PatternSelection {
    let mut selection = PatternSelection {
        sequence_ids: BTreeSet::new(),
        ids_per_pattern: Vec::new(),
        category_items: BTreeSet::new(),
    };

    for id in pattern_ids {
        let Some(pattern) = find_by_id(patterns, id) else {
            debug!(%id, "selection skipped unknown pattern id");
            continue;
        };
        let ids = pattern.supporting_ids();
        selection.sequence_ids.extend(ids.iter().cloned());
        selection.ids_per_pattern.push(ids.iter().cloned().collect());
        selection.category_items.extend(
            pattern
                .item_codes()
                .iter()
                .map(|&item| mapping.parent_or_self(item)),
        );
    }

    selection
}
