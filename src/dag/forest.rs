//! Greedy assignment of rules to an acyclic forest

use crate::dag::graph::DiGraph;
use crate::mapping::EventMapping;
use crate::pattern::Rule;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

/// Node identity used throughout a forest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeMode {
    /// Raw item codes as nodes
    Tagged,
    /// Items collapsed to their parent category
    Untagged,
}

impl NodeMode {
    /// The DAG node an item code maps to under this mode
    pub fn node_for(self, mapping: &EventMapping, item: u32) -> u32 {
        match self {
            NodeMode::Tagged => item,
            NodeMode::Untagged => mapping.parent_or_self(item),
        }
    }
}

/// One member of the forest: a DAG plus the ids of the rules it absorbed
#[derive(Debug, Clone)]
pub struct DagEntry {
    pub graph: DiGraph,
    pub rule_ids: Vec<String>,
}

/// The assembled forest with the shared per-category frequency map
#[derive(Debug, Clone)]
pub struct RuleForest {
    pub dags: Vec<DagEntry>,
    /// How often each parent category is referenced across ALL input rules
    /// (antecedent and consequent alike), not just one DAG's rules.
    pub category_frequency: BTreeMap<u32, u64>,
    pub mode: NodeMode,
}

#[derive(Error, Debug, PartialEq)]
pub enum DagError {
    /// The rule is cyclic even in a fresh DAG. Only possible in untagged
    /// mode, when an antecedent and the consequent collapse to the same
    /// parent category.
    #[error("rule {rule_id} collapses to a self-edge on node {node} and fits no DAG")]
    UnresolvableRule { rule_id: String, node: u32 },
}

/// Insert every rule into the first DAG that stays acyclic, opening a new
/// DAG when none accepts it. Insertion order is input order; the packing is
/// a greedy heuristic and deliberately not globally optimal.
///
/// Assumes the parser's no-self-loop invariant; it is not re-checked here.
pub fn build_forest(
    rules: &[Rule],
    mode: NodeMode,
    mapping: &EventMapping,
) -> Result<RuleForest, DagError> {
    let mut dags: Vec<DagEntry> = Vec::new();
    let mut category_frequency: BTreeMap<u32, u64> = BTreeMap::new();

    for rule in rules {
        let mut inserted = false;
        for dag in dags.iter_mut() {
            if let Some(candidate) = try_insert(&dag.graph, rule, mode, mapping) {
                dag.graph = candidate;
                dag.rule_ids.push(rule.id.clone());
                inserted = true;
                break;
            }
        }
        if !inserted {
            let fresh = try_insert(&DiGraph::new(), rule, mode, mapping).ok_or_else(|| {
                DagError::UnresolvableRule {
                    rule_id: rule.id.clone(),
                    node: mode.node_for(mapping, rule.consequent),
                }
            })?;
            dags.push(DagEntry {
                graph: fresh,
                rule_ids: vec![rule.id.clone()],
            });
        }

        for &item in rule.antecedent.iter().chain(std::iter::once(&rule.consequent)) {
            *category_frequency
                .entry(mapping.parent_or_self(item))
                .or_insert(0) += 1;
        }
    }

    debug!(rules = rules.len(), dags = dags.len(), "built DAG forest");
    Ok(RuleForest {
        dags,
        category_frequency,
        mode,
    })
}

/// Copy-check-commit insertion: the candidate graph is returned only when
/// the rule's edges keep it acyclic.
fn try_insert(graph: &DiGraph, rule: &Rule, mode: NodeMode, mapping: &EventMapping) -> Option<DiGraph> {
    let mut candidate = graph.clone();
    let consequent = mode.node_for(mapping, rule.consequent);
    for &item in &rule.antecedent {
        candidate.add_edge(mode.node_for(mapping, item), consequent);
    }
    candidate.is_acyclic().then_some(candidate)
}
