//! Projection of forests and groups into visualization-ready tables
//!
//! The front end renders two coordinated views per analysis: a node-link
//! overview graph and one presence matrix per DAG (or one matrix for the
//! grouped itemsets). Everything emitted here is plain serde data; chart
//! wiring happens client-side.
//!
//! Matrix cells are categorical markers, not values: `A.`/`C.` mark a
//! column's item as antecedent or consequent of the row's rule (suffixed
//! with the item's tag initial in untagged mode), and itemset cells carry
//! the tag initial alone. Node codes in the overview are suffixed with
//! their DAG index so the client can correlate graph and matrix.

use crate::dag::{betweenness_centrality, NodeMode, RuleForest};
use crate::grouping;
use crate::mapping::EventMapping;
use crate::pattern::{ItemSet, Rule};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use thiserror::Error;

/// A node of the overview graph
#[derive(Debug, Clone, Serialize)]
pub struct GraphNode {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dag_index: Option<String>,
    /// Frequency driving node size (rule references, or support fraction)
    pub f: f64,
    /// Betweenness centrality driving node color
    pub c: f64,
}

/// An edge of the overview graph
#[derive(Debug, Clone, Serialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
}

/// Overview graph plus the extrema the client normalizes against
#[derive(Debug, Clone, Default, Serialize)]
pub struct GraphSummary {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub min_f: f64,
    pub max_f: f64,
    pub min_c: f64,
    pub max_c: f64,
}

/// One row of a presence matrix. Rule rows and itemset rows carry
/// `level = 1`; the appended per-group header rows carry `level = 0` and
/// empty cells.
#[derive(Debug, Clone, Serialize)]
pub struct MatrixRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rid: Option<String>,
    /// Cell markers aligned with the matrix columns
    pub cells: Vec<String>,
    /// Row sort group (consequent column index, or overlap group index)
    pub group: usize,
    pub level: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// A presence matrix: labeled columns plus rows in display order
#[derive(Debug, Clone, Serialize)]
pub struct PatternMatrix {
    pub columns: Vec<String>,
    pub rows: Vec<MatrixRow>,
}

#[derive(Error, Debug, PartialEq)]
pub enum ProjectError {
    /// A forest entry failed its topological sort. Cannot happen for
    /// forests built by this crate; guards against hand-assembled input.
    #[error("DAG {dag_index} is not acyclic")]
    CyclicDag { dag_index: usize },
}

/// Project a rule forest into one matrix per DAG plus the overview summary.
///
/// Matrix columns follow each DAG's topological order, so every antecedent
/// column of a rule appears left of reachable consequents. Row order is the
/// input rule order restricted to the DAG's rules.
pub fn project_rule_matrices(
    rules: &[Rule],
    forest: &RuleForest,
    mapping: &EventMapping,
) -> Result<(Vec<PatternMatrix>, GraphSummary), ProjectError> {
    let mut summary = GraphSummary {
        min_f: forest
            .category_frequency
            .values()
            .min()
            .copied()
            .unwrap_or(0) as f64,
        max_f: forest
            .category_frequency
            .values()
            .max()
            .copied()
            .unwrap_or(0) as f64,
        ..GraphSummary::default()
    };
    let mut matrices = Vec::with_capacity(forest.dags.len());

    for (dag_index, dag) in forest.dags.iter().enumerate() {
        let centrality = betweenness_centrality(dag.graph.adjacency());
        for &value in centrality.values() {
            // Extremes are seeded at 0 and only widened, per the reference
            // front-end contract.
            summary.min_c = summary.min_c.min(value);
            summary.max_c = summary.max_c.max(value);
        }

        let suffix = dag_index.to_string();
        for node in dag.graph.nodes() {
            let frequency = forest
                .category_frequency
                .get(&mapping.parent_or_self(node))
                .copied()
                .unwrap_or(0) as f64;
            summary.nodes.push(GraphNode {
                code: format!("{node}{suffix}"),
                name: Some(mapping.event_name(node)),
                items: None,
                dag_index: Some(suffix.clone()),
                f: frequency,
                c: centrality.get(&node).copied().unwrap_or(0.0),
            });
        }
        for (from, to) in dag.graph.edges() {
            summary.edges.push(GraphEdge {
                source: format!("{from}{suffix}"),
                target: format!("{to}{suffix}"),
            });
        }

        let order = dag
            .graph
            .topological_sort()
            .ok_or(ProjectError::CyclicDag { dag_index })?;
        matrices.push(rule_matrix(rules, &dag.rule_ids, &order, forest.mode, mapping));
    }

    Ok((matrices, summary))
}

fn rule_matrix(
    rules: &[Rule],
    member_ids: &[String],
    column_nodes: &[u32],
    mode: NodeMode,
    mapping: &EventMapping,
) -> PatternMatrix {
    let members: HashSet<&String> = member_ids.iter().collect();
    let column_of: BTreeMap<u32, usize> = column_nodes
        .iter()
        .enumerate()
        .map(|(i, &n)| (n, i))
        .collect();

    let mut rows = Vec::new();
    let mut group_order: Vec<usize> = Vec::new();

    for rule in rules.iter().filter(|r| members.contains(&r.id)) {
        let mut cells = vec![String::new(); column_nodes.len()];
        for &item in &rule.antecedent {
            if let Some(&col) = column_of.get(&mode.node_for(mapping, item)) {
                cells[col] = cell_marker('A', mode, mapping, item);
            }
        }
        let consequent_node = mode.node_for(mapping, rule.consequent);
        let Some(&group) = column_of.get(&consequent_node) else {
            continue;
        };
        cells[group] = cell_marker('C', mode, mapping, rule.consequent);
        if !group_order.contains(&group) {
            group_order.push(group);
        }

        rows.push(MatrixRow {
            rid: Some(rule.id.clone()),
            cells,
            group,
            level: 1,
            support: rule.support_fraction,
            confidence: Some(rule.confidence),
        });
    }

    // One header row per group value, in order of first appearance.
    for group in group_order {
        rows.push(MatrixRow {
            rid: None,
            cells: vec![String::new(); column_nodes.len()],
            group,
            level: 0,
            support: None,
            confidence: None,
        });
    }

    PatternMatrix {
        columns: column_nodes
            .iter()
            .map(|&n| mapping.event_name(n))
            .collect(),
        rows,
    }
}

/// Cell marker for a rule matrix: role prefix plus, in untagged mode, the
/// item's tag initial (`A.` / `A.L.`).
fn cell_marker(role: char, mode: NodeMode, mapping: &EventMapping, item: u32) -> String {
    match mode {
        NodeMode::Tagged => format!("{role}."),
        NodeMode::Untagged => match mapping.tag_initial(item) {
            Some(initial) => format!("{role}.{initial}."),
            None => format!("{role}."),
        },
    }
}

/// Project grouped itemsets into a single matrix.
///
/// Columns are the parent categories of all grouped items, in order of
/// first appearance; cells carry the item's tag initial (`I` for untagged
/// base items). Rows are ordered group by group with a `level = 0` header
/// row after each group.
pub fn project_itemset_matrix(
    itemsets: &[ItemSet],
    groups: &[Vec<usize>],
    mapping: &EventMapping,
) -> PatternMatrix {
    let mut column_codes: Vec<u32> = Vec::new();
    let mut seen: BTreeSet<u32> = BTreeSet::new();
    for group in groups {
        for &idx in group {
            for &item in &itemsets[idx].items {
                let parent = mapping.parent_or_self(item);
                if seen.insert(parent) {
                    column_codes.push(parent);
                }
            }
        }
    }
    let column_of: BTreeMap<u32, usize> = column_codes
        .iter()
        .enumerate()
        .map(|(i, &n)| (n, i))
        .collect();

    let mut rows = Vec::new();
    for (group, members) in groups.iter().enumerate() {
        for &idx in members {
            let itemset = &itemsets[idx];
            let mut cells = vec![String::new(); column_codes.len()];
            for &item in &itemset.items {
                if let Some(&col) = column_of.get(&mapping.parent_or_self(item)) {
                    cells[col] = mapping.tag_initial(item).unwrap_or('I').to_string();
                }
            }
            rows.push(MatrixRow {
                rid: Some(itemset.id.clone()),
                cells,
                group,
                level: 1,
                support: itemset.support_fraction,
                confidence: None,
            });
        }
        rows.push(MatrixRow {
            rid: None,
            cells: vec![String::new(); column_codes.len()],
            group,
            level: 0,
            support: None,
            confidence: None,
        });
    }

    PatternMatrix {
        columns: column_codes
            .iter()
            .map(|&n| mapping.event_name(n))
            .collect(),
        rows,
    }
}

/// Overview summary of the itemset intersection graph: one node per
/// itemset, edges between overlapping itemsets, support fraction as node
/// frequency.
pub fn itemset_overview(itemsets: &[ItemSet], mapping: &EventMapping) -> GraphSummary {
    let edges = grouping::overlap_edges(itemsets);

    let mut adj: BTreeMap<usize, BTreeSet<usize>> =
        (0..itemsets.len()).map(|i| (i, BTreeSet::new())).collect();
    for &(i, j) in &edges {
        adj.entry(i).or_default().insert(j);
        adj.entry(j).or_default().insert(i);
    }
    let centrality = betweenness_centrality(&adj);

    let fractions: Vec<f64> = itemsets
        .iter()
        .map(|fis| fis.support_fraction.unwrap_or(0.0))
        .collect();

    let min_f = fractions.iter().copied().fold(f64::INFINITY, f64::min);
    let max_f = fractions.iter().copied().fold(0.0, f64::max);
    let min_c = centrality.values().copied().fold(f64::INFINITY, f64::min);
    let max_c = centrality.values().copied().fold(0.0, f64::max);

    GraphSummary {
        nodes: itemsets
            .iter()
            .enumerate()
            .map(|(i, fis)| GraphNode {
                code: fis.id.clone(),
                name: None,
                items: Some(fis.items.iter().map(|&item| mapping.event_name(item)).collect()),
                dag_index: None,
                f: fractions[i],
                c: centrality.get(&i).copied().unwrap_or(0.0),
            })
            .collect(),
        edges: edges
            .iter()
            .map(|&(i, j)| GraphEdge {
                source: itemsets[i].id.clone(),
                target: itemsets[j].id.clone(),
            })
            .collect(),
        min_f: if min_f.is_finite() { min_f } else { 0.0 },
        max_f,
        min_c: if min_c.is_finite() { min_c } else { 0.0 },
        max_c,
    }
}
