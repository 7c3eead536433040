//! Grouping overlapping patterns for display row ordering
//!
//! Two patterns belong to the same group iff they are connected by a chain
//! of pairwise non-empty item-set intersections, i.e. the connected components
//! of the intersection graph. Groups only drive row ordering in the matrix
//! views; they carry no matching semantics.
//!
//! The partition is computed incrementally: each pattern joins the first
//! group it intersects, and merging happens when it intersects several.
//! This yields the same partition as a union-find over the full
//! intersection graph, for every input order (group numbering may differ).

use crate::pattern::Pattern;

/// Partition patterns into overlap groups; each group lists pattern indices.
pub fn group_patterns<P: Pattern>(patterns: &[P]) -> Vec<Vec<usize>> {
    let item_sets: Vec<_> = patterns.iter().map(Pattern::item_codes).collect();
    let mut groups: Vec<Vec<usize>> = Vec::new();

    for (i, set_i) in item_sets.iter().enumerate() {
        let hits: Vec<usize> = groups
            .iter()
            .enumerate()
            .filter(|(_, members)| {
                members
                    .iter()
                    .any(|&m| !item_sets[m].is_disjoint(set_i))
            })
            .map(|(g, _)| g)
            .collect();

        match hits.len() {
            0 => groups.push(vec![i]),
            1 => groups[hits[0]].push(i),
            _ => {
                // Pattern bridges several groups: collapse them into one.
                let mut merged = Vec::new();
                for &g in hits.iter().rev() {
                    let mut members = groups.remove(g);
                    members.append(&mut merged);
                    merged = members;
                }
                merged.push(i);
                groups.push(merged);
            }
        }
    }

    groups
}

/// Edges of the intersection graph: index pairs (i, j), i < j, whose item
/// sets overlap. Feeds the overview graph of the itemset view.
pub fn overlap_edges<P: Pattern>(patterns: &[P]) -> Vec<(usize, usize)> {
    let item_sets: Vec<_> = patterns.iter().map(Pattern::item_codes).collect();
    let mut edges = Vec::new();
    for i in 0..item_sets.len() {
        for j in (i + 1)..item_sets.len() {
            if !item_sets[i].is_disjoint(&item_sets[j]) {
                edges.push((i, j));
            }
        }
    }
    edges
}
