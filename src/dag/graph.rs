//! Minimal directed graph over item codes
//!
//! Adjacency is kept in ordered maps so every traversal is deterministic;
//! the topological sort additionally breaks ties by lowest node code, which
//! pins down one linearization per graph across repeated calls.

use std::collections::{BTreeMap, BTreeSet};

/// Directed graph with u32 nodes and unweighted edges
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiGraph {
    adj: BTreeMap<u32, BTreeSet<u32>>,
}

impl DiGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: u32) {
        self.adj.entry(node).or_default();
    }

    /// Insert an edge, creating missing endpoints. Parallel edges collapse.
    pub fn add_edge(&mut self, from: u32, to: u32) {
        self.adj.entry(from).or_default().insert(to);
        self.adj.entry(to).or_default();
    }

    pub fn node_count(&self) -> usize {
        self.adj.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adj.values().map(BTreeSet::len).sum()
    }

    pub fn nodes(&self) -> impl Iterator<Item = u32> + '_ {
        self.adj.keys().copied()
    }

    pub fn edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.adj
            .iter()
            .flat_map(|(&from, tos)| tos.iter().map(move |&to| (from, to)))
    }

    pub fn successors(&self, node: u32) -> impl Iterator<Item = u32> + '_ {
        self.adj.get(&node).into_iter().flatten().copied()
    }

    /// Adjacency view for the centrality computation
    pub(crate) fn adjacency(&self) -> &BTreeMap<u32, BTreeSet<u32>> {
        &self.adj
    }

    /// DFS cycle check with a recursion stack: a back edge means a cycle.
    pub fn is_acyclic(&self) -> bool {
        let mut visited = BTreeSet::new();
        let mut on_stack = BTreeSet::new();
        for &node in self.adj.keys() {
            if !visited.contains(&node) && self.has_cycle_from(node, &mut visited, &mut on_stack) {
                return false;
            }
        }
        true
    }

    fn has_cycle_from(
        &self,
        node: u32,
        visited: &mut BTreeSet<u32>,
        on_stack: &mut BTreeSet<u32>,
    ) -> bool {
        visited.insert(node);
        on_stack.insert(node);
        for next in self.successors(node) {
            if !visited.contains(&next) {
                if self.has_cycle_from(next, visited, on_stack) {
                    return true;
                }
            } else if on_stack.contains(&next) {
                return true;
            }
        }
        on_stack.remove(&node);
        false
    }

    /// Kahn topological sort, lowest node code first among ready nodes.
    ///
    /// Returns `None` when the graph has a cycle.
    pub fn topological_sort(&self) -> Option<Vec<u32>> {
        let mut indegree: BTreeMap<u32, usize> = self.adj.keys().map(|&n| (n, 0)).collect();
        for (_, to) in self.edges() {
            if let Some(d) = indegree.get_mut(&to) {
                *d += 1;
            }
        }

        // BTreeSet as the ready queue gives the lowest-code tie-break.
        let mut ready: BTreeSet<u32> = indegree
            .iter()
            .filter(|(_, &d)| d == 0)
            .map(|(&n, _)| n)
            .collect();
        let mut order = Vec::with_capacity(self.adj.len());

        while let Some(&node) = ready.iter().next() {
            ready.remove(&node);
            order.push(node);
            for next in self.successors(node) {
                if let Some(d) = indegree.get_mut(&next) {
                    *d -= 1;
                    if *d == 0 {
                        ready.insert(next);
                    }
                }
            }
        }

        (order.len() == self.adj.len()).then_some(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_graph_is_acyclic() {
        let g = DiGraph::new();
        assert!(g.is_acyclic());
        assert_eq!(g.topological_sort(), Some(vec![]));
    }

    #[test]
    fn chain_is_acyclic() {
        let mut g = DiGraph::new();
        g.add_edge(1, 2);
        g.add_edge(2, 3);
        assert!(g.is_acyclic());
    }

    #[test]
    fn back_edge_makes_a_cycle() {
        let mut g = DiGraph::new();
        g.add_edge(1, 2);
        g.add_edge(2, 3);
        g.add_edge(3, 1);
        assert!(!g.is_acyclic());
        assert_eq!(g.topological_sort(), None);
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let mut g = DiGraph::new();
        g.add_edge(1, 1);
        assert!(!g.is_acyclic());
    }

    #[test]
    fn parallel_edges_collapse() {
        let mut g = DiGraph::new();
        g.add_edge(1, 2);
        g.add_edge(1, 2);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn topological_sort_respects_edges() {
        let mut g = DiGraph::new();
        g.add_edge(3, 1);
        g.add_edge(1, 2);
        g.add_edge(3, 2);
        let order = g.topological_sort().unwrap();
        let pos = |n: u32| order.iter().position(|&x| x == n).unwrap();
        assert!(pos(3) < pos(1));
        assert!(pos(1) < pos(2));
    }

    #[test]
    fn topological_sort_breaks_ties_by_lowest_code() {
        // 5 and 2 are both sources; 2 must come first.
        let mut g = DiGraph::new();
        g.add_edge(5, 7);
        g.add_edge(2, 7);
        assert_eq!(g.topological_sort(), Some(vec![2, 5, 7]));
    }

    #[test]
    fn topological_sort_is_stable_across_calls() {
        let mut g = DiGraph::new();
        g.add_edge(4, 1);
        g.add_edge(4, 9);
        g.add_edge(1, 9);
        assert_eq!(g.topological_sort(), g.topological_sort());
    }
}
