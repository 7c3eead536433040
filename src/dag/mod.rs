//! DAG forest construction over sequential rules
//!
//! Each rule contributes antecedent→consequent edges. Rules are inserted
//! greedily, in input order, into the first DAG that stays acyclic; a rule
//! no DAG can absorb opens a new one. The result is a forest whose members
//! each admit a topological sort, which the matrix projector turns into
//! column orders.
//!
//! The greedy first-fit packing is order-dependent and not globally optimal.
//! That is a feature of the observable grouping behavior, not an oversight.

mod centrality;
mod forest;
mod graph;

pub use centrality::betweenness_centrality;
pub use forest::{build_forest, DagEntry, DagError, NodeMode, RuleForest};
pub use graph::DiGraph;
