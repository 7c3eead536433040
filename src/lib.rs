//! patsift - post-processing analytics for frequent-pattern mining output
//!
//! This library turns the raw association-rule and frequent-itemset records
//! of an external mining engine into de-duplicated, graph-structured,
//! visualization-ready artifacts: redundancy-reduced rule sets, overlap
//! groups, acyclic rule forests with centrality/frequency scoring, and
//! row-by-column presence matrices.

pub mod cache;
pub mod cli;
pub mod dag;
pub mod filter;
pub mod grouping;
pub mod mapping;
pub mod matcher;
pub mod matrix;
pub mod parse;
pub mod pattern;
pub mod pipeline;
pub mod redundancy;
