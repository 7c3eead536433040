//! CLI argument parsing for patsift

use crate::pipeline::PATTERN_CAP;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "patsift")]
#[command(version)]
#[command(
    about = "Post-process frequent-pattern mining output into matrices and DAG forests",
    long_about = None
)]
pub struct Cli {
    /// Mining-engine rule output (one `LHS ==> RHS #SUP: n #CONF: c` per line)
    #[arg(long, value_name = "FILE", required_unless_present = "itemsets", conflicts_with = "itemsets")]
    pub rules: Option<PathBuf>,

    /// Mining-engine itemset output (one `items #SUP: n` per line)
    #[arg(long, value_name = "FILE")]
    pub itemsets: Option<PathBuf>,

    /// Labeled sequence table: JSON array of {"id", "events"} records
    #[arg(long, value_name = "FILE")]
    pub sequences: PathBuf,

    /// Code-to-event mapping: JSON object keyed by item code
    #[arg(long, value_name = "FILE")]
    pub mapping: PathBuf,

    /// Use raw item codes as DAG nodes instead of parent categories
    #[arg(long)]
    pub tagged: bool,

    /// Skip redundant-rule removal
    #[arg(long = "keep-redundant")]
    pub keep_redundant: bool,

    /// Maximum number of patterns post-processed per call
    #[arg(long, value_name = "N", default_value_t = PATTERN_CAP)]
    pub cap: usize,

    /// Enable debug logging to stderr
    #[arg(long)]
    pub debug: bool,
}
