use anyhow::{Context, Result};
use clap::Parser;
use patsift::cli::Cli;
use patsift::dag::NodeMode;
use patsift::mapping::EventMapping;
use patsift::matcher::SequenceTable;
use patsift::pipeline::{self, ItemsetOptions, RuleOptions};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let mapping_json = std::fs::read_to_string(&cli.mapping)
        .with_context(|| format!("failed to read mapping file {}", cli.mapping.display()))?;
    let mapping = EventMapping::from_json_str(&mapping_json)
        .with_context(|| format!("invalid mapping file {}", cli.mapping.display()))?;

    let sequences_json = std::fs::read_to_string(&cli.sequences)
        .with_context(|| format!("failed to read sequence table {}", cli.sequences.display()))?;
    let table = SequenceTable::from_json_str(&sequences_json)
        .with_context(|| format!("invalid sequence table {}", cli.sequences.display()))?;

    let output = if let Some(rules_path) = &cli.rules {
        let text = std::fs::read_to_string(rules_path)
            .with_context(|| format!("failed to read rule output {}", rules_path.display()))?;
        let options = RuleOptions {
            remove_redundant: !cli.keep_redundant,
            mode: if cli.tagged {
                NodeMode::Tagged
            } else {
                NodeMode::Untagged
            },
            cap: cli.cap,
        };
        let outcome = pipeline::run_rules(&text, &table, &mapping, &options)
            .context("rule pipeline failed")?;
        serde_json::to_string_pretty(&outcome)?
    } else {
        // clap guarantees exactly one of --rules/--itemsets is present.
        let itemsets_path = cli
            .itemsets
            .as_ref()
            .context("either --rules or --itemsets is required")?;
        let text = std::fs::read_to_string(itemsets_path)
            .with_context(|| format!("failed to read itemset output {}", itemsets_path.display()))?;
        let options = ItemsetOptions { cap: cli.cap };
        let outcome = pipeline::run_itemsets(&text, &table, &mapping, &options)
            .context("itemset pipeline failed")?;
        serde_json::to_string_pretty(&outcome)?
    };

    println!("{output}");
    Ok(())
}
