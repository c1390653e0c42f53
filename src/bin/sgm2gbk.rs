use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use gbk_sgm::driver::Driver;

/// Convert an SGM document to GenBank, via the SGM-legacy bridge.
#[derive(Parser, Debug)]
#[command(name = "sgm2gbk", version, about)]
struct Cli {
    /// Canonical-text SGM document to convert.
    input: PathBuf,

    /// Raise tracing verbosity to debug.
    #[arg(short, long)]
    debug: bool,

    /// Also emit a FASTA file alongside the GenBank and legacy XML output.
    #[arg(short, long)]
    fasta: bool,

    /// GenBank <-> SO ontology CSV (GenBank_Ontology,SO_Ontology).
    #[arg(long, default_value = "data/gb2so.csv")]
    gb2so: PathBuf,

    /// SO <-> GenBank ontology CSV (SO_Ontology,GenBank_Ontology).
    #[arg(long, default_value = "data/so2gb.csv")]
    so2gb: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(level))
        .init();

    let driver = Driver::new(&cli.gb2so, &cli.so2gb);
    driver
        .run_file(&cli.input, cli.fasta)
        .with_context(|| format!("failed to convert `{}`", cli.input.display()))?;

    tracing::info!(input = %cli.input.display(), "conversion complete");
    Ok(())
}
