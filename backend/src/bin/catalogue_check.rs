//! Validate a catalogue file and print a summary.

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use sqlegalize::outbound::catalogue::CatalogueSeed;

/// Load a catalogue file, validate it and report what it contains.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Catalogue JSON file.
    path: PathBuf,
    /// Also list every query with its state.
    #[arg(long)]
    queries: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let seed = CatalogueSeed::from_file(&cli.path)
        .wrap_err_with(|| format!("catalogue {} is invalid", cli.path.display()))?;
    let summary = seed.summary();

    let mut out = std::io::stdout().lock();
    writeln!(out, "{}: ok", cli.path.display())?;
    writeln!(
        out,
        "domains={} schemas={} tables={} queries={} accounts={} roles={}",
        summary.domains,
        summary.schemas,
        summary.tables,
        summary.queries,
        summary.accounts,
        summary.roles
    )?;
    if cli.queries {
        for (id, state) in seed.query_ids() {
            writeln!(out, "{id}\t{state}")?;
        }
    }
    Ok(())
}
