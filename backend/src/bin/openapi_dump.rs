//! Print the OpenAPI document.

use std::io::Write;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Result, WrapErr};
use sqlegalize::ApiDoc;
use utoipa::OpenApi;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

/// Print the relations API OpenAPI document to stdout.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let doc = ApiDoc::openapi();
    let rendered = match cli.format {
        Format::Json => doc.to_pretty_json().wrap_err("serialise OpenAPI as JSON")?,
        Format::Yaml => doc.to_yaml().wrap_err("serialise OpenAPI as YAML")?,
    };
    writeln!(std::io::stdout().lock(), "{rendered}").wrap_err("write OpenAPI document")?;
    Ok(())
}
