mod error;
mod extract;
mod genes;
mod metrics;
mod report;
mod samples;
mod saturation;
mod settings;
mod util;

use anyhow;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(version, about, long_about=None)]
#[command(propagate_version = true)]
///
/// sampleqc
///
struct Cli {
    #[command(subcommand)]
    commands: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize per-sample sequencing QC and reads needed to reach a target coverage
    Report(report::ReportArgs),
    /// Keep variant table rows whose gene is in a gene list
    FilterVariants(genes::FilterArgs),
    /// Combine gene lists into one `gene,source` table
    GeneSources(genes::SourceArgs),
}

/// main CLI for sampleqc
///
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match &cli.commands {
        Commands::Report(args) => {
            report::run_report(args)?;
        }
        Commands::FilterVariants(args) => {
            genes::run_filter(args)?;
        }
        Commands::GeneSources(args) => {
            genes::run_sources(args)?;
        }
    }
    Ok(())
}
