//! CLI entry point for the Penrose deflation tool

use clap::Parser;
use penrose_deflation::io::cli::{Cli, Runner, RunSummary, format_summaries};

fn main() -> penrose_deflation::Result<()> {
    let cli = Cli::parse();
    penrose_deflation::io::logging::init(cli.verbose)?;
    let mut runner = Runner::new(cli);
    let summaries = runner.run()?;
    report(&summaries);
    Ok(())
}

// Tile counts are the tool's output
#[allow(clippy::print_stdout)]
fn report(summaries: &[RunSummary]) {
    print!("{}", format_summaries(summaries));
}
