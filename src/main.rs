//! CLI entry point for lattice chain reconstruction

use clap::Parser;
use latticefold::io::cli::{Cli, FileProcessor};

fn main() -> latticefold::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(cli.log_level())
        .with_target(false)
        .init();

    let mut processor = FileProcessor::new(cli);
    processor.process()
}
