//! CLI entry point for edge-constrained tile grid generation

use clap::Parser;
use edgetile::io::cli::{Cli, GridRunner};

fn main() -> edgetile::Result<()> {
    let cli = Cli::parse();
    let mut runner = GridRunner::new(cli);
    match runner.run()? {
        Some(report) => report.ensure_solved(),
        None => Ok(()),
    }
}
