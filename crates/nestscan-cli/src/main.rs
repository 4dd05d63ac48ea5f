//! nestscan - lists every file in directory trees and nested archives.

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    logging::init(cli.verbose, cli.quiet);

    let mut formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);
    commands::scan::execute(&cli, formatter.as_mut())
}
