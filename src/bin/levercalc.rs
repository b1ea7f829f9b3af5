//! levercalc – leverage and liquidation risk calculator.
//!
//! Without a subcommand it prompts for the seven inputs on stdin and prints
//! the analysis on stdout.

use anyhow::Result;
use clap::Parser;
use std::io;

use levercalc::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let stdin = io::stdin();
    let stdout = io::stdout();
    cli.execute(&mut stdin.lock(), &mut stdout.lock())
}
