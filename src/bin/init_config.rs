//! levercalc-init – create a default configuration file for levercalc
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use levercalc::config::{generate_commented_config_template, LOCAL_CONFIG_FILE};

#[derive(Parser, Debug)]
#[command(
    name    = "levercalc-init",
    version = env!("CARGO_PKG_VERSION"),
    about   = "Write a commented `levercalc.toml` for levercalc"
)]
struct Args {
    /// Output path (default: ./levercalc.toml)
    #[arg(short, long, default_value = LOCAL_CONFIG_FILE)]
    config: PathBuf,

    /// Overwrite if the file already exists
    #[arg(short, long)]
    force: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.config.exists() && !args.force {
        eprintln!("Config file {} exists. Use --force to overwrite.", args.config.display());
        std::process::exit(1);
    }

    generate_commented_config_template(&args.config)?;
    println!("✅ Wrote default configuration to {}", args.config.display());
    Ok(())
}
