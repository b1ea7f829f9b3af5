//! Command-line interface for levercalc

pub mod prompt;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::io::{BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};

use crate::config::{self, Config, InputDefaults};
use crate::report;
use crate::risk::lambda_curve::{compute_curves, LambdaCurveParams};
use crate::risk::leverage::{compute_with_policy, LeverageAnalysis};
use crate::utils::logging::{init_logging, level_for};

/// Main CLI structure using clap derive
#[derive(Debug, Parser)]
#[command(name = "levercalc", author, version)]
#[command(about = "Leverage, Kelly sizing and liquidation risk calculator", long_about = None)]
pub struct Cli {
    /// Path to the configuration file (TOML)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Never colour the risk verdict
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Command to execute; prompts interactively when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Report output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Calculator inputs given as flags. Missing ones fall back to the config file.
#[derive(Debug, Clone, Default, Args)]
pub struct InputArgs {
    /// Asset price in USD
    #[arg(long, allow_negative_numbers = true)]
    pub price: Option<f64>,
    /// Expected daily return as a decimal (0.005 = 0.5%)
    #[arg(long, allow_negative_numbers = true)]
    pub mu: Option<f64>,
    /// Daily volatility as a decimal (0.04 = 4%)
    #[arg(long, allow_negative_numbers = true)]
    pub volatility: Option<f64>,
    /// Daily funding rate as a decimal (0.0006 = 0.06%)
    #[arg(long, allow_negative_numbers = true)]
    pub funding_rate: Option<f64>,
    /// Trading fee per trade as a decimal (0.001 = 0.1%)
    #[arg(long, allow_negative_numbers = true)]
    pub trading_fee: Option<f64>,
    /// Trading capital in USD
    #[arg(long, allow_negative_numbers = true)]
    pub capital: Option<f64>,
    /// Leverage multiplier (5 = 5x)
    #[arg(long, allow_negative_numbers = true)]
    pub leverage: Option<f64>,
}

impl InputArgs {
    pub fn as_defaults(&self) -> InputDefaults {
        InputDefaults {
            price: self.price,
            mu: self.mu,
            volatility: self.volatility,
            funding_rate: self.funding_rate,
            trading_fee: self.trading_fee,
            capital: self.capital,
            leverage: self.leverage,
        }
    }
}

/// Lambda curve overrides
#[derive(Debug, Clone, Default, Args)]
pub struct SweepArgs {
    /// Quantity held (Q); repeat or list several to compare curves
    #[arg(long = "quantity", value_name = "Q", num_args = 1.., allow_negative_numbers = true)]
    pub quantities: Vec<f64>,
    /// Current price (P1)
    #[arg(long)]
    pub current_price: Option<f64>,
    /// Purchase price (P0)
    #[arg(long)]
    pub entry_price: Option<f64>,
    /// Additional wealth outside the position (V)
    #[arg(long, allow_negative_numbers = true)]
    pub wealth: Option<f64>,
    /// Lowest leverage on the grid
    #[arg(long)]
    pub min_leverage: Option<f64>,
    /// Highest leverage on the grid
    #[arg(long)]
    pub max_leverage: Option<f64>,
    /// Number of grid points, endpoints included
    #[arg(long)]
    pub points: Option<usize>,
}

impl SweepArgs {
    fn apply(&self, cfg: &config::SweepConfig) -> (LambdaCurveParams, Vec<f64>) {
        let mut params = cfg.base_params();
        if let Some(v) = self.current_price {
            params.current_price = v;
        }
        if let Some(v) = self.entry_price {
            params.entry_price = v;
        }
        if let Some(v) = self.wealth {
            params.wealth = v;
        }
        if let Some(v) = self.min_leverage {
            params.min_leverage = v;
        }
        if let Some(v) = self.max_leverage {
            params.max_leverage = v;
        }
        if let Some(v) = self.points {
            params.points = v;
        }
        let quantities =
            if self.quantities.is_empty() { cfg.quantities.clone() } else { self.quantities.clone() };
        (params, quantities)
    }
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Prompt for the seven inputs and print the analysis
    Interactive {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Compute the analysis from flags (and config defaults) without prompting
    Compute {
        #[command(flatten)]
        inputs: InputArgs,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Tabulate lambda against leverage
    Sweep {
        #[command(flatten)]
        args: SweepArgs,

        /// Also write the curve points to this CSV file
        #[arg(long, value_name = "FILE")]
        csv: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Generate a new configuration file
    Init {
        /// Output path for the config file
        #[arg(short, long, value_name = "FILE", default_value = config::LOCAL_CONFIG_FILE)]
        output: PathBuf,

        /// Generate a commented config with explanations
        #[arg(long)]
        commented: bool,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Check a configuration file for errors
    CheckConfig {
        /// Path to the configuration file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Print the default configuration to stdout
    PrintDefaultConfig,
}

impl Cli {
    /// Execute the parsed command, reading answers from `input` and writing
    /// prompts and reports to `out`.
    pub fn execute<R: BufRead, W: Write>(self, input: &mut R, out: &mut W) -> Result<()> {
        init_logging(level_for(self.verbose));
        if self.no_color {
            colored::control::set_override(false);
        }

        let config_path = self.config;
        let no_color = self.no_color;
        let load = || -> Result<(Config, bool)> {
            let config =
                Config::load_from(config_path.as_deref()).context("Failed to load configuration")?;
            let color = !no_color && config.report.color && std::io::stdout().is_terminal();
            Ok((config, color))
        };

        match self.command.unwrap_or(Commands::Interactive { format: OutputFormat::Text }) {
            | Commands::Interactive { format } => {
                let (config, color) = load()?;
                handle_interactive(input, out, &config, format, color)
            }
            | Commands::Compute { inputs, format } => {
                let (config, color) = load()?;
                handle_compute(out, &config, &inputs, format, color)
            }
            | Commands::Sweep { args, csv, format } => {
                let (config, _) = load()?;
                handle_sweep(out, &config, &args, csv.as_deref(), format)
            }
            | Commands::Init { output, commented, force } => {
                handle_init(out, &output, commented, force)
            }
            | Commands::CheckConfig { file } => handle_check_config(out, &file),
            | Commands::PrintDefaultConfig => {
                write!(out, "{}", Config::default_toml()?)?;
                Ok(())
            }
        }
    }
}

fn emit_analysis<W: Write>(
    out: &mut W, analysis: &LeverageAnalysis, cfg: &config::ReportConfig, format: OutputFormat,
    color: bool,
) -> Result<()> {
    match format {
        | OutputFormat::Json => writeln!(out, "{}", report::render_json(analysis)?)?,
        | OutputFormat::Text => {
            write!(out, "{}", report::render_body(analysis, cfg))?;
            let verdict = report::render_verdict(analysis, cfg);
            let verdict = match (color, analysis.is_liquidation_risk()) {
                | (false, _) => verdict,
                | (true, true) => verdict.red().bold().to_string(),
                | (true, false) => verdict.green().to_string(),
            };
            writeln!(out, "\n{verdict}")?;
        }
    }
    Ok(())
}

fn handle_interactive<R: BufRead, W: Write>(
    input: &mut R, out: &mut W, config: &Config, format: OutputFormat, color: bool,
) -> Result<()> {
    let inputs = prompt::read_inputs(input, out, &config.inputs, &config.report.asset_symbol)?;
    let analysis = compute_with_policy(&inputs, config.risk.zero_volatility)?;
    writeln!(out)?;
    emit_analysis(out, &analysis, &config.report, format, color)
}

fn handle_compute<W: Write>(
    out: &mut W, config: &Config, args: &InputArgs, format: OutputFormat, color: bool,
) -> Result<()> {
    let inputs = config.inputs.merged_with(&args.as_defaults()).resolve()?;
    let analysis = compute_with_policy(&inputs, config.risk.zero_volatility)?;
    emit_analysis(out, &analysis, &config.report, format, color)
}

fn handle_sweep<W: Write>(
    out: &mut W, config: &Config, args: &SweepArgs, csv: Option<&Path>, format: OutputFormat,
) -> Result<()> {
    let (base, quantities) = args.apply(&config.sweep);
    let curves = compute_curves(&base, &quantities)?;
    match format {
        | OutputFormat::Text => write!(out, "{}", report::render_curve_table(&curves))?,
        | OutputFormat::Json => writeln!(out, "{}", report::render_curves_json(&curves)?)?,
    }
    if let Some(path) = csv {
        report::write_curve_csv(path, &curves)
            .with_context(|| format!("Failed to write CSV to {}", path.display()))?;
        log::info!("Wrote lambda curve CSV to {}", path.display());
        if format == OutputFormat::Text {
            writeln!(out, "\n✅ Wrote lambda curve CSV to {}", path.display())?;
        }
    }
    Ok(())
}

fn handle_init<W: Write>(out: &mut W, output: &Path, commented: bool, force: bool) -> Result<()> {
    if output.exists() && !force {
        bail!("File already exists: {}. Use --force to overwrite.", output.display());
    }
    if commented {
        config::generate_commented_config_template(output)?;
        writeln!(out, "Generated commented configuration at: {}", output.display())?;
    } else {
        config::generate_config_template(output)?;
        writeln!(out, "Generated minimal configuration at: {}", output.display())?;
    }
    Ok(())
}

fn handle_check_config<W: Write>(out: &mut W, path: &Path) -> Result<()> {
    writeln!(out, "Checking configuration file: {}", path.display())?;

    let config = Config::from_file(path).and_then(|config| {
        config.validate()?;
        Ok(config)
    });
    match config {
        | Ok(config) => {
            writeln!(out, "✓ Configuration is valid")?;
            writeln!(out, "\nConfiguration summary:")?;
            writeln!(out, "  Asset: {}", config.report.asset_symbol)?;
            writeln!(out, "  Decimals: {}", config.report.decimals)?;
            writeln!(out, "  Zero volatility: {:?}", config.risk.zero_volatility)?;
            let preset: Vec<&str> = crate::risk::leverage::InputField::ALL
                .iter()
                .filter(|field| config.inputs.get(**field).is_some())
                .map(|field| field.name())
                .collect();
            writeln!(
                out,
                "  Input defaults: {}",
                if preset.is_empty() { "none".to_string() } else { preset.join(", ") }
            )?;
            Ok(())
        }
        | Err(e) => bail!("✗ Invalid configuration: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn run(args: &[&str], stdin: &str) -> Result<String> {
        let cli = Cli::parse_from(args);
        let mut input = Cursor::new(stdin.to_string());
        let mut output = Vec::new();
        cli.execute(&mut input, &mut output)?;
        Ok(String::from_utf8(output).unwrap())
    }

    fn config_file(dir: &Path) -> PathBuf {
        let path = dir.join("levercalc.toml");
        config::generate_config_template(&path).unwrap();
        path
    }

    #[test]
    fn verify_cli() {
        // This will panic if the CLI structure is invalid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_compute_with_negative_mu() {
        let cli = Cli::parse_from(["levercalc", "compute", "--mu", "-0.01", "--leverage", "3"]);
        if let Some(Commands::Compute { inputs, format }) = cli.command {
            assert_eq!(inputs.mu, Some(-0.01));
            assert_eq!(inputs.leverage, Some(3.0));
            assert_eq!(inputs.price, None);
            assert_eq!(format, OutputFormat::Text);
        } else {
            panic!("Expected Compute command");
        }
    }

    #[test]
    fn test_interactive_session() {
        let dir = tempdir().unwrap();
        let cfg = config_file(dir.path());
        let output = run(
            &["levercalc", "--no-color", "-c", cfg.to_str().unwrap()],
            "50000\n0.005\n0.04\n0.0006\n0.001\n1000\n5\n",
        )
        .unwrap();
        assert!(output.contains("Enter desired leverage (e.g., 5 for 5x): \n=== BTC Leverage"));
        assert!(output.contains("Kelly Criterion Leverage: 2.75x"));
        assert!(output.ends_with("Consider lowering leverage to ~2.75x.\n"));
    }

    #[test]
    fn test_interactive_malformed_input_prints_no_report() {
        let dir = tempdir().unwrap();
        let cfg = config_file(dir.path());
        let cli = Cli::parse_from(["levercalc", "--no-color", "-c", cfg.to_str().unwrap()]);
        let mut input = Cursor::new("abc\n".to_string());
        let mut output = Vec::new();
        let err = cli.execute(&mut input, &mut output).unwrap_err();
        assert!(err.to_string().contains("Invalid input for price"));
        assert!(!String::from_utf8(output).unwrap().contains("==="));
    }

    #[test]
    fn test_compute_json() {
        let dir = tempdir().unwrap();
        let cfg = config_file(dir.path());
        let output = run(
            &[
                "levercalc", "-c", cfg.to_str().unwrap(), "compute", "--price", "50000", "--mu",
                "0.005", "--volatility", "0", "--funding-rate", "0.0006", "--trading-fee",
                "0.001", "--capital", "1000", "--leverage", "5", "--format", "json",
            ],
            "",
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(value["kelly_leverage"].is_null());
        assert_eq!(value["verdict"]["status"], "manageable");
    }

    #[test]
    fn test_compute_missing_input_fails() {
        let dir = tempdir().unwrap();
        let cfg = config_file(dir.path());
        let err = run(&["levercalc", "-c", cfg.to_str().unwrap(), "compute", "--price", "1"], "")
            .unwrap_err();
        assert!(err.to_string().contains("Invalid input for mu: no value provided"));
    }

    #[test]
    fn test_sweep_with_csv() {
        let dir = tempdir().unwrap();
        let cfg = config_file(dir.path());
        let csv_path = dir.path().join("curve.csv");
        let output = run(
            &[
                "levercalc", "-c", cfg.to_str().unwrap(), "sweep", "--points", "3", "--quantity",
                "2", "--csv", csv_path.to_str().unwrap(),
            ],
            "",
        )
        .unwrap();
        assert!(output.contains("Marginal Utility (Q=2): "));
        assert!(csv_path.exists());
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("levercalc.toml");
        run(&["levercalc", "init", "-o", path.to_str().unwrap()], "").unwrap();
        assert!(path.exists());
        assert!(run(&["levercalc", "init", "-o", path.to_str().unwrap()], "").is_err());
        run(&["levercalc", "init", "-o", path.to_str().unwrap(), "--commented", "--force"], "")
            .unwrap();
    }

    #[test]
    fn test_check_config() {
        let dir = tempdir().unwrap();
        let cfg = config_file(dir.path());
        let output = run(&["levercalc", "check-config", cfg.to_str().unwrap()], "").unwrap();
        assert!(output.contains("✓ Configuration is valid"));
        assert!(output.contains("Input defaults: none"));

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "version = \"0.1.0\"\n[report]\nasset_symbol = \"\"\ndecimals = 2\ncolor = true\n")
            .unwrap();
        assert!(run(&["levercalc", "check-config", bad.to_str().unwrap()], "").is_err());
    }
}
