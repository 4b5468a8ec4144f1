mod commands;
mod config;
mod input;
mod logging;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde::Deserialize;
use std::path::PathBuf;
use std::process;

use commands::refinance::{CompareArgs, DiagnoseArgs, PaymentArgs};

/// Mortgage refinance comparison
#[derive(Parser)]
#[command(
    name = "refi",
    version,
    about = "Mortgage refinance comparison",
    long_about = "Compare an existing fixed-rate mortgage against a refinanced version of it. \
                  Estimates monthly-payment and total-interest savings net of refinancing \
                  costs with decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format [default: json, or `output` from the config file]
    #[arg(long, global = true)]
    output: Option<OutputFormat>,

    /// Path to a TOML config file
    #[arg(long, global = true, env = "REFI_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Monthly payment for a fixed-rate loan
    Payment(PaymentArgs),
    /// Compare current and refinanced loans in base currency units
    Compare(CompareArgs),
    /// Full refinance diagnosis from form values in display units
    Diagnose(DiagnoseArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = match config::Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };
    let format = cli.output.or(config.output).unwrap_or(OutputFormat::Json);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Payment(args) => commands::refinance::run_payment(args),
        Commands::Compare(args) => commands::refinance::run_compare(args),
        Commands::Diagnose(args) => commands::refinance::run_diagnose(args, &config),
        Commands::Version => {
            println!("refi {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&format, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
