mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::market_data::VolatilityArgs;
use commands::pricing::{BinomialArgs, BlackScholesArgs, CompareArgs, MonteCarloArgs};

/// European, American and path-dependent option pricing
#[derive(Parser)]
#[command(
    name = "opx",
    version,
    about = "European, American and path-dependent option pricing",
    long_about = "A CLI for pricing vanilla and path-dependent options with a CRR binomial \
                  lattice, the Black-Scholes closed form and Monte Carlo simulation. \
                  Set OPX_LOG (or RUST_LOG) to debug for diagnostics on stderr."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Price on a Cox-Ross-Rubinstein binomial lattice (European or American)
    Binomial(BinomialArgs),
    /// Price a European option with the Black-Scholes closed form
    BlackScholes(BlackScholesArgs),
    /// Price European, lookback or Asian options by simulation
    MonteCarlo(MonteCarloArgs),
    /// Price one contract under every model against Black-Scholes
    Compare(CompareArgs),
    /// Estimate annualized volatility and a continuous rate from closes
    Volatility(VolatilityArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("OPX_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Binomial(args) => commands::pricing::run_binomial(args),
        Commands::BlackScholes(args) => commands::pricing::run_black_scholes(args),
        Commands::MonteCarlo(args) => commands::pricing::run_monte_carlo(args),
        Commands::Compare(args) => commands::pricing::run_compare(args),
        Commands::Volatility(args) => commands::market_data::run_volatility(args),
        Commands::Version => {
            println!("opx {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
