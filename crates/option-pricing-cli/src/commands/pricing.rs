use clap::Args;
use serde_json::Value;

use option_pricing_core::binomial::{self, BinomialInput};
use option_pricing_core::black_scholes::{self, BlackScholesInput};
use option_pricing_core::comparison::{self, ComparisonInput};
use option_pricing_core::monte_carlo::{self, McPathPolicy, McStyle, MonteCarloInput};
use option_pricing_core::{ContractTerms, ExerciseStyle, MarketSnapshot, OptionType};

use crate::input;

/// Market and contract flags shared by every pricing command
#[derive(Args)]
pub struct ContractFlags {
    /// Current price of the underlying
    #[arg(long, alias = "spot")]
    pub spot_price: Option<f64>,

    /// Strike price
    #[arg(long, alias = "strike")]
    pub strike_price: Option<f64>,

    /// Time to expiry in years (e.g. 0.5 for six months)
    #[arg(long, alias = "expiry")]
    pub time_to_expiry: Option<f64>,

    /// Annualized volatility (e.g. 0.20 for 20%)
    #[arg(long, alias = "vol")]
    pub volatility: Option<f64>,

    /// Continuously compounded risk-free rate (e.g. 0.05 for 5%)
    #[arg(long, alias = "rate")]
    pub risk_free_rate: Option<f64>,

    /// call or put
    #[arg(long, default_value = "call")]
    pub option_type: OptionType,
}

impl ContractFlags {
    fn market(&self) -> Result<MarketSnapshot, Box<dyn std::error::Error>> {
        Ok(MarketSnapshot {
            spot_price: self
                .spot_price
                .ok_or("--spot-price is required (or provide --input)")?,
            volatility: self
                .volatility
                .ok_or("--volatility is required (or provide --input)")?,
            risk_free_rate: self
                .risk_free_rate
                .ok_or("--risk-free-rate is required (or provide --input)")?,
        })
    }

    fn contract(&self) -> Result<ContractTerms, Box<dyn std::error::Error>> {
        Ok(ContractTerms {
            strike_price: self
                .strike_price
                .ok_or("--strike-price is required (or provide --input)")?,
            time_to_expiry: self
                .time_to_expiry
                .ok_or("--time-to-expiry is required (or provide --input)")?,
            option_type: self.option_type,
        })
    }
}

/// Arguments for CRR binomial pricing
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct BinomialArgs {
    #[command(flatten)]
    pub contract: ContractFlags,

    /// european or american
    #[arg(long, default_value = "european")]
    pub exercise_style: ExerciseStyle,

    /// Number of lattice steps
    #[arg(long, default_value = "100")]
    pub steps: u32,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for Black-Scholes pricing
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct BlackScholesArgs {
    #[command(flatten)]
    pub contract: ContractFlags,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for Monte Carlo pricing
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct MonteCarloArgs {
    #[command(flatten)]
    pub contract: ContractFlags,

    /// european, lookback or asian
    #[arg(long, default_value = "european")]
    pub style: McStyle,

    /// Time steps per path
    #[arg(long, default_value = "252")]
    pub steps: u32,

    /// Number of simulated paths
    #[arg(long, alias = "paths", default_value = "10000")]
    pub num_paths: u32,

    /// Seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a side-by-side model comparison
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct CompareArgs {
    #[command(flatten)]
    pub contract: ContractFlags,

    /// Lattice steps for the binomial prices
    #[arg(long, default_value = "500")]
    pub binomial_steps: u32,

    /// Time steps per simulated path
    #[arg(long, default_value = "252")]
    pub mc_steps: u32,

    /// Number of simulated paths
    #[arg(long, alias = "paths", default_value = "10000")]
    pub num_paths: u32,

    /// Seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_binomial(args: BinomialArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let tree_input: BinomialInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        BinomialInput {
            market: args.contract.market()?,
            contract: args.contract.contract()?,
            exercise_style: args.exercise_style,
            steps: args.steps,
        }
    };
    let result = binomial::price_binomial(&tree_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_black_scholes(args: BlackScholesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let bs_input: BlackScholesInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        BlackScholesInput {
            market: args.contract.market()?,
            contract: args.contract.contract()?,
        }
    };
    let result = black_scholes::price_black_scholes(&bs_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_monte_carlo(args: MonteCarloArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mc_input: MonteCarloInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        MonteCarloInput {
            market: args.contract.market()?,
            contract: args.contract.contract()?,
            style: args.style,
            steps: args.steps,
            num_paths: args.num_paths,
            seed: args.seed,
            path_policy: McPathPolicy::default(),
        }
    };
    let result = monte_carlo::price_monte_carlo(&mc_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let cmp_input: ComparisonInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        ComparisonInput {
            market: args.contract.market()?,
            contract: args.contract.contract()?,
            binomial_steps: args.binomial_steps,
            mc_steps: args.mc_steps,
            num_paths: args.num_paths,
            seed: args.seed,
        }
    };
    let result = comparison::compare_models(&cmp_input)?;
    Ok(serde_json::to_value(result)?)
}
