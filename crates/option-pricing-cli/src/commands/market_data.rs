use clap::Args;
use serde_json::Value;

use option_pricing_core::market_data::{self, HistoricalInput};

use crate::input;

/// Arguments for historical volatility estimation
#[derive(Args)]
pub struct VolatilityArgs {
    /// Path to JSON input file with dated closes
    #[arg(long)]
    pub input: Option<String>,

    /// Path to CSV file with `date,close` columns
    #[arg(long)]
    pub csv: Option<String>,

    /// Current spot price (defaults to the last close)
    #[arg(long, alias = "spot")]
    pub spot_price: Option<f64>,

    /// Simple annual risk-free rate as a decimal (e.g. 0.045)
    #[arg(long, allow_hyphen_values = true)]
    pub simple_rate: Option<f64>,
}

pub fn run_volatility(args: VolatilityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let hist_input: HistoricalInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(ref path) = args.csv {
        HistoricalInput {
            closes: input::file::read_csv(path)?,
            spot_price: args.spot_price,
            simple_rate: args.simple_rate,
        }
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input <file.json>, --csv <file.csv> or stdin required for volatility".into());
    };
    let result = market_data::estimate_market_inputs(&hist_input)?;
    Ok(serde_json::to_value(result)?)
}
