//! One contract priced under every model, with each price's deviation
//! from the Black-Scholes benchmark.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::binomial::crr_price;
use crate::black_scholes::bs_price;
use crate::monte_carlo::{price_monte_carlo, McPathPolicy, McStyle, MonteCarloInput};
use crate::types::*;
use crate::PricingResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonInput {
    #[serde(flatten)]
    pub market: MarketSnapshot,
    #[serde(flatten)]
    pub contract: ContractTerms,
    /// Lattice steps for both binomial runs (default 500).
    #[serde(default = "default_binomial_steps")]
    pub binomial_steps: u32,
    /// Time steps per simulated path (default 252).
    #[serde(default = "default_mc_steps")]
    pub mc_steps: u32,
    #[serde(default = "default_num_paths")]
    pub num_paths: u32,
    pub seed: Option<u64>,
}

fn default_binomial_steps() -> u32 {
    500
}

fn default_mc_steps() -> u32 {
    252
}

fn default_num_paths() -> u32 {
    10_000
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPrice {
    pub model: String,
    pub price: Money,
    pub difference_from_black_scholes: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonOutput {
    pub black_scholes: Money,
    pub binomial_european: Money,
    pub binomial_american: Money,
    pub monte_carlo: Money,
    pub monte_carlo_standard_error: f64,
    pub early_exercise_premium: Money,
    pub models: Vec<ModelPrice>,
    pub seed: Option<u64>,
}

pub fn compare_models(
    input: &ComparisonInput,
) -> PricingResult<ComputationOutput<ComparisonOutput>> {
    let start = Instant::now();
    let _span = tracing::debug_span!("compare_models").entered();

    let bs = bs_price(&input.market, &input.contract)?;
    let binomial_european = crr_price(
        &input.market,
        &input.contract,
        ExerciseStyle::European,
        input.binomial_steps,
    )?;
    let binomial_american = crr_price(
        &input.market,
        &input.contract,
        ExerciseStyle::American,
        input.binomial_steps,
    )?;
    let mc = price_monte_carlo(&MonteCarloInput {
        market: input.market,
        contract: input.contract,
        style: McStyle::European,
        steps: input.mc_steps,
        num_paths: input.num_paths,
        seed: input.seed,
        path_policy: McPathPolicy::default(),
    })?;

    let row = |model: &str, price: Money| ModelPrice {
        model: model.to_string(),
        price,
        difference_from_black_scholes: price - bs,
    };
    let models = vec![
        row("Black-Scholes", bs),
        row("Binomial (European)", binomial_european),
        row("Binomial (American)", binomial_american),
        row("Monte Carlo (European)", mc.result.price),
    ];

    let mut warnings = mc.warnings;
    let mc_gap = (mc.result.price - bs).abs();
    if mc.result.standard_error > 0.0 && mc_gap > 4.0 * mc.result.standard_error {
        warnings.push(format!(
            "Monte Carlo price differs from Black-Scholes by {mc_gap:.4}, more than 4 standard errors"
        ));
    }

    let output = ComparisonOutput {
        black_scholes: bs,
        binomial_european,
        binomial_american,
        monte_carlo: mc.result.price,
        monte_carlo_standard_error: mc.result.standard_error,
        early_exercise_premium: (binomial_american - binomial_european).max(0.0),
        models,
        seed: mc.result.seed,
    };

    let assumptions = serde_json::json!({
        "benchmark": "Black-Scholes (closed-form)",
        "spot_price": input.market.spot_price,
        "strike_price": input.contract.strike_price,
        "time_to_expiry": input.contract.time_to_expiry,
        "risk_free_rate": input.market.risk_free_rate,
        "volatility": input.market.volatility,
        "option_type": input.contract.option_type,
        "binomial_steps": input.binomial_steps,
        "mc_steps": input.mc_steps,
        "num_paths": input.num_paths,
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Model comparison against Black-Scholes",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PricingError;
    use approx::assert_abs_diff_eq;
    use pretty_assertions::assert_eq;

    fn default_put() -> ComparisonInput {
        ComparisonInput {
            market: MarketSnapshot {
                spot_price: 100.0,
                volatility: 0.20,
                risk_free_rate: 0.05,
            },
            contract: ContractTerms {
                strike_price: 100.0,
                time_to_expiry: 1.0,
                option_type: OptionType::Put,
            },
            binomial_steps: 500,
            mc_steps: 50,
            num_paths: 20_000,
            seed: Some(11),
        }
    }

    #[test]
    fn test_models_agree_with_benchmark() {
        let result = compare_models(&default_put()).unwrap().result;
        assert_abs_diff_eq!(result.black_scholes, 5.573_526_022_256_971, epsilon = 1e-9);
        assert_abs_diff_eq!(result.binomial_european, result.black_scholes, epsilon = 0.02);
        assert!(
            (result.monte_carlo - result.black_scholes).abs()
                < 4.0 * result.monte_carlo_standard_error
        );
        assert_eq!(result.seed, Some(11));
    }

    #[test]
    fn test_american_put_carries_premium() {
        let result = compare_models(&default_put()).unwrap().result;
        assert!(result.binomial_american > result.binomial_european);
        assert_abs_diff_eq!(
            result.early_exercise_premium,
            result.binomial_american - result.binomial_european,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_rows_report_differences() {
        let result = compare_models(&default_put()).unwrap().result;
        assert_eq!(result.models.len(), 4);
        assert_eq!(result.models[0].difference_from_black_scholes, 0.0);
        for row in &result.models {
            assert_abs_diff_eq!(
                row.difference_from_black_scholes,
                row.price - result.black_scholes,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_invalid_contract_rejected() {
        let mut input = default_put();
        input.contract.strike_price = -1.0;
        match compare_models(&input).unwrap_err() {
            PricingError::InvalidArgument { field, .. } => assert_eq!(field, "strike_price"),
            other => panic!("Expected InvalidArgument, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults_from_json() {
        let json = r#"{
            "spot_price": 100.0, "volatility": 0.2, "risk_free_rate": 0.05,
            "strike_price": 100.0, "time_to_expiry": 1.0, "option_type": "Call"
        }"#;
        let input: ComparisonInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.binomial_steps, 500);
        assert_eq!(input.mc_steps, 252);
        assert_eq!(input.num_paths, 10_000);
        assert_eq!(input.seed, None);
    }
}
