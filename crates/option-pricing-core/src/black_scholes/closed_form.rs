use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::distributions::norm_cdf;
use crate::error::PricingError;
use crate::payoff::{breakeven, classify_moneyness, intrinsic_value, Moneyness};
use crate::types::*;
use crate::PricingResult;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Black-Scholes prices European exercise only, so no style field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlackScholesInput {
    #[serde(flatten)]
    pub market: MarketSnapshot,
    #[serde(flatten)]
    pub contract: ContractTerms,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlackScholesOutput {
    pub price: Money,
    pub d1: f64,
    pub d2: f64,
    pub discount_factor: f64,
    pub intrinsic_value: Money,
    pub time_value: Money,
    /// Price of the opposite option implied by put-call parity.
    pub put_call_parity_price: Money,
    pub moneyness: Moneyness,
    pub breakeven: Money,
}

// ---------------------------------------------------------------------------
// Closed form
// ---------------------------------------------------------------------------

struct BsParams {
    d1: f64,
    d2: f64,
    discount: f64,
}

fn compute_bs_params(s: Money, k: Money, t: Years, r: Rate, sigma: Rate) -> BsParams {
    let sigma_sqrt_t = sigma * t.sqrt();
    let d1 = ((s / k).ln() + t * (r + sigma * sigma / 2.0)) / sigma_sqrt_t;
    BsParams {
        d1,
        d2: d1 - sigma_sqrt_t,
        discount: (-r * t).exp(),
    }
}

fn closed_form(
    s: Money,
    k: Money,
    params: &BsParams,
    option_type: OptionType,
) -> PricingResult<Money> {
    if !params.discount.is_finite() {
        return Err(PricingError::NumericOverflow {
            context: "Black-Scholes discount factor".into(),
        });
    }
    let raw = match option_type {
        OptionType::Call => s * norm_cdf(params.d1) - k * params.discount * norm_cdf(params.d2),
        OptionType::Put => k * params.discount * norm_cdf(-params.d2) - s * norm_cdf(-params.d1),
    };
    // Checked before the clamp: max(NaN, 0) is 0.
    if !raw.is_finite() {
        return Err(PricingError::NumericOverflow {
            context: "Black-Scholes closed form".into(),
        });
    }
    // Deep out of the money the two terms cancel to within rounding.
    Ok(raw.max(0.0))
}

/// Black-Scholes value of a European option, validated.
pub fn bs_price(market: &MarketSnapshot, contract: &ContractTerms) -> PricingResult<Money> {
    market.validate()?;
    contract.validate()?;
    let params = compute_bs_params(
        market.spot_price,
        contract.strike_price,
        contract.time_to_expiry,
        market.risk_free_rate,
        market.volatility,
    );
    closed_form(
        market.spot_price,
        contract.strike_price,
        &params,
        contract.option_type,
    )
}

// ---------------------------------------------------------------------------
// Public API: price_black_scholes
// ---------------------------------------------------------------------------

pub fn price_black_scholes(
    input: &BlackScholesInput,
) -> PricingResult<ComputationOutput<BlackScholesOutput>> {
    let start = Instant::now();
    input.market.validate()?;
    input.contract.validate()?;

    let s = input.market.spot_price;
    let k = input.contract.strike_price;
    let t = input.contract.time_to_expiry;
    let r = input.market.risk_free_rate;
    let sigma = input.market.volatility;
    let option_type = input.contract.option_type;

    let params = compute_bs_params(s, k, t, r, sigma);
    tracing::debug!(d1 = params.d1, d2 = params.d2, "Black-Scholes parameters");
    let price = closed_form(s, k, &params, option_type)?;

    // C - P = S - K*e^(-rT)
    let forward_gap = s - k * params.discount;
    let parity_price = match option_type {
        OptionType::Call => price - forward_gap,
        OptionType::Put => price + forward_gap,
    };

    let iv = intrinsic_value(s, k, option_type);
    let output = BlackScholesOutput {
        price,
        d1: params.d1,
        d2: params.d2,
        discount_factor: params.discount,
        intrinsic_value: iv,
        time_value: price - iv,
        put_call_parity_price: parity_price.max(0.0),
        moneyness: classify_moneyness(s, k, option_type),
        breakeven: breakeven(k, price, option_type),
    };

    let assumptions = serde_json::json!({
        "model": "Black-Scholes (closed-form)",
        "spot_price": s,
        "strike_price": k,
        "time_to_expiry": t,
        "risk_free_rate": r,
        "volatility": sigma,
        "option_type": option_type,
        "exercise_style": ExerciseStyle::European,
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Black-Scholes (closed-form)",
        &assumptions,
        Vec::new(),
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
