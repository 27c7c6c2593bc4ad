use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::PricingError;
use crate::payoff::{classify_moneyness, intrinsic_value, Moneyness};
use crate::types::*;
use crate::PricingResult;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinomialInput {
    #[serde(flatten)]
    pub market: MarketSnapshot,
    #[serde(flatten)]
    pub contract: ContractTerms,
    #[serde(default)]
    pub exercise_style: ExerciseStyle,
    /// Number of lattice steps (default 100)
    #[serde(default = "default_steps")]
    pub steps: u32,
}

fn default_steps() -> u32 {
    100
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinomialOutput {
    pub price: Money,
    pub intrinsic_value: Money,
    pub time_value: Money,
    /// American value minus the European value on the same lattice.
    pub early_exercise_premium: Option<Money>,
    pub risk_neutral_probability: f64,
    pub up_factor: f64,
    pub down_factor: f64,
    pub steps: u32,
    pub moneyness: Moneyness,
}

// ---------------------------------------------------------------------------
// Lattice parameters
// ---------------------------------------------------------------------------

/// Per-step constants of a Cox-Ross-Rubinstein lattice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrrLattice {
    pub steps: u32,
    pub dt: f64,
    /// sigma * sqrt(dt), the log of the up factor.
    pub log_up: f64,
    pub up: f64,
    pub down: f64,
    pub p_up: f64,
    pub discount: f64,
}

impl CrrLattice {
    /// Derive the lattice for `steps` periods over `time_to_expiry` years.
    ///
    /// Fails with `DomainError` when the risk-neutral probability falls
    /// outside (0, 1), i.e. growth at the risk-free rate over one step is
    /// not bracketed by the down and up moves.
    pub fn new(
        time_to_expiry: Years,
        risk_free_rate: Rate,
        volatility: Rate,
        steps: u32,
    ) -> PricingResult<Self> {
        if steps < 1 {
            return Err(PricingError::invalid("steps", "must be at least 1"));
        }
        let dt = time_to_expiry / f64::from(steps);
        let log_up = volatility * dt.sqrt();
        let up = log_up.exp();
        let down = 1.0 / up;
        let growth = (risk_free_rate * dt).exp();
        let p_up = (growth - down) / (up - down);

        // Also rejects NaN from up == down when log_up underflows.
        if !(p_up > 0.0 && p_up < 1.0) {
            return Err(PricingError::DomainError(format!(
                "risk-neutral probability {p_up:.6} outside (0, 1) for dt={dt}, \
                 volatility={volatility}, rate={risk_free_rate}: lattice admits arbitrage"
            )));
        }

        Ok(CrrLattice {
            steps,
            dt,
            log_up,
            up,
            down,
            p_up,
            discount: (-risk_free_rate * dt).exp(),
        })
    }

    /// Underlying price after `ups` up-moves out of `step` moves.
    ///
    /// Since down = 1/up, S * up^ups * down^(step-ups) = S * up^(2*ups - step);
    /// evaluated through the net exponent so that large trees cannot drive an
    /// intermediate power to zero or infinity on their own.
    #[inline]
    pub fn node_price(&self, spot: Money, ups: u32, step: u32) -> Money {
        let net_ups = 2.0 * f64::from(ups) - f64::from(step);
        spot * (self.log_up * net_ups).exp()
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &BinomialInput) -> PricingResult<()> {
    input.market.validate()?;
    input.contract.validate()?;
    if input.steps < 1 {
        return Err(PricingError::invalid("steps", "must be at least 1"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Backward induction
// ---------------------------------------------------------------------------

/// Value a vanilla option on an already validated lattice.
///
/// Holds a single row of `steps + 1` node values and overwrites it in place
/// while rolling back, so memory is O(N) and time O(N^2).
pub fn roll_back(
    lattice: &CrrLattice,
    spot: Money,
    strike: Money,
    option_type: OptionType,
    early_exercise: bool,
) -> PricingResult<Money> {
    let n = lattice.steps;
    let mut values = Vec::with_capacity(n as usize + 1);

    for ups in 0..=n {
        let price = lattice.node_price(spot, ups, n);
        if !price.is_finite() {
            return Err(PricingError::NumericOverflow {
                context: format!("terminal lattice price at node {ups} of {n}"),
            });
        }
        values.push(intrinsic_value(price, strike, option_type));
    }

    let p_up = lattice.p_up;
    let p_down = 1.0 - p_up;
    let disc = lattice.discount;

    for step in (0..n).rev() {
        for i in 0..=step as usize {
            let hold = disc * (p_up * values[i + 1] + p_down * values[i]);
            values[i] = if early_exercise {
                let price = lattice.node_price(spot, i as u32, step);
                hold.max(intrinsic_value(price, strike, option_type))
            } else {
                hold
            };
        }
        values.truncate(step as usize + 1);
    }

    let value = values[0];
    if !value.is_finite() {
        return Err(PricingError::NumericOverflow {
            context: "binomial backward induction".into(),
        });
    }
    Ok(value)
}

/// Price a contract on an N-step CRR lattice and return only the value.
pub fn crr_price(
    market: &MarketSnapshot,
    contract: &ContractTerms,
    exercise_style: ExerciseStyle,
    steps: u32,
) -> PricingResult<Money> {
    market.validate()?;
    contract.validate()?;
    let lattice = CrrLattice::new(
        contract.time_to_expiry,
        market.risk_free_rate,
        market.volatility,
        steps,
    )?;
    roll_back(
        &lattice,
        market.spot_price,
        contract.strike_price,
        contract.option_type,
        exercise_style == ExerciseStyle::American,
    )
}

// ---------------------------------------------------------------------------
// Public API: price_binomial
// ---------------------------------------------------------------------------

pub fn price_binomial(
    input: &BinomialInput,
) -> PricingResult<ComputationOutput<BinomialOutput>> {
    let start = Instant::now();
    let _span = tracing::debug_span!("price_binomial", steps = input.steps).entered();
    validate_input(input)?;

    let s = input.market.spot_price;
    let k = input.contract.strike_price;
    let t = input.contract.time_to_expiry;
    let r = input.market.risk_free_rate;
    let sigma = input.market.volatility;
    let option_type = input.contract.option_type;

    let lattice = CrrLattice::new(t, r, sigma, input.steps)?;
    tracing::debug!(
        up = lattice.up,
        down = lattice.down,
        p_up = lattice.p_up,
        discount = lattice.discount,
        "CRR lattice parameters"
    );

    let european = roll_back(&lattice, s, k, option_type, false)?;
    let (price, premium) = match input.exercise_style {
        ExerciseStyle::European => (european, None),
        ExerciseStyle::American => {
            let american = roll_back(&lattice, s, k, option_type, true)?;
            (american, Some((american - european).max(0.0)))
        }
    };

    let iv = intrinsic_value(s, k, option_type);
    let output = BinomialOutput {
        price,
        intrinsic_value: iv,
        time_value: price - iv,
        early_exercise_premium: premium,
        risk_neutral_probability: lattice.p_up,
        up_factor: lattice.up,
        down_factor: lattice.down,
        steps: input.steps,
        moneyness: classify_moneyness(s, k, option_type),
    };

    let mut warnings = Vec::new();
    if input.steps < 10 {
        warnings.push(format!(
            "Coarse lattice ({} steps); discretisation error may be material",
            input.steps
        ));
    }
    if input.exercise_style == ExerciseStyle::American
        && option_type == OptionType::Call
        && r >= 0.0
    {
        warnings.push(
            "American call without dividends: early exercise is never optimal at a non-negative rate"
                .into(),
        );
    }
    for w in &warnings {
        tracing::warn!("{w}");
    }

    let methodology = match input.exercise_style {
        ExerciseStyle::European => "CRR Binomial Tree (European)",
        ExerciseStyle::American => "CRR Binomial Tree with early exercise",
    };
    let assumptions = serde_json::json!({
        "model": methodology,
        "spot_price": s,
        "strike_price": k,
        "time_to_expiry": t,
        "risk_free_rate": r,
        "volatility": sigma,
        "option_type": option_type,
        "exercise_style": input.exercise_style,
        "steps": input.steps,
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        methodology,
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
