//! Caller-side conversions from raw market observations to the
//! [`MarketSnapshot`] the pricers expect: close-to-close log-return
//! volatility annualized over 252 trading days, and a simple annual rate
//! converted to continuous compounding. Fetching the observations is left
//! to the caller.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::PricingError;
use crate::types::*;
use crate::PricingResult;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalInput {
    /// Closing prices in date order.
    pub closes: Vec<PricePoint>,
    /// Current spot; defaults to the last close.
    pub spot_price: Option<Money>,
    /// Simple annual risk-free rate as a decimal (0.045 = 4.5%).
    pub simple_rate: Option<Rate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalOutput {
    pub daily_volatility: Rate,
    pub annualized_volatility: Rate,
    pub observations: usize,
    pub continuous_rate: Option<Rate>,
    /// Present when a rate was supplied.
    pub snapshot: Option<MarketSnapshot>,
}

fn log_returns(closes: &[PricePoint]) -> PricingResult<Vec<f64>> {
    if closes.len() < 3 {
        return Err(PricingError::InsufficientData(format!(
            "at least 3 closes are required for a volatility estimate, got {}",
            closes.len()
        )));
    }
    for point in closes {
        ensure_positive("closes", point.close)?;
    }
    if closes.windows(2).any(|w| w[1].date <= w[0].date) {
        return Err(PricingError::invalid(
            "closes",
            "dates must be strictly increasing",
        ));
    }
    Ok(closes
        .windows(2)
        .map(|w| (w[1].close / w[0].close).ln())
        .collect())
}

/// Sample standard deviation (n - 1 denominator).
fn sample_std_dev(xs: &[f64]) -> f64 {
    let n = xs.len() as f64;
    let mean = xs.iter().sum::<f64>() / n;
    let ss = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>();
    (ss / (n - 1.0)).sqrt()
}

/// stdev(ln(close[t] / close[t-1])) * sqrt(252)
pub fn annualized_volatility(closes: &[PricePoint]) -> PricingResult<Rate> {
    let returns = log_returns(closes)?;
    Ok(sample_std_dev(&returns) * TRADING_DAYS_PER_YEAR.sqrt())
}

/// ln(1 + r) for a simple annual rate r.
pub fn continuous_rate(simple_rate: Rate) -> PricingResult<Rate> {
    ensure_finite("simple_rate", simple_rate)?;
    if simple_rate <= -1.0 {
        return Err(PricingError::invalid("simple_rate", "must be greater than -1"));
    }
    Ok(simple_rate.ln_1p())
}

/// Like [`continuous_rate`] for a rate quoted in percent (4.5 = 4.5%).
pub fn continuous_rate_from_percent(percent: f64) -> PricingResult<Rate> {
    continuous_rate(percent / 100.0)
}

/// Build a validated snapshot from a spot, a close history and a simple rate.
pub fn snapshot_from_history(
    spot_price: Money,
    closes: &[PricePoint],
    simple_rate: Rate,
) -> PricingResult<MarketSnapshot> {
    let snapshot = MarketSnapshot {
        spot_price,
        volatility: annualized_volatility(closes)?,
        risk_free_rate: continuous_rate(simple_rate)?,
    };
    snapshot.validate()?;
    Ok(snapshot)
}

pub fn estimate_market_inputs(
    input: &HistoricalInput,
) -> PricingResult<ComputationOutput<HistoricalOutput>> {
    let start = Instant::now();
    let returns = log_returns(&input.closes)?;
    let daily = sample_std_dev(&returns);
    let annualized = daily * TRADING_DAYS_PER_YEAR.sqrt();

    let continuous = input.simple_rate.map(continuous_rate).transpose()?;
    let spot = match input.spot_price {
        Some(s) => s,
        None => input.closes[input.closes.len() - 1].close,
    };
    let snapshot = match continuous {
        Some(rate) => {
            let snapshot = MarketSnapshot {
                spot_price: spot,
                volatility: annualized,
                risk_free_rate: rate,
            };
            snapshot.validate()?;
            Some(snapshot)
        }
        None => None,
    };

    let mut warnings = Vec::new();
    if returns.len() < 20 {
        warnings.push(format!(
            "Volatility estimated from only {} returns",
            returns.len()
        ));
    }

    let output = HistoricalOutput {
        daily_volatility: daily,
        annualized_volatility: annualized,
        observations: input.closes.len(),
        continuous_rate: continuous,
        snapshot,
    };

    let assumptions = serde_json::json!({
        "returns": "close-to-close log returns",
        "estimator": "sample standard deviation",
        "annualization_days": TRADING_DAYS_PER_YEAR,
        "rate_conversion": "ln(1 + simple_rate)",
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Historical volatility and continuous rate",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}
