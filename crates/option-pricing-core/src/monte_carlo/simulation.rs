use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::distribution::Normal;
use std::time::Instant;

use super::path_policy::{McPathPolicy, McStyle, PathSummary};
use crate::error::PricingError;
use crate::payoff::intrinsic_value;
use crate::types::*;
use crate::PricingResult;

/// Paths per independently seeded block. Fixed so that the estimate does
/// not depend on how many worker threads happen to be available.
pub const PATHS_PER_CHUNK: usize = 4096;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonteCarloInput {
    #[serde(flatten)]
    pub market: MarketSnapshot,
    #[serde(flatten)]
    pub contract: ContractTerms,
    #[serde(default)]
    pub style: McStyle,
    /// Time steps per path (default 252).
    #[serde(default = "default_steps")]
    pub steps: u32,
    /// Number of simulated paths (default 10,000).
    #[serde(default = "default_num_paths")]
    pub num_paths: u32,
    /// Optional seed for reproducibility; drawn from entropy when absent.
    pub seed: Option<u64>,
    #[serde(default)]
    pub path_policy: McPathPolicy,
}

fn default_steps() -> u32 {
    252
}

fn default_num_paths() -> u32 {
    10_000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonteCarloOutput {
    pub price: Money,
    /// Sample standard deviation of discounted payoffs over sqrt(paths).
    pub standard_error: f64,
    pub confidence_interval_95: (Money, Money),
    pub num_paths: u32,
    pub steps: u32,
    pub style: McStyle,
    /// Seed that reproduces this run; `None` when an external RNG was supplied.
    pub seed: Option<u64>,
}

// ---------------------------------------------------------------------------
// Accumulation
// ---------------------------------------------------------------------------

/// Welford running mean/variance; merged pairwise across chunks.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct PayoffStats {
    count: u64,
    mean: f64,
    m2: f64,
}

impl PayoffStats {
    #[inline]
    fn push(&mut self, x: f64) {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (x - self.mean);
    }

    fn merge(self, other: PayoffStats) -> PayoffStats {
        if self.count == 0 {
            return other;
        }
        if other.count == 0 {
            return self;
        }
        let count = self.count + other.count;
        let delta = other.mean - self.mean;
        let n_a = self.count as f64;
        let n_b = other.count as f64;
        PayoffStats {
            count,
            mean: self.mean + delta * n_b / count as f64,
            m2: self.m2 + other.m2 + delta * delta * n_a * n_b / count as f64,
        }
    }

    fn standard_error(&self) -> f64 {
        if self.count < 2 {
            return 0.0;
        }
        let variance = self.m2 / (self.count - 1) as f64;
        (variance / self.count as f64).sqrt()
    }
}

// ---------------------------------------------------------------------------
// Path simulation
// ---------------------------------------------------------------------------

/// Per-call constants of the discretised GBM and the payoff.
struct PathModel {
    spot: Money,
    strike: Money,
    option_type: OptionType,
    style: McStyle,
    policy: McPathPolicy,
    steps: u32,
    drift: f64,
    diffusion: f64,
    discount: f64,
    normal: Normal,
}

impl PathModel {
    fn new(input: &MonteCarloInput) -> PricingResult<Self> {
        let t = input.contract.time_to_expiry;
        let r = input.market.risk_free_rate;
        let sigma = input.market.volatility;
        let dt = t / f64::from(input.steps);
        let normal = Normal::new(0.0, 1.0).map_err(|e| PricingError::InvalidArgument {
            field: "distribution".into(),
            reason: format!("Invalid Normal parameters: {e}"),
        })?;
        Ok(PathModel {
            spot: input.market.spot_price,
            strike: input.contract.strike_price,
            option_type: input.contract.option_type,
            style: input.style,
            policy: input.path_policy,
            steps: input.steps,
            drift: (r - sigma * sigma / 2.0) * dt,
            diffusion: sigma * dt.sqrt(),
            discount: (-r * t).exp(),
            normal,
        })
    }

    /// Simulate one path of `steps + 1` points and return its discounted payoff.
    #[inline]
    fn discounted_payoff<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let mut path = PathSummary::start(self.spot, &self.policy);
        let mut price = self.spot;
        for _ in 0..self.steps {
            let z: f64 = rng.sample(&self.normal);
            price *= (self.drift + self.diffusion * z).exp();
            path.observe(price);
        }
        let settlement = self
            .policy
            .settlement_price(self.style, self.option_type, &path);
        self.discount * intrinsic_value(settlement, self.strike, self.option_type)
    }

    fn run_paths<R: Rng + ?Sized>(&self, rng: &mut R, paths: usize) -> PayoffStats {
        let mut stats = PayoffStats::default();
        for _ in 0..paths {
            stats.push(self.discounted_payoff(rng));
        }
        stats
    }
}

/// Seed for block `chunk` of a run started from `seed`.
fn derive_chunk_seed(seed: u64, chunk: u64) -> u64 {
    seed.wrapping_add(chunk.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &MonteCarloInput) -> PricingResult<()> {
    input.market.validate()?;
    input.contract.validate()?;
    if input.steps < 1 {
        return Err(PricingError::invalid("steps", "must be at least 1"));
    }
    if input.num_paths < 1 {
        return Err(PricingError::invalid("num_paths", "must be at least 1"));
    }
    Ok(())
}

fn build_output(
    input: &MonteCarloInput,
    stats: PayoffStats,
    seed: Option<u64>,
    start: Instant,
) -> PricingResult<ComputationOutput<MonteCarloOutput>> {
    if !stats.mean.is_finite() {
        return Err(PricingError::NumericOverflow {
            context: "Monte Carlo payoff average".into(),
        });
    }
    let standard_error = stats.standard_error();
    let half_width = 1.96 * standard_error;

    let mut warnings = Vec::new();
    if input.num_paths < 2 {
        warnings.push("Single path: standard error is undefined and reported as 0".to_string());
    } else if input.num_paths < 1_000 {
        warnings.push(format!(
            "Only {} paths simulated; estimate is noisy",
            input.num_paths
        ));
    }
    for w in &warnings {
        tracing::warn!("{w}");
    }

    let output = MonteCarloOutput {
        price: stats.mean,
        standard_error,
        confidence_interval_95: ((stats.mean - half_width).max(0.0), stats.mean + half_width),
        num_paths: input.num_paths,
        steps: input.steps,
        style: input.style,
        seed,
    };

    let assumptions = serde_json::json!({
        "model": "Geometric Brownian motion, risk-neutral drift",
        "spot_price": input.market.spot_price,
        "strike_price": input.contract.strike_price,
        "time_to_expiry": input.contract.time_to_expiry,
        "risk_free_rate": input.market.risk_free_rate,
        "volatility": input.market.volatility,
        "option_type": input.contract.option_type,
        "style": input.style,
        "path_policy": input.path_policy,
        "steps": input.steps,
        "num_paths": input.num_paths,
        "seed": seed,
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Monte Carlo Simulation",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Price by simulation on the rayon pool.
///
/// Paths are split into blocks of [`PATHS_PER_CHUNK`], each with its own
/// generator seeded from `seed` and the block index. Block statistics are
/// merged in block order, so a given seed yields the same price for any
/// number of worker threads.
pub fn price_monte_carlo(
    input: &MonteCarloInput,
) -> PricingResult<ComputationOutput<MonteCarloOutput>> {
    let start = Instant::now();
    validate_input(input)?;

    let seed = input.seed.unwrap_or_else(rand::random);
    let _span = tracing::debug_span!(
        "price_monte_carlo",
        num_paths = input.num_paths,
        steps = input.steps,
        seed
    )
    .entered();

    let model = PathModel::new(input)?;
    let total = input.num_paths as usize;
    let n_chunks = total.div_ceil(PATHS_PER_CHUNK);
    tracing::debug!(
        n_chunks,
        drift = model.drift,
        diffusion = model.diffusion,
        "simulating paths"
    );

    let chunk_stats: Vec<PayoffStats> = (0..n_chunks)
        .into_par_iter()
        .map(|chunk| {
            let paths = PATHS_PER_CHUNK.min(total - chunk * PATHS_PER_CHUNK);
            let mut rng = StdRng::seed_from_u64(derive_chunk_seed(seed, chunk as u64));
            model.run_paths(&mut rng, paths)
        })
        .collect();

    let stats = chunk_stats
        .into_iter()
        .fold(PayoffStats::default(), PayoffStats::merge);

    build_output(input, stats, Some(seed), start)
}

/// Price by simulation on the calling thread, drawing from `rng`.
///
/// `input.seed` is ignored; the caller controls the random stream.
pub fn price_monte_carlo_with_rng<R: Rng + ?Sized>(
    input: &MonteCarloInput,
    rng: &mut R,
) -> PricingResult<ComputationOutput<MonteCarloOutput>> {
    let start = Instant::now();
    validate_input(input)?;
    let model = PathModel::new(input)?;
    let stats = model.run_paths(rng, input.num_paths as usize);
    build_output(input, stats, None, start)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
