//! Standard normal distribution functions shared by the analytic pricer.

use statrs::function::erf::erfc;
use std::f64::consts::SQRT_2;

/// 1 / sqrt(2 * pi)
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Standard normal CDF, Φ(x) = (1 + erf(x/√2)) / 2.
///
/// Evaluated through the complementary form `erfc(-x/√2) / 2`, which is the
/// same function but keeps full relative precision in the far left tail.
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Standard normal PDF: phi(x) = exp(-x^2/2) / sqrt(2*pi)
pub fn norm_pdf(x: f64) -> f64 {
    FRAC_1_SQRT_2PI * (-0.5 * x * x).exp()
}
