pub mod distributions;
pub mod error;
pub mod payoff;
pub mod types;

#[cfg(feature = "binomial")]
pub mod binomial;

#[cfg(feature = "black_scholes")]
pub mod black_scholes;

#[cfg(feature = "monte_carlo")]
pub mod monte_carlo;

#[cfg(feature = "market_data")]
pub mod market_data;

#[cfg(all(feature = "binomial", feature = "black_scholes", feature = "monte_carlo"))]
pub mod comparison;

pub use error::PricingError;
pub use types::*;

/// Standard result type for all pricing operations
pub type PricingResult<T> = Result<T, PricingError>;
