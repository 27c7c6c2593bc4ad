pub mod path_policy;
pub mod simulation;

pub use path_policy::{AveragingConvention, LookbackConvention, McPathPolicy, McStyle};
pub use simulation::{
    price_monte_carlo, price_monte_carlo_with_rng, MonteCarloInput, MonteCarloOutput,
};
