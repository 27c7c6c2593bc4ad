pub mod historical;

pub use historical::{
    annualized_volatility, continuous_rate, continuous_rate_from_percent,
    estimate_market_inputs, snapshot_from_history, HistoricalInput, HistoricalOutput,
    PricePoint, TRADING_DAYS_PER_YEAR,
};
