use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Pricing models
// ---------------------------------------------------------------------------

#[napi]
pub fn price_binomial(input_json: String) -> NapiResult<String> {
    let input: option_pricing_core::binomial::BinomialInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = option_pricing_core::binomial::price_binomial(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn price_black_scholes(input_json: String) -> NapiResult<String> {
    let input: option_pricing_core::black_scholes::BlackScholesInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        option_pricing_core::black_scholes::price_black_scholes(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn price_monte_carlo(input_json: String) -> NapiResult<String> {
    let input: option_pricing_core::monte_carlo::MonteCarloInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        option_pricing_core::monte_carlo::price_monte_carlo(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_models(input_json: String) -> NapiResult<String> {
    let input: option_pricing_core::comparison::ComparisonInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = option_pricing_core::comparison::compare_models(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Market data
// ---------------------------------------------------------------------------

#[napi]
pub fn estimate_market_inputs(input_json: String) -> NapiResult<String> {
    let input: option_pricing_core::market_data::HistoricalInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        option_pricing_core::market_data::estimate_market_inputs(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn continuous_rate(simple_rate: f64) -> NapiResult<f64> {
    option_pricing_core::market_data::continuous_rate(simple_rate).map_err(to_napi_error)
}
