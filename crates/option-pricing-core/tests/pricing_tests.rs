#![cfg(all(feature = "binomial", feature = "black_scholes", feature = "monte_carlo"))]

use approx::assert_abs_diff_eq;
use option_pricing_core::binomial::{crr_price, price_binomial, BinomialInput};
use option_pricing_core::black_scholes::{bs_price, price_black_scholes, BlackScholesInput};
use option_pricing_core::monte_carlo::{price_monte_carlo, McStyle, MonteCarloInput};
use option_pricing_core::{ContractTerms, ExerciseStyle, MarketSnapshot, OptionType, PricingError};
use pretty_assertions::assert_eq;

// ===========================================================================
// Cross-model scenarios on the standard contract:
// S = 100, K = 100, T = 1y, sigma = 20%, r = 5%
// ===========================================================================

const BS_CALL: f64 = 10.450_583_572_185_565;
const BS_PUT: f64 = 5.573_526_022_256_971;

fn market() -> MarketSnapshot {
    MarketSnapshot {
        spot_price: 100.0,
        volatility: 0.20,
        risk_free_rate: 0.05,
    }
}

fn contract(option_type: OptionType) -> ContractTerms {
    ContractTerms {
        strike_price: 100.0,
        time_to_expiry: 1.0,
        option_type,
    }
}

fn mc_input(option_type: OptionType, style: McStyle, num_paths: u32) -> MonteCarloInput {
    MonteCarloInput {
        market: market(),
        contract: contract(option_type),
        style,
        steps: 50,
        num_paths,
        seed: Some(20240101),
        path_policy: Default::default(),
    }
}

// ---------------------------------------------------------------------------
// Black-Scholes
// ---------------------------------------------------------------------------

#[test]
fn test_black_scholes_reference_prices() {
    assert_abs_diff_eq!(bs_price(&market(), &contract(OptionType::Call)).unwrap(), BS_CALL, epsilon = 1e-9);
    assert_abs_diff_eq!(bs_price(&market(), &contract(OptionType::Put)).unwrap(), BS_PUT, epsilon = 1e-9);
}

#[test]
fn test_black_scholes_envelope() {
    let output = price_black_scholes(&BlackScholesInput {
        market: market(),
        contract: contract(OptionType::Call),
    })
    .unwrap();
    assert_eq!(output.methodology, "Black-Scholes (closed-form)");
    assert_eq!(output.metadata.precision, "ieee754_f64");
    assert!(output.warnings.is_empty());
}

// ---------------------------------------------------------------------------
// Binomial
// ---------------------------------------------------------------------------

#[test]
fn test_binomial_converges_to_black_scholes() {
    for option_type in [OptionType::Call, OptionType::Put] {
        let bs = bs_price(&market(), &contract(option_type)).unwrap();
        let tree = crr_price(&market(), &contract(option_type), ExerciseStyle::European, 500).unwrap();
        assert!((tree - bs).abs() < 0.05, "{option_type}: tree {tree} vs bs {bs}");
    }
}

#[test]
fn test_american_put_at_least_intrinsic_and_european() {
    let mut itm = contract(OptionType::Put);
    itm.strike_price = 130.0;
    let american = crr_price(&market(), &itm, ExerciseStyle::American, 300).unwrap();
    let european = crr_price(&market(), &itm, ExerciseStyle::European, 300).unwrap();
    assert!(american >= 30.0);
    assert!(american > european);
}

#[test]
fn test_american_call_matches_european_without_dividends() {
    let american = crr_price(&market(), &contract(OptionType::Call), ExerciseStyle::American, 200).unwrap();
    let european = crr_price(&market(), &contract(OptionType::Call), ExerciseStyle::European, 200).unwrap();
    assert_abs_diff_eq!(american, european, epsilon = 1e-9);
}

#[test]
fn test_binomial_json_round_trip_through_api() {
    let json = r#"{
        "spot_price": 100.0, "volatility": 0.2, "risk_free_rate": 0.05,
        "strike_price": 100.0, "time_to_expiry": 1.0, "option_type": "Put",
        "exercise_style": "American", "steps": 1000
    }"#;
    let input: BinomialInput = serde_json::from_str(json).unwrap();
    let result = price_binomial(&input).unwrap().result;
    assert_abs_diff_eq!(result.price, 6.0896, epsilon = 2e-3);
    assert!(result.early_exercise_premium.unwrap() > 0.4);
}

#[test]
fn test_unknown_option_type_rejected_by_serde() {
    let json = r#"{
        "spot_price": 100.0, "volatility": 0.2, "risk_free_rate": 0.05,
        "strike_price": 100.0, "time_to_expiry": 1.0, "option_type": "Straddle"
    }"#;
    assert!(serde_json::from_str::<BinomialInput>(json).is_err());
}

// ---------------------------------------------------------------------------
// Monte Carlo
// ---------------------------------------------------------------------------

#[test]
fn test_monte_carlo_within_four_standard_errors() {
    for (option_type, bs) in [(OptionType::Call, BS_CALL), (OptionType::Put, BS_PUT)] {
        let result = price_monte_carlo(&mc_input(option_type, McStyle::European, 50_000))
            .unwrap()
            .result;
        let gap = (result.price - bs).abs();
        assert!(
            gap < 4.0 * result.standard_error,
            "{option_type}: mc {} vs bs {bs}, se {}",
            result.price,
            result.standard_error
        );
    }
}

#[test]
fn test_monte_carlo_seed_reproducible() {
    let input = mc_input(OptionType::Call, McStyle::Asian, 5_000);
    let a = price_monte_carlo(&input).unwrap().result;
    let b = price_monte_carlo(&input).unwrap().result;
    assert_eq!(a.price, b.price);
    assert_eq!(a.standard_error, b.standard_error);
}

#[test]
fn test_lookback_call_dominates_european_on_same_paths() {
    let european = price_monte_carlo(&mc_input(OptionType::Call, McStyle::European, 10_000))
        .unwrap()
        .result;
    let lookback = price_monte_carlo(&mc_input(OptionType::Call, McStyle::Lookback, 10_000))
        .unwrap()
        .result;
    assert!(lookback.price >= european.price);
}

#[test]
fn test_asian_call_cheaper_than_european() {
    let asian = price_monte_carlo(&mc_input(OptionType::Call, McStyle::Asian, 20_000))
        .unwrap()
        .result;
    assert!(asian.price < BS_CALL);
    assert!(asian.price > 0.0);
}

// ---------------------------------------------------------------------------
// Moneyness extremes
// ---------------------------------------------------------------------------

#[test]
fn test_deep_in_the_money_call_tends_to_forward_intrinsic() {
    let mut deep = contract(OptionType::Call);
    deep.strike_price = 1.0;
    let expected = 100.0 - (-0.05_f64).exp();
    assert_abs_diff_eq!(bs_price(&market(), &deep).unwrap(), expected, epsilon = 1e-9);
    let tree = crr_price(&market(), &deep, ExerciseStyle::European, 200).unwrap();
    assert_abs_diff_eq!(tree, expected, epsilon = 1e-6);
}

#[test]
fn test_deep_out_of_the_money_prices_vanish() {
    let mut deep = contract(OptionType::Call);
    deep.strike_price = 10_000.0;
    let bs = bs_price(&market(), &deep).unwrap();
    let tree = crr_price(&market(), &deep, ExerciseStyle::European, 200).unwrap();
    assert!((0.0..1e-10).contains(&bs));
    assert!((0.0..1e-10).contains(&tree));
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn test_every_model_rejects_zero_spot() {
    let mut bad = market();
    bad.spot_price = 0.0;
    let c = contract(OptionType::Call);
    for err in [
        bs_price(&bad, &c).unwrap_err(),
        crr_price(&bad, &c, ExerciseStyle::European, 10).unwrap_err(),
        price_monte_carlo(&MonteCarloInput { market: bad, ..mc_input(OptionType::Call, McStyle::European, 10) })
            .unwrap_err(),
    ] {
        match err {
            PricingError::InvalidArgument { field, .. } => assert_eq!(field, "spot_price"),
            other => panic!("Expected InvalidArgument, got {other:?}"),
        }
    }
}
