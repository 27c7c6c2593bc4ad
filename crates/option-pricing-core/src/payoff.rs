use serde::{Deserialize, Serialize};

use crate::types::{Money, OptionType};

/// Intrinsic value of a vanilla option settled at `settlement`.
///
/// Every pricer goes through this function, whether `settlement` is a
/// lattice node, a terminal path price or a path summary (max / average).
#[inline]
pub fn intrinsic_value(settlement: Money, strike: Money, option_type: OptionType) -> Money {
    match option_type {
        OptionType::Call => (settlement - strike).max(0.0),
        OptionType::Put => (strike - settlement).max(0.0),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Moneyness {
    #[serde(rename = "ITM")]
    InTheMoney,
    #[serde(rename = "ATM")]
    AtTheMoney,
    #[serde(rename = "OTM")]
    OutOfTheMoney,
}

/// Classify spot against strike. ATM band: within 1% of strike.
pub fn classify_moneyness(spot: Money, strike: Money, option_type: OptionType) -> Moneyness {
    let ratio = spot / strike;
    let atm_lo = 0.99;
    let atm_hi = 1.01;
    if (atm_lo..=atm_hi).contains(&ratio) {
        return Moneyness::AtTheMoney;
    }
    let spot_above = ratio > atm_hi;
    match (option_type, spot_above) {
        (OptionType::Call, true) | (OptionType::Put, false) => Moneyness::InTheMoney,
        _ => Moneyness::OutOfTheMoney,
    }
}

/// Underlying price at expiry at which a long position recovers its premium.
pub fn breakeven(strike: Money, premium: Money, option_type: OptionType) -> Money {
    match option_type {
        OptionType::Call => strike + premium,
        OptionType::Put => strike - premium,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_call_intrinsic() {
        assert_eq!(intrinsic_value(120.0, 100.0, OptionType::Call), 20.0);
        assert_eq!(intrinsic_value(80.0, 100.0, OptionType::Call), 0.0);
    }

    #[test]
    fn test_put_intrinsic() {
        assert_eq!(intrinsic_value(80.0, 100.0, OptionType::Put), 20.0);
        assert_eq!(intrinsic_value(120.0, 100.0, OptionType::Put), 0.0);
    }

    #[test]
    fn test_intrinsic_at_strike_is_zero() {
        assert_eq!(intrinsic_value(100.0, 100.0, OptionType::Call), 0.0);
        assert_eq!(intrinsic_value(100.0, 100.0, OptionType::Put), 0.0);
    }

    #[test]
    fn test_moneyness_classification() {
        assert_eq!(
            classify_moneyness(110.0, 100.0, OptionType::Call),
            Moneyness::InTheMoney
        );
        assert_eq!(
            classify_moneyness(90.0, 100.0, OptionType::Call),
            Moneyness::OutOfTheMoney
        );
        assert_eq!(
            classify_moneyness(90.0, 100.0, OptionType::Put),
            Moneyness::InTheMoney
        );
        assert_eq!(
            classify_moneyness(100.5, 100.0, OptionType::Put),
            Moneyness::AtTheMoney
        );
    }

    #[test]
    fn test_moneyness_serializes_as_short_code() {
        let json = serde_json::to_string(&Moneyness::InTheMoney).unwrap();
        assert_eq!(json, "\"ITM\"");
    }

    #[test]
    fn test_breakeven() {
        assert_eq!(breakeven(100.0, 10.0, OptionType::Call), 110.0);
        assert_eq!(breakeven(100.0, 10.0, OptionType::Put), 90.0);
    }
}
