use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PricingError;
use crate::PricingResult;

/// Prices and payoffs, in units of the underlying's currency.
pub type Money = f64;

/// Annualized rates and volatilities as decimals (0.05 = 5%). Never as percentages.
pub type Rate = f64;

/// Year fractions
pub type Years = f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    Call,
    Put,
}

impl FromStr for OptionType {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" | "c" => Ok(OptionType::Call),
            "put" | "p" => Ok(OptionType::Put),
            other => Err(PricingError::InvalidArgument {
                field: "option_type".into(),
                reason: format!("unrecognised value '{other}', expected call or put"),
            }),
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "Call"),
            OptionType::Put => write!(f, "Put"),
        }
    }
}

/// Exercise rights on a lattice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExerciseStyle {
    #[default]
    European,
    American,
}

impl FromStr for ExerciseStyle {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "european" => Ok(ExerciseStyle::European),
            "american" => Ok(ExerciseStyle::American),
            other => Err(PricingError::InvalidArgument {
                field: "exercise_style".into(),
                reason: format!("unrecognised value '{other}', expected european or american"),
            }),
        }
    }
}

/// Market state supplied by the caller for a single pricing call.
///
/// The engine never fetches or caches any of these values; whoever owns
/// the data feed builds a snapshot and passes it in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub spot_price: Money,
    /// Annualized volatility of log returns.
    pub volatility: Rate,
    /// Annualized, continuously compounded. May be negative.
    pub risk_free_rate: Rate,
}

impl MarketSnapshot {
    pub fn validate(&self) -> PricingResult<()> {
        ensure_positive("spot_price", self.spot_price)?;
        ensure_positive("volatility", self.volatility)?;
        ensure_finite("risk_free_rate", self.risk_free_rate)
    }
}

/// Contract terms shared by every model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContractTerms {
    pub strike_price: Money,
    pub time_to_expiry: Years,
    pub option_type: OptionType,
}

impl ContractTerms {
    pub fn validate(&self) -> PricingResult<()> {
        ensure_positive("strike_price", self.strike_price)?;
        ensure_positive("time_to_expiry", self.time_to_expiry)
    }
}

pub(crate) fn ensure_positive(field: &str, value: f64) -> PricingResult<()> {
    if !value.is_finite() {
        return Err(PricingError::invalid(field, "must be finite"));
    }
    if value <= 0.0 {
        return Err(PricingError::invalid(field, "must be positive"));
    }
    Ok(())
}

pub(crate) fn ensure_finite(field: &str, value: f64) -> PricingResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PricingError::invalid(field, "must be finite"))
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "ieee754_f64".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_option_type_from_str_accepts_known_values() {
        assert_eq!("call".parse::<OptionType>().unwrap(), OptionType::Call);
        assert_eq!(" Put ".parse::<OptionType>().unwrap(), OptionType::Put);
        assert_eq!("C".parse::<OptionType>().unwrap(), OptionType::Call);
    }

    #[test]
    fn test_option_type_from_str_rejects_unknown() {
        match "straddle".parse::<OptionType>() {
            Err(PricingError::InvalidArgument { field, reason }) => {
                assert_eq!(field, "option_type");
                assert!(reason.contains("straddle"));
            }
            other => panic!("Expected InvalidArgument, got {other:?}"),
        }
    }

    #[test]
    fn test_exercise_style_from_str() {
        assert_eq!(
            "American".parse::<ExerciseStyle>().unwrap(),
            ExerciseStyle::American
        );
        assert!("bermudan".parse::<ExerciseStyle>().is_err());
    }

    #[test]
    fn test_unknown_option_type_fails_deserialization() {
        let json = r#"{"strike_price": 100.0, "time_to_expiry": 1.0, "option_type": "Straddle"}"#;
        let parsed: Result<ContractTerms, _> = serde_json::from_str(json);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_snapshot_validation() {
        let ok = MarketSnapshot {
            spot_price: 100.0,
            volatility: 0.2,
            risk_free_rate: -0.01,
        };
        assert!(ok.validate().is_ok());

        let zero_vol = MarketSnapshot {
            volatility: 0.0,
            ..ok
        };
        match zero_vol.validate() {
            Err(PricingError::InvalidArgument { field, .. }) => assert_eq!(field, "volatility"),
            other => panic!("Expected InvalidArgument, got {other:?}"),
        }

        let nan_rate = MarketSnapshot {
            risk_free_rate: f64::NAN,
            ..ok
        };
        assert!(nan_rate.validate().is_err());
    }

    #[test]
    fn test_terms_validation() {
        let terms = ContractTerms {
            strike_price: 100.0,
            time_to_expiry: 0.0,
            option_type: OptionType::Call,
        };
        match terms.validate() {
            Err(PricingError::InvalidArgument { field, .. }) => {
                assert_eq!(field, "time_to_expiry")
            }
            other => panic!("Expected InvalidArgument, got {other:?}"),
        }
    }
}
