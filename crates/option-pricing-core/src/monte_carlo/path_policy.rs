//! How a simulated path is reduced to the single settlement price that the
//! vanilla payoff is applied to.
//!
//! Lookback and Asian contracts come in several market conventions. The
//! defaults are fixed-strike lookback on the path maximum and an arithmetic
//! average that excludes the initial spot; the alternatives are selectable
//! per call through [`McPathPolicy`].

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::PricingError;
use crate::types::{Money, OptionType};

/// Payoff style for simulated contracts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum McStyle {
    /// Terminal price only.
    #[default]
    European,
    /// Path extremum (see [`LookbackConvention`]).
    Lookback,
    /// Path average (see [`AveragingConvention`]).
    Asian,
}

impl FromStr for McStyle {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "european" => Ok(McStyle::European),
            "lookback" => Ok(McStyle::Lookback),
            "asian" => Ok(McStyle::Asian),
            other => Err(PricingError::invalid(
                "style",
                &format!("unrecognised value '{other}', expected european, lookback or asian"),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LookbackConvention {
    /// Settle both calls and puts on the path maximum.
    #[default]
    FixedStrikeMaximum,
    /// Settle calls on the path maximum and puts on the path minimum.
    FixedStrikeExtremum,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AveragingConvention {
    #[default]
    Arithmetic,
    Geometric,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct McPathPolicy {
    #[serde(default)]
    pub lookback: LookbackConvention,
    #[serde(default)]
    pub averaging: AveragingConvention,
    /// Whether the initial spot counts as an averaging observation.
    /// The extremum always includes it.
    #[serde(default)]
    pub include_initial: bool,
}

/// Running statistics of one path, so the path itself never needs storing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSummary {
    pub terminal: Money,
    pub maximum: Money,
    pub minimum: Money,
    sum: f64,
    /// Only accumulated under geometric averaging.
    log_sum: f64,
    observations: u32,
    track_log: bool,
}

impl PathSummary {
    pub fn start(spot: Money, policy: &McPathPolicy) -> Self {
        let track_log = policy.averaging == AveragingConvention::Geometric;
        let (sum, log_sum, observations) = match (policy.include_initial, track_log) {
            (true, true) => (spot, spot.ln(), 1),
            (true, false) => (spot, 0.0, 1),
            (false, _) => (0.0, 0.0, 0),
        };
        PathSummary {
            terminal: spot,
            maximum: spot,
            minimum: spot,
            sum,
            log_sum,
            observations,
            track_log,
        }
    }

    #[inline]
    pub fn observe(&mut self, price: Money) {
        self.terminal = price;
        self.maximum = self.maximum.max(price);
        self.minimum = self.minimum.min(price);
        self.sum += price;
        if self.track_log {
            self.log_sum += price.ln();
        }
        self.observations += 1;
    }

    pub fn arithmetic_mean(&self) -> Money {
        if self.observations == 0 {
            return self.terminal;
        }
        self.sum / f64::from(self.observations)
    }

    /// Requires a summary started under [`AveragingConvention::Geometric`].
    pub fn geometric_mean(&self) -> Money {
        if self.observations == 0 {
            return self.terminal;
        }
        (self.log_sum / f64::from(self.observations)).exp()
    }
}

impl McPathPolicy {
    pub fn settlement_price(
        &self,
        style: McStyle,
        option_type: OptionType,
        path: &PathSummary,
    ) -> Money {
        match style {
            McStyle::European => path.terminal,
            McStyle::Lookback => match (self.lookback, option_type) {
                (LookbackConvention::FixedStrikeExtremum, OptionType::Put) => path.minimum,
                _ => path.maximum,
            },
            McStyle::Asian => match self.averaging {
                AveragingConvention::Arithmetic => path.arithmetic_mean(),
                AveragingConvention::Geometric => path.geometric_mean(),
            },
        }
    }
}
