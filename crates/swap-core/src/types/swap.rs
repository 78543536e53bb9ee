//! Swap ledger types.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Token mint address.
pub type TokenId = String;

/// Direction of a swap leg from the wallet's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapDirection {
    /// Token received (buy).
    In,
    /// Token sent (sell).
    Out,
}

impl SwapDirection {
    pub fn is_buy(&self) -> bool {
        matches!(self, SwapDirection::In)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SwapDirection::In => "in",
            SwapDirection::Out => "out",
        }
    }
}

impl fmt::Display for SwapDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SwapDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "in" | "buy" => Ok(SwapDirection::In),
            "out" | "sell" => Ok(SwapDirection::Out),
            other => Err(Error::InvalidSwap(format!("unknown direction '{}'", other))),
        }
    }
}

/// One directional leg of a wallet's swap, already attributed to a single wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapEvent {
    pub mint: TokenId,
    pub direction: SwapDirection,
    pub amount_token_units: f64,
    /// SOL value of the leg.
    pub associated_sol_value: f64,
    pub timestamp_seconds: i64,
}

impl SwapEvent {
    pub fn new(
        mint: impl Into<TokenId>,
        direction: SwapDirection,
        amount_token_units: f64,
        associated_sol_value: f64,
        timestamp_seconds: i64,
    ) -> Self {
        Self {
            mint: mint.into(),
            direction,
            amount_token_units,
            associated_sol_value,
            timestamp_seconds,
        }
    }

    /// Shorthand for a buy leg.
    pub fn buy(mint: impl Into<TokenId>, sol_value: f64, timestamp_seconds: i64) -> Self {
        Self::new(mint, SwapDirection::In, 0.0, sol_value, timestamp_seconds)
    }

    /// Shorthand for a sell leg.
    pub fn sell(mint: impl Into<TokenId>, sol_value: f64, timestamp_seconds: i64) -> Self {
        Self::new(mint, SwapDirection::Out, 0.0, sol_value, timestamp_seconds)
    }

    pub fn with_amount(mut self, amount_token_units: f64) -> Self {
        self.amount_token_units = amount_token_units;
        self
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.timestamp_seconds, 0).single()
    }
}

/// Inclusive time window over swap timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, timestamp_seconds: i64) -> bool {
        timestamp_seconds >= self.start.timestamp() && timestamp_seconds <= self.end.timestamp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parsing() {
        assert_eq!("in".parse::<SwapDirection>().unwrap(), SwapDirection::In);
        assert_eq!("OUT".parse::<SwapDirection>().unwrap(), SwapDirection::Out);
        assert_eq!("buy".parse::<SwapDirection>().unwrap(), SwapDirection::In);
        assert!("sideways".parse::<SwapDirection>().is_err());
    }

    #[test]
    fn test_swap_event_serializes_camel_case() {
        let event = SwapEvent::buy("mintA", 1.5, 1_700_000_000).with_amount(10.0);
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["direction"], "in");
        assert_eq!(json["associatedSolValue"], 1.5);
        assert_eq!(json["timestampSeconds"], 1_700_000_000);
        assert_eq!(json["amountTokenUnits"], 10.0);
    }

    #[test]
    fn test_time_range_is_inclusive() {
        let start = Utc.timestamp_opt(1_000, 0).unwrap();
        let end = Utc.timestamp_opt(2_000, 0).unwrap();
        let range = TimeRange::new(start, end);

        assert!(range.contains(1_000));
        assert!(range.contains(2_000));
        assert!(!range.contains(999));
        assert!(!range.contains(2_001));
    }
}
