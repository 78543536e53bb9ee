//! Hold durations of matched pairs and their time-window distribution.

use statrs::statistics::{Data, Distribution};
use swap_core::types::TradingTimeDistribution;

use crate::sequence::TokenTradeSequence;

pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Time window a single hold duration falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldBucket {
    UltraFast,
    VeryFast,
    Fast,
    Moderate,
    DayTrader,
    Swing,
    Position,
}

impl HoldBucket {
    pub fn for_hours(hours: f64) -> Self {
        if hours < 0.5 {
            HoldBucket::UltraFast
        } else if hours < 1.0 {
            HoldBucket::VeryFast
        } else if hours < 4.0 {
            HoldBucket::Fast
        } else if hours < 8.0 {
            HoldBucket::Moderate
        } else if hours < 24.0 {
            HoldBucket::DayTrader
        } else if hours < 168.0 {
            HoldBucket::Swing
        } else {
            HoldBucket::Position
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Hold durations in hours for every matched pair of a token.
///
/// Tokens missing either side contribute nothing.
pub fn pair_durations(sequence: &TokenTradeSequence) -> Vec<f64> {
    if !sequence.has_both_sides() {
        return Vec::new();
    }

    sequence
        .matched_events()
        .map(|(buy, sell)| (sell.timestamp_seconds - buy.timestamp_seconds) as f64 / SECONDS_PER_HOUR)
        .collect()
}

/// Median with the two central values averaged for even counts; 0 when empty.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Arithmetic mean; 0 when empty.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    Data::new(values.to_vec()).mean().unwrap_or(0.0)
}

/// Timing statistics over all matched-pair durations of a wallet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimingStats {
    pub pair_count: u64,
    pub distribution: TradingTimeDistribution,
    pub percent_under_1_hour: f64,
    pub percent_under_4_hours: f64,
    pub median_hold_hours: f64,
    pub average_hold_hours: f64,
}

impl TimingStats {
    pub fn from_sequences<'a>(sequences: impl IntoIterator<Item = &'a TokenTradeSequence>) -> Self {
        let durations: Vec<f64> = sequences.into_iter().flat_map(pair_durations).collect();
        Self::from_durations(&durations)
    }

    pub fn from_durations(durations: &[f64]) -> Self {
        if durations.is_empty() {
            return Self::default();
        }

        let mut counts = [0u64; 7];
        for &hours in durations {
            counts[HoldBucket::for_hours(hours).index()] += 1;
        }

        let total = durations.len() as f64;
        let fraction = |bucket: HoldBucket| counts[bucket.index()] as f64 / total;

        let distribution = TradingTimeDistribution {
            ultra_fast: fraction(HoldBucket::UltraFast),
            very_fast: fraction(HoldBucket::VeryFast),
            fast: fraction(HoldBucket::Fast),
            moderate: fraction(HoldBucket::Moderate),
            day_trader: fraction(HoldBucket::DayTrader),
            swing: fraction(HoldBucket::Swing),
            position: fraction(HoldBucket::Position),
        };

        let percent_under_1_hour = distribution.ultra_fast + distribution.very_fast;

        Self {
            pair_count: durations.len() as u64,
            distribution,
            percent_under_1_hour,
            percent_under_4_hours: percent_under_1_hour + distribution.fast,
            median_hold_hours: median(durations),
            average_hold_hours: mean(durations),
        }
    }
}
