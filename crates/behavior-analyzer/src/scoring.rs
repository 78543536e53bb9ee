//! Buy/sell balance scoring and the composite flipper score.

use serde::{Deserialize, Serialize};
use swap_core::types::TradingTimeDistribution;

use crate::sequence::TokenTradeSequence;

/// Volume-weighted average of per-token buy/sell symmetry.
///
/// Only tokens with both buys and sells carry weight; the weight of each is its
/// share of the trade count across those tokens. Result is in [0.0, 1.0].
pub fn buy_sell_symmetry<'a>(sequences: impl IntoIterator<Item = &'a TokenTradeSequence>) -> f64 {
    let (weighted, total_weight) = sequences
        .into_iter()
        .filter(|seq| seq.has_both_sides())
        .fold((0.0, 0u64), |(weighted, total), seq| {
            let weight = seq.trade_count();
            (weighted + seq.symmetry() * weight as f64, total + weight)
        });

    if total_weight == 0 {
        0.0
    } else {
        (weighted / total_weight as f64).clamp(0.0, 1.0)
    }
}

/// Weights for the composite flipper score.
///
/// Sub-30-minute turnover dominates; balance and consistency only separate
/// wallets that are similarly fast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlipperWeights {
    pub ultra_fast: f64,
    pub very_fast: f64,
    pub fast: f64,
    pub symmetry: f64,
    pub consistency: f64,
    pub speed: f64,
    pub balance: f64,
}

impl FlipperWeights {
    pub const DEFAULT: Self = Self {
        ultra_fast: 0.85,
        very_fast: 0.10,
        fast: 0.05,
        symmetry: 0.6,
        consistency: 0.4,
        speed: 0.85,
        balance: 0.15,
    };
}

impl Default for FlipperWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Component scores behind a flipper score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlipperScore {
    pub speed_score: f64,
    pub balance_score: f64,
    pub total: f64,
}

impl FlipperScore {
    pub fn compute(
        distribution: &TradingTimeDistribution,
        buy_sell_symmetry: f64,
        sequence_consistency: f64,
        weights: &FlipperWeights,
    ) -> Self {
        let speed_score = weights.ultra_fast * distribution.ultra_fast
            + weights.very_fast * distribution.very_fast
            + weights.fast * distribution.fast;
        let balance_score =
            weights.symmetry * buy_sell_symmetry + weights.consistency * sequence_consistency;

        Self {
            speed_score,
            balance_score,
            total: weights.speed * speed_score + weights.balance * balance_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swap_core::types::SwapEvent;

    fn sequence(mint: &str, buys: usize, sells: usize) -> TokenTradeSequence {
        let mut events = Vec::new();
        let mut ts = 0;
        for _ in 0..buys {
            ts += 1;
            events.push(SwapEvent::buy(mint, 1.0, ts));
        }
        for _ in 0..sells {
            ts += 1;
            events.push(SwapEvent::sell(mint, 1.0, ts));
        }
        TokenTradeSequence::new(mint.to_string(), events)
    }

    #[test]
    fn test_balanced_tokens_have_full_symmetry() {
        let a = sequence("a", 2, 2);
        let b = sequence("b", 1, 1);
        assert_eq!(buy_sell_symmetry([&a, &b]), 1.0);
    }

    #[test]
    fn test_symmetry_is_trade_count_weighted() {
        // a: 3 buys / 1 sell -> 1/3 with weight 4; b: 1/1 -> 1.0 with weight 2
        let a = sequence("a", 3, 1);
        let b = sequence("b", 1, 1);
        let expected = (1.0 / 3.0 * 4.0 + 1.0 * 2.0) / 6.0;

        assert!((buy_sell_symmetry([&a, &b]) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_one_sided_tokens_carry_no_weight() {
        let one_sided = sequence("a", 5, 0);
        let balanced = sequence("b", 2, 2);

        assert_eq!(buy_sell_symmetry([&one_sided]), 0.0);
        assert_eq!(buy_sell_symmetry([&one_sided, &balanced]), 1.0);
    }

    #[test]
    fn test_flipper_score_weights() {
        let distribution = TradingTimeDistribution {
            ultra_fast: 1.0,
            ..Default::default()
        };
        let score = FlipperScore::compute(&distribution, 1.0, 1.0, &FlipperWeights::DEFAULT);

        assert!((score.speed_score - 0.85).abs() < 1e-9);
        assert!((score.balance_score - 1.0).abs() < 1e-9);
        assert!((score.total - (0.85 * 0.85 + 0.15)).abs() < 1e-9);
    }

    #[test]
    fn test_slow_wallet_scores_only_on_balance() {
        let distribution = TradingTimeDistribution {
            position: 1.0,
            ..Default::default()
        };
        let score = FlipperScore::compute(&distribution, 0.5, 0.5, &FlipperWeights::default());

        assert_eq!(score.speed_score, 0.0);
        assert!((score.total - 0.15 * 0.5).abs() < 1e-9);
    }
}
