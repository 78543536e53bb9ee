//! Pure behavior analysis pipeline for one wallet.

use swap_core::config::AnalysisConfig;
use swap_core::types::{BehavioralMetrics, SwapEvent};
use tracing::debug;

use crate::activity::{activity_profile, reentry_rate, unpaired_token_share, value_profile};
use crate::classifier::{StyleClassifier, StyleFeatures};
use crate::historical::{interpret, HistoricalPatternBuilder};
use crate::scoring::{buy_sell_symmetry, FlipperScore, FlipperWeights};
use crate::sequence::{build_sequences, normalized_ratio, sequence_consistency};
use crate::timing::TimingStats;

/// Computes [`BehavioralMetrics`] from a wallet's swap events.
///
/// Synchronous and free of I/O; the same events and config always produce
/// the same metrics.
pub struct BehaviorAnalyzer {
    classifier: StyleClassifier,
    weights: FlipperWeights,
}

impl BehaviorAnalyzer {
    pub fn new() -> Self {
        Self {
            classifier: StyleClassifier::new(),
            weights: FlipperWeights::DEFAULT,
        }
    }

    pub fn with_classifier(classifier: StyleClassifier) -> Self {
        Self {
            classifier,
            weights: FlipperWeights::DEFAULT,
        }
    }

    pub fn with_weights(mut self, weights: FlipperWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn analyze(
        &self,
        wallet_address: &str,
        events: &[SwapEvent],
        config: &AnalysisConfig,
    ) -> BehavioralMetrics {
        let sequences = build_sequences(events, &config.excluded_mints);
        let mut metrics = BehavioralMetrics::empty(wallet_address);

        if sequences.is_empty() {
            debug!(wallet = %wallet_address, "No swaps to analyze");
            return metrics;
        }

        for seq in sequences.values() {
            metrics.total_buy_count += seq.buy_count;
            metrics.total_sell_count += seq.sell_count;
            metrics.complete_pairs_count += seq.complete_pairs();
            if seq.has_both_sides() {
                metrics.tokens_with_both_buy_and_sell += 1;
            }
        }
        metrics.unique_tokens_traded = sequences.len() as u64;
        metrics.total_trade_count = metrics.total_buy_count + metrics.total_sell_count;

        metrics.buy_sell_ratio = normalized_ratio(metrics.total_buy_count, metrics.total_sell_count);
        metrics.buy_sell_symmetry = buy_sell_symmetry(sequences.values());
        metrics.sequence_consistency = sequence_consistency(sequences.values());

        let timing = TimingStats::from_sequences(sequences.values());
        metrics.trading_time_distribution = timing.distribution;
        metrics.percent_trades_under_1_hour = timing.percent_under_1_hour;
        metrics.percent_trades_under_4_hours = timing.percent_under_4_hours;
        metrics.median_hold_time = timing.median_hold_hours;
        metrics.average_flip_duration_hours = timing.average_hold_hours;

        metrics.flipper_score = FlipperScore::compute(
            &timing.distribution,
            metrics.buy_sell_symmetry,
            metrics.sequence_consistency,
            &self.weights,
        )
        .total;

        let features = StyleFeatures::from(&metrics);
        let classification = self.classifier.classify(&features);
        metrics.trading_style = classification.style;
        metrics.confidence_score = classification.confidence;

        if let Some(pattern) = HistoricalPatternBuilder::new(config).build(&sequences) {
            let flow = self.classifier.flow_signal(&features);
            metrics.trading_interpretation = Some(interpret(&pattern, flow));
            metrics.historical_pattern = Some(pattern);
        }

        let included: Vec<&SwapEvent> = sequences.values().flat_map(|s| s.events.iter()).collect();
        metrics.activity = activity_profile(&included, config.session_gap_minutes);
        metrics.value = value_profile(&included, &sequences);
        metrics.reentry_rate = reentry_rate(&sequences);
        metrics.percentage_of_unpaired_tokens = unpaired_token_share(&sequences);

        debug!(
            wallet = %wallet_address,
            trades = metrics.total_trade_count,
            pairs = metrics.complete_pairs_count,
            style = ?metrics.trading_style,
            confidence = metrics.confidence_score,
            flipper_score = metrics.flipper_score,
            "Analyzed wallet behavior"
        );

        metrics
    }
}

impl Default for BehaviorAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swap_core::types::TradingStyle;

    const HOUR: i64 = 3600;
    const T0: i64 = 1_700_000_000;

    fn config() -> AnalysisConfig {
        AnalysisConfig::default().no_exclusions()
    }

    /// Alternating buy/sell cycles on one mint with the given hold times (hours).
    fn cycles(mint: &str, start: i64, holds_hours: &[f64]) -> Vec<SwapEvent> {
        let mut events = Vec::new();
        let mut ts = start;
        for hold in holds_hours {
            events.push(SwapEvent::buy(mint, 1.0, ts).with_amount(10.0));
            ts += (hold * HOUR as f64) as i64;
            events.push(SwapEvent::sell(mint, 1.0, ts).with_amount(10.0));
            ts += 60;
        }
        events
    }

    #[test]
    fn test_empty_input_yields_zero_metrics() {
        let analyzer = BehaviorAnalyzer::new();
        let metrics = analyzer.analyze("wallet", &[], &config());

        assert_eq!(metrics, BehavioralMetrics::empty("wallet"));
    }

    #[test]
    fn test_excluded_mints_are_dropped() {
        let analyzer = BehaviorAnalyzer::new();
        let events = cycles("stable", T0, &[1.0, 1.0, 1.0]);
        let config = AnalysisConfig::default().no_exclusions().exclude_mint("stable");

        let metrics = analyzer.analyze("wallet", &events, &config);
        assert_eq!(metrics.total_trade_count, 0);
        assert_eq!(metrics.trading_style, TradingStyle::InsufficientData);
    }

    #[test]
    fn test_three_buys_three_sells_scenario() {
        let analyzer = BehaviorAnalyzer::new();
        let t1 = T0 + 2 * HOUR;
        let t2 = T0 + 5 * HOUR;
        // delivered out of order
        let events = vec![
            SwapEvent::sell("mint", 1.0, t2 + 10 * HOUR),
            SwapEvent::buy("mint", 1.0, t1).with_amount(10.0),
            SwapEvent::sell("mint", 1.0, T0 + HOUR),
            SwapEvent::buy("mint", 1.0, t2).with_amount(10.0),
            SwapEvent::sell("mint", 1.0, t1 + 2 * HOUR),
            SwapEvent::buy("mint", 1.0, T0).with_amount(10.0),
        ];

        let metrics = analyzer.analyze("wallet", &events, &config());

        assert_eq!(metrics.complete_pairs_count, 3);
        assert!((metrics.median_hold_time - 2.0).abs() < 1e-9);
        assert!(metrics.trading_time_distribution.fast >= 2.0 / 3.0 - 1e-9);
        assert!((metrics.average_flip_duration_hours - 13.0 / 3.0).abs() < 1e-9);
        assert_eq!(metrics.sequence_consistency, 1.0);
        assert_eq!(metrics.buy_sell_symmetry, 1.0);
        assert_eq!(metrics.buy_sell_ratio, 1.0);
        // 3 completed cycles meets the default minimum
        let pattern = metrics.historical_pattern.as_ref().unwrap();
        assert_eq!(pattern.completed_cycle_count, 3);
    }

    #[test]
    fn test_buys_only_short_circuits() {
        let analyzer = BehaviorAnalyzer::new();
        let events = vec![
            SwapEvent::buy("mint", 1.0, T0),
            SwapEvent::buy("mint", 1.0, T0 + 10),
            SwapEvent::buy("mint", 1.0, T0 + 20),
            SwapEvent::buy("mint", 1.0, T0 + 30),
        ];

        let metrics = analyzer.analyze("wallet", &events, &config());

        assert_eq!(metrics.trading_style, TradingStyle::InsufficientData);
        assert_eq!(metrics.confidence_score, 0.0);
        assert_eq!(metrics.tokens_with_both_buy_and_sell, 0);
        assert_eq!(metrics.trading_time_distribution.total(), 0.0);
        assert_eq!(metrics.buy_sell_ratio, 0.0);
        assert!(metrics.historical_pattern.is_none());
    }

    #[test]
    fn test_fast_flipper_with_accumulation_is_true_flipper() {
        let analyzer = BehaviorAnalyzer::new();
        // 4 quick pairs (ultra fast) + 1 slower pair => ultra_fast = 0.8
        let mut events = cycles("flip", T0, &[0.1, 0.1, 0.1, 0.1, 10.0]);
        // 40 extra buys spread over other mints push the ratio well above 1.75
        for i in 0..40 {
            events.push(SwapEvent::buy(format!("bag{}", i % 4), 1.0, T0 + i * 60));
        }

        let metrics = analyzer.analyze("wallet", &events, &config());

        assert!((metrics.trading_time_distribution.ultra_fast - 0.8).abs() < 1e-9);
        assert!(metrics.buy_sell_ratio > 1.75);
        assert!(metrics.pair_ratio() < 0.3);
        assert_eq!(metrics.trading_style, TradingStyle::TrueFlipper);
        assert!((metrics.confidence_score - 0.88).abs() < 1e-9);
    }

    #[test]
    fn test_interpretation_matches_pattern() {
        let analyzer = BehaviorAnalyzer::new();
        let events = cycles("mint", T0, &[0.2, 0.3, 5.0, 30.0]);

        let metrics = analyzer.analyze("wallet", &events, &config());
        let pattern = metrics.historical_pattern.as_ref().unwrap();
        let interpretation = metrics.trading_interpretation.as_ref().unwrap();

        assert_eq!(
            interpretation.typical_hold_time_hours,
            pattern.median_completed_hold_time_hours
        );
        assert_eq!(
            interpretation.economic_hold_time_hours,
            pattern.historical_average_hold_time_hours
        );
    }

    #[test]
    fn test_pattern_and_interpretation_absent_together() {
        let analyzer = BehaviorAnalyzer::new();
        let events = cycles("mint", T0, &[0.2, 0.3]);

        let metrics = analyzer.analyze("wallet", &events, &config());

        assert!(metrics.historical_pattern.is_none());
        assert!(metrics.trading_interpretation.is_none());
        assert_eq!(metrics.complete_pairs_count, 2);
    }

    #[test]
    fn test_recompute_is_identical() {
        let analyzer = BehaviorAnalyzer::new();
        let mut events = cycles("a", T0, &[0.2, 1.5, 30.0]);
        events.extend(cycles("b", T0 + 100, &[200.0, 0.1]));
        events.push(SwapEvent::sell("c", 4.0, T0 + 7));

        let first = serde_json::to_string(&analyzer.analyze("wallet", &events, &config())).unwrap();
        events.reverse();
        let second = serde_json::to_string(&analyzer.analyze("wallet", &events, &config())).unwrap();

        assert_eq!(first, second);
    }
}
