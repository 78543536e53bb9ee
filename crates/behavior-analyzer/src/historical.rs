//! Historical pattern over completed buy→sell cycles and its interpretation.
//!
//! Two hold-time estimators are reported side by side: the plain median of
//! cycle durations and the mean weighted by the SOL value of each closing
//! sell. A gap between them means a few large positions were held much longer
//! (or shorter) than the typical one.

use std::collections::BTreeMap;

use swap_core::config::AnalysisConfig;
use swap_core::types::{
    BehaviorType, BehavioralPattern, EconomicRisk, ExitPattern, HistoricalPattern, SpeedCategory,
    TokenId, TradingInterpretation,
};

use crate::classifier::FlowSignal;
use crate::sequence::TokenTradeSequence;
use crate::timing::{median, SECONDS_PER_HOUR};

const SECONDS_PER_DAY: f64 = 86_400.0;
const GRADUAL_EXIT_MIN_SELLS_PER_TOKEN: f64 = 1.5;

/// One matched buy→sell pair with its economic weight.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedCycle {
    pub mint: TokenId,
    pub buy_timestamp: i64,
    pub sell_timestamp: i64,
    pub duration_hours: f64,
    /// SOL value of the closing sell.
    pub weight_sol: f64,
}

/// Completed cycles from every token that has both buys and sells.
pub fn completed_cycles<'a>(
    sequences: impl IntoIterator<Item = &'a TokenTradeSequence>,
) -> Vec<CompletedCycle> {
    sequences
        .into_iter()
        .filter(|seq| seq.has_both_sides())
        .flat_map(|seq| {
            seq.matched_events().map(move |(buy, sell)| CompletedCycle {
                mint: seq.mint.clone(),
                buy_timestamp: buy.timestamp_seconds,
                sell_timestamp: sell.timestamp_seconds,
                duration_hours: (sell.timestamp_seconds - buy.timestamp_seconds) as f64
                    / SECONDS_PER_HOUR,
                weight_sol: sell.associated_sol_value.max(0.0),
            })
        })
        .collect()
}

/// Σ(duration·weight) / Σweight, falling back to the plain mean when no cycle carries weight.
pub fn capital_weighted_hold_hours(cycles: &[CompletedCycle]) -> f64 {
    if cycles.is_empty() {
        return 0.0;
    }

    let total_weight: f64 = cycles.iter().map(|c| c.weight_sol).sum();
    if total_weight > 0.0 {
        cycles
            .iter()
            .map(|c| c.duration_hours * c.weight_sol)
            .sum::<f64>()
            / total_weight
    } else {
        cycles.iter().map(|c| c.duration_hours).sum::<f64>() / cycles.len() as f64
    }
}

/// Hold-time label of the median completed cycle.
pub fn behavior_type_for(median_hours: f64) -> BehaviorType {
    if median_hours < 1.0 {
        BehaviorType::UltraFlipper
    } else if median_hours < 24.0 {
        BehaviorType::Flipper
    } else if median_hours < 168.0 {
        BehaviorType::Swing
    } else {
        BehaviorType::Holder
    }
}

pub fn speed_category_for(typical_hours: f64) -> SpeedCategory {
    if typical_hours < 1.0 {
        SpeedCategory::UltraFast
    } else if typical_hours < 24.0 {
        SpeedCategory::Fast
    } else if typical_hours < 168.0 {
        SpeedCategory::Moderate
    } else {
        SpeedCategory::Slow
    }
}

/// Shorter capital-weighted holds mean more capital churned through volatile positions.
pub fn economic_risk_for(economic_hours: f64) -> EconomicRisk {
    if economic_hours < 1.0 {
        EconomicRisk::Critical
    } else if economic_hours < 24.0 {
        EconomicRisk::High
    } else if economic_hours < 168.0 {
        EconomicRisk::Medium
    } else {
        EconomicRisk::Low
    }
}

/// Builds [`HistoricalPattern`]s from a wallet's token sequences.
pub struct HistoricalPatternBuilder<'a> {
    config: &'a AnalysisConfig,
}

impl<'a> HistoricalPatternBuilder<'a> {
    pub fn new(config: &'a AnalysisConfig) -> Self {
        Self { config }
    }

    /// Pattern over completed cycles, or `None` below the configured minimum.
    pub fn build(
        &self,
        sequences: &BTreeMap<TokenId, TokenTradeSequence>,
    ) -> Option<HistoricalPattern> {
        let cycles = completed_cycles(sequences.values());
        let count = cycles.len() as u64;

        if count == 0 || count < self.config.min_completed_cycles {
            return None;
        }

        let durations: Vec<f64> = cycles.iter().map(|c| c.duration_hours).collect();
        let median_hours = median(&durations);
        let observation_period_days = observation_period_days(&cycles);

        Some(HistoricalPattern {
            completed_cycle_count: count,
            median_completed_hold_time_hours: median_hours,
            historical_average_hold_time_hours: capital_weighted_hold_hours(&cycles),
            behavior_type: behavior_type_for(median_hours),
            exit_pattern: exit_pattern(sequences, &cycles),
            data_quality: self.data_quality(count, observation_period_days),
            observation_period_days,
        })
    }

    /// Grows with cycle count, decays once the observation window exceeds the maximum age.
    pub fn data_quality(&self, cycle_count: u64, observation_period_days: f64) -> f64 {
        let count_factor = if self.config.sufficient_cycle_count == 0 {
            1.0
        } else {
            (cycle_count as f64 / self.config.sufficient_cycle_count as f64).min(1.0)
        };

        let max_age = self.config.max_data_age_days;
        let recency_factor = if max_age <= 0.0 || observation_period_days <= max_age {
            1.0
        } else {
            max_age / observation_period_days
        };

        (count_factor * recency_factor).clamp(0.0, 1.0)
    }
}

fn observation_period_days(cycles: &[CompletedCycle]) -> f64 {
    let first = cycles.iter().map(|c| c.buy_timestamp).min();
    let last = cycles.iter().map(|c| c.sell_timestamp).max();

    match (first, last) {
        (Some(first), Some(last)) if last > first => (last - first) as f64 / SECONDS_PER_DAY,
        _ => 0.0,
    }
}

fn exit_pattern(
    sequences: &BTreeMap<TokenId, TokenTradeSequence>,
    cycles: &[CompletedCycle],
) -> ExitPattern {
    let mut cycle_mints: Vec<&TokenId> = cycles.iter().map(|c| &c.mint).collect();
    cycle_mints.dedup();

    if cycle_mints.is_empty() {
        return ExitPattern::AllAtOnce;
    }

    let sells: u64 = cycle_mints
        .iter()
        .filter_map(|mint| sequences.get(*mint))
        .map(|seq| seq.sell_count)
        .sum();
    let sells_per_token = sells as f64 / cycle_mints.len() as f64;

    if sells_per_token <= GRADUAL_EXIT_MIN_SELLS_PER_TOKEN {
        ExitPattern::AllAtOnce
    } else {
        ExitPattern::Gradual
    }
}

/// Interpretation derived only from a populated pattern and the wallet's flow signal.
pub fn interpret(pattern: &HistoricalPattern, flow: Option<FlowSignal>) -> TradingInterpretation {
    let typical = pattern.median_completed_hold_time_hours;
    let economic = pattern.historical_average_hold_time_hours;

    let behavioral_pattern = match flow {
        Some(FlowSignal::Accumulating) => BehavioralPattern::Accumulator,
        Some(FlowSignal::Distributing) => BehavioralPattern::Distributor,
        None if pattern.behavior_type == BehaviorType::Holder => BehavioralPattern::Holder,
        None => BehavioralPattern::Balanced,
    };

    let speed_category = speed_category_for(typical);
    let economic_risk = economic_risk_for(economic);

    let interpretation = format!(
        "{} {}: typical hold {:.1}h, capital-weighted hold {:.1}h; {} flow, {} economic risk, {} \
         (based on {} completed cycles over {:.1} days)",
        speed_category,
        pattern.behavior_type,
        typical,
        economic,
        behavioral_pattern,
        economic_risk,
        pattern.exit_pattern,
        pattern.completed_cycle_count,
        pattern.observation_period_days,
    );

    TradingInterpretation {
        speed_category,
        typical_hold_time_hours: typical,
        economic_hold_time_hours: economic,
        economic_risk,
        behavioral_pattern,
        interpretation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::build_sequences;
    use std::collections::HashSet;
    use swap_core::types::SwapEvent;

    const HOUR: i64 = 3600;
    const DAY: i64 = 86_400;

    fn cycle(mint: &str, start: i64, hours: i64, sol: f64) -> Vec<SwapEvent> {
        vec![
            SwapEvent::buy(mint, sol, start),
            SwapEvent::sell(mint, sol, start + hours * HOUR),
        ]
    }

    fn sequences(events: Vec<SwapEvent>) -> BTreeMap<TokenId, TokenTradeSequence> {
        build_sequences(&events, &HashSet::new())
    }

    #[test]
    fn test_capital_weighting_differs_from_median() {
        let mut events = Vec::new();
        events.extend(cycle("a", 0, 1, 1.0));
        events.extend(cycle("b", 0, 1, 1.0));
        events.extend(cycle("c", 0, 100, 98.0));
        let seqs = sequences(events);

        let config = AnalysisConfig::default();
        let pattern = HistoricalPatternBuilder::new(&config).build(&seqs).unwrap();

        assert_eq!(pattern.completed_cycle_count, 3);
        assert_eq!(pattern.median_completed_hold_time_hours, 1.0);
        // (1*1 + 1*1 + 100*98) / 100
        assert!((pattern.historical_average_hold_time_hours - 98.02).abs() < 1e-9);
        assert_eq!(pattern.behavior_type, BehaviorType::Flipper);
    }

    #[test]
    fn test_zero_weight_falls_back_to_mean() {
        let cycles = vec![
            CompletedCycle {
                mint: "a".into(),
                buy_timestamp: 0,
                sell_timestamp: HOUR,
                duration_hours: 1.0,
                weight_sol: 0.0,
            },
            CompletedCycle {
                mint: "a".into(),
                buy_timestamp: 0,
                sell_timestamp: 3 * HOUR,
                duration_hours: 3.0,
                weight_sol: 0.0,
            },
        ];
        assert_eq!(capital_weighted_hold_hours(&cycles), 2.0);
        assert_eq!(capital_weighted_hold_hours(&[]), 0.0);
    }

    #[test]
    fn test_pattern_absent_below_minimum_cycles() {
        let mut events = cycle("a", 0, 1, 1.0);
        events.extend(cycle("b", 0, 2, 1.0));
        let seqs = sequences(events);

        let config = AnalysisConfig::default();
        assert!(HistoricalPatternBuilder::new(&config).build(&seqs).is_none());

        let lenient = AnalysisConfig::default().min_completed_cycles(2);
        assert!(HistoricalPatternBuilder::new(&lenient).build(&seqs).is_some());
    }

    #[test]
    fn test_data_quality_saturates() {
        let config = AnalysisConfig::default();
        let builder = HistoricalPatternBuilder::new(&config);

        assert_eq!(builder.data_quality(10, 30.0), 1.0);
        assert_eq!(builder.data_quality(25, 0.0), 1.0);
        assert!((builder.data_quality(5, 30.0) - 0.5).abs() < 1e-9);
        // twice the max window halves quality
        assert!((builder.data_quality(10, 180.0) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_observation_period_and_exit_pattern() {
        let mut events = cycle("a", 0, 1, 1.0);
        events.extend(cycle("a", 10 * DAY, 1, 1.0));
        // gradual exit on b: one buy, three sells
        events.push(SwapEvent::buy("b", 1.0, DAY));
        events.push(SwapEvent::sell("b", 1.0, DAY + HOUR));
        events.push(SwapEvent::sell("b", 1.0, DAY + 2 * HOUR));
        events.push(SwapEvent::sell("b", 1.0, DAY + 3 * HOUR));
        let seqs = sequences(events);

        let config = AnalysisConfig::default();
        let pattern = HistoricalPatternBuilder::new(&config).build(&seqs).unwrap();

        assert_eq!(pattern.completed_cycle_count, 3);
        assert!((pattern.observation_period_days - (10.0 + 1.0 / 24.0)).abs() < 1e-9);
        // (2 + 3) sells over 2 tokens
        assert_eq!(pattern.exit_pattern, ExitPattern::Gradual);
    }

    #[test]
    fn test_interpretation_sources_pattern_verbatim() {
        let pattern = HistoricalPattern {
            completed_cycle_count: 12,
            median_completed_hold_time_hours: 0.4,
            historical_average_hold_time_hours: 30.0,
            behavior_type: BehaviorType::UltraFlipper,
            exit_pattern: ExitPattern::AllAtOnce,
            data_quality: 1.0,
            observation_period_days: 14.0,
        };

        let interpretation = interpret(&pattern, None);

        assert_eq!(interpretation.typical_hold_time_hours, 0.4);
        assert_eq!(interpretation.economic_hold_time_hours, 30.0);
        assert_eq!(interpretation.speed_category, SpeedCategory::UltraFast);
        assert_eq!(interpretation.economic_risk, EconomicRisk::Medium);
        assert_eq!(interpretation.behavioral_pattern, BehavioralPattern::Balanced);
        assert!(interpretation.interpretation.contains("12 completed cycles"));
    }

    #[test]
    fn test_behavioral_pattern_follows_flow_then_hold() {
        let holder = HistoricalPattern {
            completed_cycle_count: 3,
            median_completed_hold_time_hours: 400.0,
            historical_average_hold_time_hours: 400.0,
            behavior_type: BehaviorType::Holder,
            exit_pattern: ExitPattern::AllAtOnce,
            data_quality: 0.3,
            observation_period_days: 40.0,
        };

        assert_eq!(
            interpret(&holder, None).behavioral_pattern,
            BehavioralPattern::Holder
        );
        assert_eq!(
            interpret(&holder, Some(FlowSignal::Accumulating)).behavioral_pattern,
            BehavioralPattern::Accumulator
        );
        assert_eq!(
            interpret(&holder, Some(FlowSignal::Distributing)).behavioral_pattern,
            BehavioralPattern::Distributor
        );
        assert_eq!(interpret(&holder, None).economic_risk, EconomicRisk::Low);
    }
}
