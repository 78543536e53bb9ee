//! Rule-based trading style classification.
//!
//! Rules are evaluated in a fixed priority order and the first match wins, so
//! a wallet that flips fast and also accumulates is a flipper first.

use serde::{Deserialize, Serialize};
use swap_core::types::{BehavioralMetrics, TradingStyle, TradingTimeDistribution};
use tracing::debug;

/// Thresholds for style classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    // Preconditions
    pub min_trade_count: u64,

    // Speed rules
    pub true_flipper_min_ultra_fast: f64,
    pub true_flipper_confidence_boost: f64,
    pub fast_trader_min_under_1_hour: f64,
    pub day_trader_min_under_4_hours: f64,
    pub day_trader_confidence: f64,
    pub swing_min_fraction: f64,
    pub position_min_fraction: f64,
    pub hold_rule_base_confidence: f64,

    // Flow rules
    pub accumulator_min_ratio: f64,
    pub distributor_max_ratio: f64,
    pub flow_max_pair_ratio: f64,
    pub flow_confidence_divisor: f64,
    pub flow_max_confidence: f64,

    // Chaos rule
    pub chaotic_max_consistency: f64,
    pub chaotic_min_tokens: u64,
    pub chaotic_confidence_ceiling: f64,

    pub mixed_confidence: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_trade_count: 5,

            true_flipper_min_ultra_fast: 0.75,
            true_flipper_confidence_boost: 1.1,
            fast_trader_min_under_1_hour: 0.70,
            day_trader_min_under_4_hours: 0.60,
            day_trader_confidence: 0.7,
            swing_min_fraction: 0.4,
            position_min_fraction: 0.5,
            hold_rule_base_confidence: 0.6,

            accumulator_min_ratio: 1.75,
            distributor_max_ratio: 0.6,
            flow_max_pair_ratio: 0.3,
            flow_confidence_divisor: 5.0,
            flow_max_confidence: 0.9,

            chaotic_max_consistency: 0.3,
            chaotic_min_tokens: 5,
            chaotic_confidence_ceiling: 0.9,

            mixed_confidence: 0.4,
        }
    }
}

/// Inputs the classifier looks at.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleFeatures {
    pub total_trade_count: u64,
    pub unique_tokens_traded: u64,
    pub tokens_with_both_buy_and_sell: u64,
    pub complete_pairs_count: u64,
    pub distribution: TradingTimeDistribution,
    pub percent_under_1_hour: f64,
    pub percent_under_4_hours: f64,
    pub buy_sell_ratio: f64,
    pub sequence_consistency: f64,
}

impl StyleFeatures {
    pub fn pair_ratio(&self) -> f64 {
        if self.total_trade_count == 0 {
            0.0
        } else {
            self.complete_pairs_count as f64 / self.total_trade_count as f64
        }
    }
}

impl From<&BehavioralMetrics> for StyleFeatures {
    fn from(metrics: &BehavioralMetrics) -> Self {
        Self {
            total_trade_count: metrics.total_trade_count,
            unique_tokens_traded: metrics.unique_tokens_traded,
            tokens_with_both_buy_and_sell: metrics.tokens_with_both_buy_and_sell,
            complete_pairs_count: metrics.complete_pairs_count,
            distribution: metrics.trading_time_distribution,
            percent_under_1_hour: metrics.percent_trades_under_1_hour,
            percent_under_4_hours: metrics.percent_trades_under_4_hours,
            buy_sell_ratio: metrics.buy_sell_ratio,
            sequence_consistency: metrics.sequence_consistency,
        }
    }
}

/// One-directional capital flow: many entries or exits that rarely pair up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowSignal {
    Accumulating,
    Distributing,
}

/// Result of classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StyleClassification {
    pub style: TradingStyle,
    pub confidence: f64,
}

impl StyleClassification {
    pub fn new(style: TradingStyle, confidence: f64) -> Self {
        Self { style, confidence }
    }

    pub fn insufficient() -> Self {
        Self::new(TradingStyle::InsufficientData, 0.0)
    }
}

/// Ordered decision-rule classifier.
pub struct StyleClassifier {
    config: ClassifierConfig,
}

impl StyleClassifier {
    /// Create a new classifier with default config.
    pub fn new() -> Self {
        Self {
            config: ClassifierConfig::default(),
        }
    }

    /// Create with custom config.
    pub fn with_config(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify a wallet's trading style.
    pub fn classify(&self, features: &StyleFeatures) -> StyleClassification {
        let result = self.evaluate(features);

        debug!(
            style = ?result.style,
            confidence = result.confidence,
            trades = features.total_trade_count,
            "Classified trading style"
        );

        result
    }

    fn evaluate(&self, features: &StyleFeatures) -> StyleClassification {
        let cfg = &self.config;

        if features.total_trade_count < cfg.min_trade_count
            || features.tokens_with_both_buy_and_sell == 0
        {
            return StyleClassification::insufficient();
        }

        let dist = &features.distribution;

        if dist.ultra_fast >= cfg.true_flipper_min_ultra_fast {
            return StyleClassification::new(
                TradingStyle::TrueFlipper,
                (dist.ultra_fast * cfg.true_flipper_confidence_boost).min(1.0),
            );
        }

        if features.percent_under_1_hour >= cfg.fast_trader_min_under_1_hour {
            return StyleClassification::new(
                TradingStyle::FastTrader,
                features.percent_under_1_hour,
            );
        }

        if features.percent_under_4_hours >= cfg.day_trader_min_under_4_hours {
            return StyleClassification::new(TradingStyle::DayTrader, cfg.day_trader_confidence);
        }

        if dist.swing >= cfg.swing_min_fraction {
            return StyleClassification::new(
                TradingStyle::SwingTrader,
                cfg.hold_rule_base_confidence + (dist.swing - cfg.swing_min_fraction),
            );
        }

        if dist.position >= cfg.position_min_fraction {
            return StyleClassification::new(
                TradingStyle::PositionTrader,
                cfg.hold_rule_base_confidence + (dist.position - cfg.position_min_fraction),
            );
        }

        match self.flow_signal(features) {
            Some(FlowSignal::Accumulating) => {
                return StyleClassification::new(
                    TradingStyle::Accumulator,
                    (features.buy_sell_ratio / cfg.flow_confidence_divisor)
                        .min(cfg.flow_max_confidence),
                );
            }
            Some(FlowSignal::Distributing) => {
                let inverse = if features.buy_sell_ratio > 0.0 {
                    1.0 / features.buy_sell_ratio
                } else {
                    0.0
                };
                return StyleClassification::new(
                    TradingStyle::Distributor,
                    (inverse / cfg.flow_confidence_divisor).min(cfg.flow_max_confidence),
                );
            }
            None => {}
        }

        if features.sequence_consistency < cfg.chaotic_max_consistency
            && features.unique_tokens_traded > cfg.chaotic_min_tokens
        {
            return StyleClassification::new(
                TradingStyle::ChaoticTrader,
                cfg.chaotic_confidence_ceiling - features.sequence_consistency,
            );
        }

        StyleClassification::new(TradingStyle::MixedStyle, cfg.mixed_confidence)
    }

    /// Accumulate/distribute signal shared by classification and interpretation.
    pub fn flow_signal(&self, features: &StyleFeatures) -> Option<FlowSignal> {
        let cfg = &self.config;
        let pair_ratio = features.pair_ratio();

        if pair_ratio >= cfg.flow_max_pair_ratio {
            return None;
        }

        if features.buy_sell_ratio > cfg.accumulator_min_ratio {
            Some(FlowSignal::Accumulating)
        } else if features.buy_sell_ratio < cfg.distributor_max_ratio {
            Some(FlowSignal::Distributing)
        } else {
            None
        }
    }
}

impl Default for StyleClassifier {
    fn default() -> Self {
        Self::new()
    }
}
