//! Behavioral metrics produced by wallet analysis.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::swap::TokenId;

/// Trading style label assigned by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradingStyle {
    TrueFlipper,
    FastTrader,
    DayTrader,
    SwingTrader,
    PositionTrader,
    Accumulator,
    Distributor,
    ChaoticTrader,
    MixedStyle,
    InsufficientData,
}

impl fmt::Display for TradingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TradingStyle::TrueFlipper => "True Flipper",
            TradingStyle::FastTrader => "Fast Trader",
            TradingStyle::DayTrader => "Day Trader",
            TradingStyle::SwingTrader => "Swing Trader",
            TradingStyle::PositionTrader => "Position Trader",
            TradingStyle::Accumulator => "Accumulator",
            TradingStyle::Distributor => "Distributor",
            TradingStyle::ChaoticTrader => "Chaotic Trader",
            TradingStyle::MixedStyle => "Mixed Style",
            TradingStyle::InsufficientData => "Insufficient Data",
        };
        f.write_str(label)
    }
}

/// Fraction of matched-pair hold durations falling into each time window.
///
/// Buckets are disjoint and ascending. All zero when there are no matched pairs,
/// otherwise they sum to 1.0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingTimeDistribution {
    /// < 30 minutes.
    pub ultra_fast: f64,
    /// 30 - 60 minutes.
    pub very_fast: f64,
    /// 1 - 4 hours.
    pub fast: f64,
    /// 4 - 8 hours.
    pub moderate: f64,
    /// 8 - 24 hours.
    pub day_trader: f64,
    /// 1 - 7 days.
    pub swing: f64,
    /// 7 days or longer.
    pub position: f64,
}

impl TradingTimeDistribution {
    pub fn as_array(&self) -> [f64; 7] {
        [
            self.ultra_fast,
            self.very_fast,
            self.fast,
            self.moderate,
            self.day_trader,
            self.swing,
            self.position,
        ]
    }

    pub fn total(&self) -> f64 {
        self.as_array().iter().sum()
    }
}

/// Hold-time classification of completed cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorType {
    UltraFlipper,
    Flipper,
    Swing,
    Holder,
}

impl fmt::Display for BehaviorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BehaviorType::UltraFlipper => "ultra flipper",
            BehaviorType::Flipper => "flipper",
            BehaviorType::Swing => "swing trader",
            BehaviorType::Holder => "holder",
        };
        f.write_str(label)
    }
}

/// How positions are typically closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitPattern {
    AllAtOnce,
    Gradual,
}

impl fmt::Display for ExitPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitPattern::AllAtOnce => f.write_str("exits all at once"),
            ExitPattern::Gradual => f.write_str("exits gradually"),
        }
    }
}

/// Pattern derived from economically completed buy→sell cycles only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalPattern {
    pub completed_cycle_count: u64,
    /// Unweighted median hold time.
    pub median_completed_hold_time_hours: f64,
    /// Hold time weighted by the SOL value of the closing sell.
    pub historical_average_hold_time_hours: f64,
    pub behavior_type: BehaviorType,
    pub exit_pattern: ExitPattern,
    /// 0.0 - 1.0
    pub data_quality: f64,
    pub observation_period_days: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedCategory {
    UltraFast,
    Fast,
    Moderate,
    Slow,
}

impl fmt::Display for SpeedCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SpeedCategory::UltraFast => "ultra-fast",
            SpeedCategory::Fast => "fast",
            SpeedCategory::Moderate => "moderate",
            SpeedCategory::Slow => "slow",
        };
        f.write_str(label)
    }
}

/// Risk implied by how long capital stays deployed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EconomicRisk {
    Critical,
    High,
    Medium,
    Low,
}

impl fmt::Display for EconomicRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EconomicRisk::Critical => "critical",
            EconomicRisk::High => "high",
            EconomicRisk::Medium => "medium",
            EconomicRisk::Low => "low",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehavioralPattern {
    Accumulator,
    Distributor,
    Holder,
    Balanced,
}

impl fmt::Display for BehavioralPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BehavioralPattern::Accumulator => "accumulating",
            BehavioralPattern::Distributor => "distributing",
            BehavioralPattern::Holder => "holding",
            BehavioralPattern::Balanced => "balanced",
        };
        f.write_str(label)
    }
}

/// Human-oriented reading of a [`HistoricalPattern`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingInterpretation {
    pub speed_category: SpeedCategory,
    pub typical_hold_time_hours: f64,
    pub economic_hold_time_hours: f64,
    pub economic_risk: EconomicRisk,
    pub behavioral_pattern: BehavioralPattern,
    pub interpretation: String,
}

/// When and how often the wallet trades.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityProfile {
    pub first_trade_timestamp: Option<i64>,
    pub last_trade_timestamp: Option<i64>,
    /// Distinct UTC dates with at least one trade.
    pub active_days: u64,
    pub average_trades_per_day: f64,
    /// Trade count per UTC hour of day.
    pub hourly_distribution: [u64; 24],
    pub session_count: u64,
    pub average_trades_per_session: f64,
}

/// SOL-denominated trade size statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueProfile {
    pub total_sol_volume: f64,
    pub average_trade_sol: f64,
    pub largest_trade_sol: f64,
    pub sol_volume_std_dev: f64,
    pub top_tokens_by_trade_count: Vec<TokenId>,
}

/// Full behavioral snapshot for one wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehavioralMetrics {
    pub wallet_address: String,

    // Counts
    pub unique_tokens_traded: u64,
    pub total_trade_count: u64,
    pub total_buy_count: u64,
    pub total_sell_count: u64,
    pub tokens_with_both_buy_and_sell: u64,
    pub complete_pairs_count: u64,

    // Ratios
    /// max(buys, sells) / min(buys, sells); 0 when either side is zero.
    pub buy_sell_ratio: f64,
    pub buy_sell_symmetry: f64,
    pub sequence_consistency: f64,

    // Timing
    pub trading_time_distribution: TradingTimeDistribution,
    pub percent_trades_under_1_hour: f64,
    pub percent_trades_under_4_hours: f64,
    pub median_hold_time: f64,
    pub average_flip_duration_hours: f64,

    // Classification
    pub trading_style: TradingStyle,
    pub confidence_score: f64,
    pub flipper_score: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub historical_pattern: Option<HistoricalPattern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trading_interpretation: Option<TradingInterpretation>,

    // Supplementary
    pub reentry_rate: f64,
    pub percentage_of_unpaired_tokens: f64,
    pub activity: ActivityProfile,
    pub value: ValueProfile,
}

impl BehavioralMetrics {
    /// All-zero metrics for a wallet with nothing to analyze.
    pub fn empty(wallet_address: impl Into<String>) -> Self {
        Self {
            wallet_address: wallet_address.into(),
            unique_tokens_traded: 0,
            total_trade_count: 0,
            total_buy_count: 0,
            total_sell_count: 0,
            tokens_with_both_buy_and_sell: 0,
            complete_pairs_count: 0,
            buy_sell_ratio: 0.0,
            buy_sell_symmetry: 0.0,
            sequence_consistency: 0.0,
            trading_time_distribution: TradingTimeDistribution::default(),
            percent_trades_under_1_hour: 0.0,
            percent_trades_under_4_hours: 0.0,
            median_hold_time: 0.0,
            average_flip_duration_hours: 0.0,
            trading_style: TradingStyle::InsufficientData,
            confidence_score: 0.0,
            flipper_score: 0.0,
            historical_pattern: None,
            trading_interpretation: None,
            reentry_rate: 0.0,
            percentage_of_unpaired_tokens: 0.0,
            activity: ActivityProfile::default(),
            value: ValueProfile::default(),
        }
    }

    /// Ratio of complete pairs to all trades.
    pub fn pair_ratio(&self) -> f64 {
        if self.total_trade_count == 0 {
            0.0
        } else {
            self.complete_pairs_count as f64 / self.total_trade_count as f64
        }
    }

    pub fn has_history(&self) -> bool {
        self.historical_pattern.is_some()
    }
}
