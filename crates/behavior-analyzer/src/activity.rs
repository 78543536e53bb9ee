//! Activity timing and trade-size statistics.
//!
//! These describe the wallet but never feed the style classifier.

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use statrs::statistics::Statistics;
use std::collections::{BTreeMap, HashSet};
use swap_core::types::{ActivityProfile, SwapEvent, TokenId, ValueProfile};

use crate::sequence::TokenTradeSequence;

const SECONDS_PER_DAY: i64 = 86_400;
const TOP_TOKEN_LIMIT: usize = 5;

/// Activity profile over all (non-excluded) events.
pub fn activity_profile(events: &[&SwapEvent], session_gap_minutes: i64) -> ActivityProfile {
    if events.is_empty() {
        return ActivityProfile::default();
    }

    let mut timestamps: Vec<i64> = events.iter().map(|e| e.timestamp_seconds).collect();
    timestamps.sort_unstable();

    let first = timestamps[0];
    let last = timestamps[timestamps.len() - 1];

    let mut hourly_distribution = [0u64; 24];
    let mut days: HashSet<NaiveDate> = HashSet::new();
    for ts in &timestamps {
        if let Some(dt) = DateTime::<Utc>::from_timestamp(*ts, 0) {
            hourly_distribution[dt.hour() as usize] += 1;
            days.insert(dt.date_naive());
        }
    }

    let gap_seconds = session_gap_minutes.max(0) * 60;
    let session_count = 1 + timestamps
        .windows(2)
        .filter(|w| w[1] - w[0] > gap_seconds)
        .count() as u64;

    let trade_count = timestamps.len() as f64;
    let span_days = ((last - first) / SECONDS_PER_DAY).max(1) as f64;

    ActivityProfile {
        first_trade_timestamp: Some(first),
        last_trade_timestamp: Some(last),
        active_days: days.len() as u64,
        average_trades_per_day: trade_count / span_days,
        hourly_distribution,
        session_count,
        average_trades_per_session: trade_count / session_count as f64,
    }
}

/// SOL trade-size statistics and most-traded tokens.
pub fn value_profile(
    events: &[&SwapEvent],
    sequences: &BTreeMap<TokenId, TokenTradeSequence>,
) -> ValueProfile {
    if events.is_empty() {
        return ValueProfile::default();
    }

    let values: Vec<f64> = events.iter().map(|e| e.associated_sol_value).collect();
    let total: f64 = values.iter().sum();
    let largest = values.iter().cloned().fold(0.0, f64::max);
    let std_dev = if values.len() < 2 {
        0.0
    } else {
        values.iter().population_std_dev()
    };

    let mut by_count: Vec<(&TokenId, u64)> = sequences
        .iter()
        .map(|(mint, seq)| (mint, seq.trade_count()))
        .collect();
    // BTreeMap order breaks ties by mint
    by_count.sort_by(|a, b| b.1.cmp(&a.1));

    ValueProfile {
        total_sol_volume: total,
        average_trade_sol: total / values.len() as f64,
        largest_trade_sol: largest,
        sol_volume_std_dev: if std_dev.is_finite() { std_dev } else { 0.0 },
        top_tokens_by_trade_count: by_count
            .into_iter()
            .take(TOP_TOKEN_LIMIT)
            .map(|(mint, _)| mint.clone())
            .collect(),
    }
}

/// Share of paired tokens that were paired more than once.
pub fn reentry_rate(sequences: &BTreeMap<TokenId, TokenTradeSequence>) -> f64 {
    let paired = sequences.values().filter(|s| s.complete_pairs() >= 1).count();
    if paired == 0 {
        return 0.0;
    }
    let reentered = sequences.values().filter(|s| s.complete_pairs() >= 2).count();
    reentered as f64 / paired as f64
}

/// Share of traded tokens that never produced a matched pair.
pub fn unpaired_token_share(sequences: &BTreeMap<TokenId, TokenTradeSequence>) -> f64 {
    if sequences.is_empty() {
        return 0.0;
    }
    let unpaired = sequences.values().filter(|s| s.complete_pairs() == 0).count();
    unpaired as f64 / sequences.len() as f64
}
