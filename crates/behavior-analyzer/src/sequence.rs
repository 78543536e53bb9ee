//! Per-token trade sequences and buy→sell pair matching.
//!
//! Every consumer of matched pairs (pair counts, hold durations, completed
//! cycles) goes through [`match_pairs`], so they always agree.

use std::collections::{BTreeMap, HashSet};
use swap_core::types::{SwapDirection, SwapEvent, TokenId};

/// State of the pair matcher while walking one token's events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchState {
    ExpectingBuy,
    /// Waiting for a sell to close the buy at this index.
    ExpectingSell(usize),
}

/// A buy closed by a later sell, as indices into a chronological sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchedPair {
    pub buy_index: usize,
    pub sell_index: usize,
}

/// Greedy, non-overlapping buy→sell matching over chronologically sorted events.
///
/// A sell with no open buy is ignored. A second buy while one is open replaces
/// the pending buy; the earlier buy never gets paired.
pub fn match_pairs(events: &[SwapEvent]) -> Vec<MatchedPair> {
    let mut pairs = Vec::new();
    let mut state = MatchState::ExpectingBuy;

    for (index, event) in events.iter().enumerate() {
        state = match (state, event.direction) {
            (MatchState::ExpectingBuy, SwapDirection::In) => MatchState::ExpectingSell(index),
            (MatchState::ExpectingBuy, SwapDirection::Out) => MatchState::ExpectingBuy,
            (MatchState::ExpectingSell(_), SwapDirection::In) => MatchState::ExpectingSell(index),
            (MatchState::ExpectingSell(buy_index), SwapDirection::Out) => {
                pairs.push(MatchedPair {
                    buy_index,
                    sell_index: index,
                });
                MatchState::ExpectingBuy
            }
        };
    }

    pairs
}

/// Chronological trade history for a single token.
#[derive(Debug, Clone)]
pub struct TokenTradeSequence {
    pub mint: TokenId,
    /// Sorted by timestamp ascending; ties keep input order.
    pub events: Vec<SwapEvent>,
    pub buy_count: u64,
    pub sell_count: u64,
    pub pairs: Vec<MatchedPair>,
}

impl TokenTradeSequence {
    /// Build a sequence from one token's events in any order.
    pub fn new(mint: TokenId, mut events: Vec<SwapEvent>) -> Self {
        // sort_by_key is stable
        events.sort_by_key(|e| e.timestamp_seconds);

        let buy_count = events.iter().filter(|e| e.direction.is_buy()).count() as u64;
        let sell_count = events.len() as u64 - buy_count;
        let pairs = match_pairs(&events);

        Self {
            mint,
            events,
            buy_count,
            sell_count,
            pairs,
        }
    }

    pub fn complete_pairs(&self) -> u64 {
        self.pairs.len() as u64
    }

    pub fn trade_count(&self) -> u64 {
        self.buy_count + self.sell_count
    }

    pub fn has_both_sides(&self) -> bool {
        self.buy_count > 0 && self.sell_count > 0
    }

    /// Upper bound on pairs this token could produce.
    pub fn max_possible_pairs(&self) -> u64 {
        self.buy_count.min(self.sell_count)
    }

    /// max/min of buy and sell counts; 0 when either side is empty.
    pub fn buy_sell_ratio(&self) -> f64 {
        normalized_ratio(self.buy_count, self.sell_count)
    }

    /// min/max of buy and sell counts; 0 when either side is empty.
    pub fn symmetry(&self) -> f64 {
        if !self.has_both_sides() {
            return 0.0;
        }
        self.max_possible_pairs() as f64 / self.buy_count.max(self.sell_count) as f64
    }

    /// Matched pairs as (buy, sell) event references.
    pub fn matched_events(&self) -> impl Iterator<Item = (&SwapEvent, &SwapEvent)> + '_ {
        self.pairs
            .iter()
            .map(|p| (&self.events[p.buy_index], &self.events[p.sell_index]))
    }
}

/// Direction-agnostic ratio of the larger count to the smaller.
pub fn normalized_ratio(buys: u64, sells: u64) -> f64 {
    if buys == 0 || sells == 0 {
        return 0.0;
    }
    buys.max(sells) as f64 / buys.min(sells) as f64
}

/// Group a wallet's events by mint, dropping excluded mints.
///
/// Returns an ordered map so downstream iteration is deterministic.
pub fn build_sequences(
    events: &[SwapEvent],
    excluded_mints: &HashSet<String>,
) -> BTreeMap<TokenId, TokenTradeSequence> {
    let mut grouped: BTreeMap<TokenId, Vec<SwapEvent>> = BTreeMap::new();

    for event in events {
        if excluded_mints.contains(&event.mint) {
            continue;
        }
        grouped
            .entry(event.mint.clone())
            .or_default()
            .push(event.clone());
    }

    grouped
        .into_iter()
        .map(|(mint, events)| {
            let sequence = TokenTradeSequence::new(mint.clone(), events);
            (mint, sequence)
        })
        .collect()
}

/// Matched pairs divided by the theoretical maximum across all tokens.
pub fn sequence_consistency<'a>(sequences: impl IntoIterator<Item = &'a TokenTradeSequence>) -> f64 {
    let (pairs, max_pairs) = sequences
        .into_iter()
        .fold((0u64, 0u64), |(pairs, max), seq| {
            (pairs + seq.complete_pairs(), max + seq.max_possible_pairs())
        });

    if max_pairs == 0 {
        0.0
    } else {
        pairs as f64 / max_pairs as f64
    }
}
