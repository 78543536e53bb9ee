//! Behavior Analyzer
//!
//! Classify a wallet's swap history into a trading style and serve the
//! result through a staleness-aware profile cache.

pub mod activity;
pub mod analyzer;
pub mod classifier;
pub mod error;
pub mod historical;
pub mod pg;
pub mod scoring;
pub mod sequence;
pub mod service;
pub mod store;
pub mod timing;

pub use analyzer::BehaviorAnalyzer;
pub use classifier::{ClassifierConfig, StyleClassification, StyleClassifier, StyleFeatures};
pub use error::{BehaviorError, BehaviorResult};
pub use pg::{PgProfileStore, PgSwapLedger};
pub use scoring::{FlipperScore, FlipperWeights};
pub use sequence::{build_sequences, match_pairs, TokenTradeSequence};
pub use service::{BehaviorService, CacheDecision};
pub use store::{MemoryProfileStore, MemorySwapLedger, ProfileStore, SwapLedger};
pub use timing::TimingStats;
