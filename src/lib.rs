//! Wallet Behavior: trading style analysis from swap history
//!
//! This is the root crate that provides benchmark access to the internal modules.
//! For actual functionality, use the individual crates directly:
//!
//! - `swap-core`: Swap and behavior types, configuration, database pool
//! - `behavior-analyzer`: Pair matching, timing, classification, cached service
//! - `behavior-scanner`: Command-line analysis of a single wallet

// Re-export for benchmarks
pub use behavior_analyzer as analyzer;
pub use swap_core as core;
