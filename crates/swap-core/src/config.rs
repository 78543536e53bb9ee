//! Configuration management for the wallet behavior system.

use crate::{Error, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::env;

/// Wrapped SOL mint.
pub const WSOL_MINT: &str = "So11111111111111111111111111111111111111112";
/// USDC mint.
pub const USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
/// USDT mint.
pub const USDT_MINT: &str = "Es9vMFrzaCERmJfrF4H2FYD4KCoNkY11McCe8BenwNYB";

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

/// Per-request analysis parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Completed cycles required before a historical pattern is reported.
    pub min_completed_cycles: u64,
    /// Observation window beyond which data quality decays.
    pub max_data_age_days: f64,
    /// Completed cycles at which the count component of data quality saturates.
    pub sufficient_cycle_count: u64,
    /// Gap that splits two trades into separate sessions.
    pub session_gap_minutes: i64,
    /// Mints dropped before analysis (stablecoins, wrapped native).
    pub excluded_mints: HashSet<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_completed_cycles: 3,
            max_data_age_days: 90.0,
            sufficient_cycle_count: 10,
            session_gap_minutes: 30,
            excluded_mints: default_excluded_mints(),
        }
    }
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_completed_cycles(mut self, min: u64) -> Self {
        self.min_completed_cycles = min;
        self
    }

    pub fn max_data_age_days(mut self, days: f64) -> Self {
        self.max_data_age_days = days;
        self
    }

    pub fn sufficient_cycle_count(mut self, count: u64) -> Self {
        self.sufficient_cycle_count = count;
        self
    }

    pub fn exclude_mint(mut self, mint: impl Into<String>) -> Self {
        self.excluded_mints.insert(mint.into());
        self
    }

    pub fn no_exclusions(mut self) -> Self {
        self.excluded_mints.clear();
        self
    }

    /// Stable identity of every setting that shapes computed metrics.
    ///
    /// Independent of the iteration order of `excluded_mints`.
    pub fn fingerprint(&self) -> String {
        let mut mints: Vec<&str> = self.excluded_mints.iter().map(String::as_str).collect();
        mints.sort_unstable();

        format!(
            "min_cycles={};max_age_days={};sufficient={};session_gap={};excluded={}",
            self.min_completed_cycles,
            self.max_data_age_days,
            self.sufficient_cycle_count,
            self.session_gap_minutes,
            mints.join(",")
        )
    }
}

fn default_excluded_mints() -> HashSet<String> {
    [WSOL_MINT, USDC_MINT, USDT_MINT]
        .iter()
        .map(|m| m.to_string())
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// TTL used only when the wallet has no known ledger sync timestamp.
    pub ttl_minutes: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_minutes: 60 }
    }
}

impl Config {
    /// Load configuration from environment variables.
    #[allow(clippy::result_large_err)]
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = AnalysisConfig::default();

        Ok(Self {
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").map_err(|_| Error::Config {
                    message: "DATABASE_URL environment variable not set".to_string(),
                })?,
                max_connections: parse_env("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(default_max_connections),
            },
            analysis: AnalysisConfig {
                min_completed_cycles: parse_env("BEHAVIOR_MIN_COMPLETED_CYCLES")
                    .unwrap_or(defaults.min_completed_cycles),
                max_data_age_days: parse_env("BEHAVIOR_MAX_DATA_AGE_DAYS")
                    .unwrap_or(defaults.max_data_age_days),
                sufficient_cycle_count: parse_env("BEHAVIOR_SUFFICIENT_CYCLES")
                    .unwrap_or(defaults.sufficient_cycle_count),
                session_gap_minutes: parse_env("BEHAVIOR_SESSION_GAP_MINUTES")
                    .unwrap_or(defaults.session_gap_minutes),
                excluded_mints: env::var("BEHAVIOR_EXCLUDED_MINTS")
                    .map(|s| parse_mint_list(&s))
                    .unwrap_or(defaults.excluded_mints),
            },
            cache: CacheConfig {
                ttl_minutes: parse_env("BEHAVIOR_CACHE_TTL_MINUTES")
                    .unwrap_or(CacheConfig::default().ttl_minutes),
            },
        })
    }

    /// Load configuration from a file, with `BEHAVIOR_`-prefixed environment overrides.
    ///
    /// Nested keys use a double underscore, e.g. `BEHAVIOR_DATABASE__URL`.
    #[allow(clippy::result_large_err)]
    pub fn from_file(path: &str) -> Result<Self> {
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("BEHAVIOR")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("analysis.excluded_mints"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Load configuration for testing (with defaults).
    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            database: DatabaseConfig {
                url: "postgres://localhost/wallet_behavior_test".to_string(),
                max_connections: 2,
            },
            analysis: AnalysisConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

fn parse_mint_list(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
