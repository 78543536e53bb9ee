//! Behavior Scanner
//!
//! Analyzes one wallet's swap history and prints its behavior profile as JSON.

use std::sync::Arc;

use anyhow::Result;
use behavior_analyzer::{BehaviorService, PgProfileStore, PgSwapLedger};
use chrono::{DateTime, Utc};
use clap::Parser;
use swap_core::config::Config;
use swap_core::db;
use swap_core::types::TimeRange;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "behavior-scanner", about = "Classify a wallet's trading behavior")]
struct Args {
    /// Wallet address to analyze
    wallet: String,

    /// Only analyze swaps at or after this instant (RFC 3339). Bypasses the profile cache.
    #[arg(long)]
    from: Option<DateTime<Utc>>,

    /// Only analyze swaps at or before this instant (RFC 3339). Bypasses the profile cache.
    #[arg(long)]
    to: Option<DateTime<Utc>>,

    /// Load configuration from a file, with BEHAVIOR_ environment overrides
    #[arg(long)]
    config: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,

    /// Print the result on a single line
    #[arg(long)]
    compact: bool,
}

impl Args {
    fn time_range(&self) -> Option<TimeRange> {
        if self.from.is_none() && self.to.is_none() {
            return None;
        }
        let start = self.from.unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        let end = self.to.unwrap_or_else(Utc::now);
        Some(TimeRange::new(start, end))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "behavior_scanner=info,behavior_analyzer=info,swap_core=info".into()
            }),
        )
        .with(args.json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!args.json).then(tracing_subscriber::fmt::layer))
        .init();

    info!("Starting Behavior Scanner");

    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };

    let range = args.time_range();
    if let Some(r) = &range {
        if r.start > r.end {
            anyhow::bail!("--from must not be later than --to");
        }
    }

    let pool = db::create_pool(&config.database).await?;
    db::run_migrations(&pool).await?;

    let service = BehaviorService::new(
        Arc::new(PgSwapLedger::new(pool.clone())),
        Arc::new(PgProfileStore::new(pool)),
    )
    .with_cache_config(config.cache.clone());

    info!(wallet = %args.wallet, ranged = range.is_some(), "Analyzing wallet");

    let Some(metrics) = service
        .get_wallet_behavior(&args.wallet, &config.analysis, range)
        .await?
    else {
        anyhow::bail!("No swap history known for wallet {}", args.wallet);
    };

    info!(
        wallet = %args.wallet,
        style = ?metrics.trading_style,
        confidence = metrics.confidence_score,
        "Analysis complete"
    );

    let output = if args.compact {
        serde_json::to_string(&metrics)?
    } else {
        serde_json::to_string_pretty(&metrics)?
    };
    println!("{output}");

    Ok(())
}
