//! PostgreSQL-backed swap ledger and profile store.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use swap_core::types::{
    BehavioralMetrics, SwapDirection, SwapEvent, TimeRange, WalletBehaviorProfile,
};
use swap_core::Result;
use tracing::warn;

use crate::store::{ProfileStore, SwapLedger};

/// Swap ledger reading the `swap_records` and `wallet_sync_state` tables.
pub struct PgSwapLedger {
    pool: PgPool,
}

impl PgSwapLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl SwapLedger for PgSwapLedger {
    async fn fetch_swaps(&self, wallet: &str, range: Option<TimeRange>) -> Result<Vec<SwapEvent>> {
        let (from, to) = match range {
            Some(r) => (r.start.timestamp(), r.end.timestamp()),
            None => (i64::MIN, i64::MAX),
        };

        let rows = sqlx::query(
            r#"
            SELECT mint, direction, amount_token_units, associated_sol_value, timestamp_seconds
            FROM swap_records
            WHERE wallet_address = $1
              AND timestamp_seconds BETWEEN $2 AND $3
            ORDER BY timestamp_seconds ASC, id ASC
            "#,
        )
        .bind(wallet)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        let mut events = Vec::with_capacity(rows.len());
        for r in rows {
            let direction_str: String = r.get("direction");
            let direction: SwapDirection = match direction_str.parse() {
                Ok(d) => d,
                Err(e) => {
                    warn!(wallet = %wallet, error = %e, "Skipping swap with unknown direction");
                    continue;
                }
            };

            events.push(SwapEvent {
                mint: r.get("mint"),
                direction,
                amount_token_units: r.get("amount_token_units"),
                associated_sol_value: r.get("associated_sol_value"),
                timestamp_seconds: r.get("timestamp_seconds"),
            });
        }

        Ok(events)
    }

    async fn last_successful_sync(&self, wallet: &str) -> Result<Option<DateTime<Utc>>> {
        let row = sqlx::query(
            r#"
            SELECT last_successful_sync
            FROM wallet_sync_state
            WHERE wallet_address = $1
            "#,
        )
        .bind(wallet)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.get("last_successful_sync")))
    }
}

/// Profile store over the `wallet_behavior_profiles` table.
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ProfileStore for PgProfileStore {
    async fn get_profile(&self, wallet: &str) -> Result<Option<WalletBehaviorProfile>> {
        let row = sqlx::query(
            r#"
            SELECT wallet_address, metrics, config_fingerprint, updated_at
            FROM wallet_behavior_profiles
            WHERE wallet_address = $1
            "#,
        )
        .bind(wallet)
        .fetch_optional(&self.pool)
        .await?;

        let Some(r) = row else {
            return Ok(None);
        };

        let metrics_json: serde_json::Value = r.get("metrics");
        let metrics: BehavioralMetrics = serde_json::from_value(metrics_json)?;

        Ok(Some(WalletBehaviorProfile {
            wallet_address: r.get("wallet_address"),
            metrics,
            config_fingerprint: r.get("config_fingerprint"),
            updated_at: r.get("updated_at"),
        }))
    }

    async fn upsert_profile(&self, profile: &WalletBehaviorProfile) -> Result<()> {
        let metrics_json = serde_json::to_value(&profile.metrics)?;
        let style = serde_json::to_value(profile.metrics.trading_style)?;

        sqlx::query(
            r#"
            INSERT INTO wallet_behavior_profiles
                (wallet_address, metrics, trading_style, config_fingerprint, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (wallet_address) DO UPDATE SET
                metrics = EXCLUDED.metrics,
                trading_style = EXCLUDED.trading_style,
                config_fingerprint = EXCLUDED.config_fingerprint,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(&profile.wallet_address)
        .bind(&metrics_json)
        .bind(style.as_str().unwrap_or_default())
        .bind(&profile.config_fingerprint)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
