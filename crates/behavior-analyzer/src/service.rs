//! Staleness-aware behavior service.
//!
//! A stored profile is served only when it was computed no earlier than the
//! wallet's last successful ledger sync, and with the same analysis settings
//! the caller asked for. Wallets the ledger has never synced fall back to a
//! fixed TTL.

use chrono::{DateTime, Duration, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use swap_core::config::{AnalysisConfig, CacheConfig};
use swap_core::types::{BehavioralMetrics, TimeRange, WalletBehaviorProfile};
use tracing::{debug, info, warn};

use crate::analyzer::BehaviorAnalyzer;
use crate::error::BehaviorResult;
use crate::store::{ProfileStore, SwapLedger};

/// Outcome of comparing a stored profile against the ledger state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheDecision {
    /// No stored profile.
    Miss,
    /// Stored profile covers everything the ledger knows about.
    Hit,
    /// Ledger has data the stored profile never saw, the TTL elapsed, or the
    /// profile was computed with different settings.
    Stale,
}

impl CacheDecision {
    pub fn evaluate(
        cached_at: Option<DateTime<Utc>>,
        last_sync: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        let Some(cached_at) = cached_at else {
            return CacheDecision::Miss;
        };

        let fresh = match last_sync {
            Some(synced_at) => cached_at >= synced_at,
            None => now - cached_at < ttl,
        };

        if fresh {
            CacheDecision::Hit
        } else {
            CacheDecision::Stale
        }
    }

    /// Decision for a stored profile requested under `fingerprint`.
    pub fn for_profile(
        cached: Option<&WalletBehaviorProfile>,
        fingerprint: &str,
        last_sync: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        match cached {
            Some(profile) if profile.config_fingerprint != fingerprint => CacheDecision::Stale,
            _ => Self::evaluate(cached.map(|p| p.updated_at), last_sync, now, ttl),
        }
    }
}

type SharedComputation = Shared<BoxFuture<'static, BehaviorResult<Option<Arc<BehavioralMetrics>>>>>;

/// (wallet, analysis config fingerprint)
type InFlightKey = (String, String);

/// A recomputation in progress.
#[derive(Clone)]
struct InFlight {
    id: u64,
    started_at: DateTime<Utc>,
    computation: SharedComputation,
}

impl InFlight {
    /// Joining is only safe if the computation started after the caller's sync.
    fn covers(&self, last_sync: Option<DateTime<Utc>>) -> bool {
        last_sync.map_or(true, |synced_at| self.started_at >= synced_at)
    }
}

/// Serves wallet behavior, recomputing only when the stored profile is stale.
pub struct BehaviorService {
    ledger: Arc<dyn SwapLedger>,
    profiles: Arc<dyn ProfileStore>,
    analyzer: Arc<BehaviorAnalyzer>,
    cache_config: CacheConfig,
    in_flight: Arc<DashMap<InFlightKey, InFlight>>,
    next_id: AtomicU64,
}

impl BehaviorService {
    pub fn new(ledger: Arc<dyn SwapLedger>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self {
            ledger,
            profiles,
            analyzer: Arc::new(BehaviorAnalyzer::new()),
            cache_config: CacheConfig::default(),
            in_flight: Arc::new(DashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    pub fn with_cache_config(mut self, cache_config: CacheConfig) -> Self {
        self.cache_config = cache_config;
        self
    }

    pub fn with_analyzer(mut self, analyzer: BehaviorAnalyzer) -> Self {
        self.analyzer = Arc::new(analyzer);
        self
    }

    /// Behavior for a wallet, or `None` if the ledger has never heard of it.
    ///
    /// Time-ranged requests are always computed fresh and never touch the
    /// profile store.
    pub async fn get_wallet_behavior(
        &self,
        wallet: &str,
        config: &AnalysisConfig,
        range: Option<TimeRange>,
    ) -> BehaviorResult<Option<BehavioralMetrics>> {
        if let Some(range) = range {
            let events = self.ledger.fetch_swaps(wallet, Some(range)).await?;
            debug!(wallet = %wallet, events = events.len(), "Computing ranged behavior");
            return Ok(Some(self.analyzer.analyze(wallet, &events, config)));
        }

        let (cached, last_sync) = tokio::join!(
            self.profiles.get_profile(wallet),
            self.ledger.last_successful_sync(wallet)
        );

        let cached = match cached {
            Ok(profile) => profile,
            Err(e) => {
                warn!(wallet = %wallet, error = %e, "Failed to read cached profile, recomputing");
                None
            }
        };
        let last_sync = last_sync?;

        let fingerprint = config.fingerprint();
        let ttl = Duration::minutes(self.cache_config.ttl_minutes);
        let decision =
            CacheDecision::for_profile(cached.as_ref(), &fingerprint, last_sync, Utc::now(), ttl);

        debug!(
            wallet = %wallet,
            decision = ?decision,
            cached_at = ?cached.as_ref().map(|p| p.updated_at),
            last_sync = ?last_sync,
            "Evaluated behavior cache"
        );

        if let (CacheDecision::Hit, Some(profile)) = (decision, cached.as_ref()) {
            return Ok(Some(profile.metrics.clone()));
        }

        let known_wallet = cached.is_some() || last_sync.is_some();
        let metrics = self
            .recompute(wallet, config, fingerprint, last_sync, known_wallet)
            .await?;

        Ok(metrics.map(|m| (*m).clone()))
    }

    /// Join a recomputation that already covers `last_sync`, or start one.
    async fn recompute(
        &self,
        wallet: &str,
        config: &AnalysisConfig,
        fingerprint: String,
        last_sync: Option<DateTime<Utc>>,
        known_wallet: bool,
    ) -> BehaviorResult<Option<Arc<BehavioralMetrics>>> {
        let key = (wallet.to_string(), fingerprint);

        let computation = match self.in_flight.entry(key.clone()) {
            Entry::Occupied(entry) if entry.get().covers(last_sync) => {
                debug!(wallet = %wallet, "Joining in-flight recomputation");
                entry.get().computation.clone()
            }
            Entry::Occupied(mut entry) => {
                debug!(
                    wallet = %wallet,
                    in_flight_started_at = %entry.get().started_at,
                    last_sync = ?last_sync,
                    "In-flight recomputation predates last sync, starting another"
                );
                let job = self.start(key, config, known_wallet);
                let computation = job.computation.clone();
                entry.insert(job);
                computation
            }
            Entry::Vacant(entry) => {
                let job = self.start(key, config, known_wallet);
                let computation = job.computation.clone();
                entry.insert(job);
                computation
            }
        };

        computation.await
    }

    fn start(&self, key: InFlightKey, config: &AnalysisConfig, known_wallet: bool) -> InFlight {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        // Captured before the ledger is read so a sync landing mid-computation leaves the result stale.
        let started_at = Utc::now();

        let job = RecomputeJob {
            ledger: Arc::clone(&self.ledger),
            profiles: Arc::clone(&self.profiles),
            analyzer: Arc::clone(&self.analyzer),
            wallet: key.0.clone(),
            config: config.clone(),
            fingerprint: key.1.clone(),
            started_at,
            known_wallet,
        };
        let in_flight = Arc::clone(&self.in_flight);

        let computation = async move {
            let result = job.run().await;
            in_flight.remove_if(&key, |_, current| current.id == id);
            result
        }
        .boxed()
        .shared();

        InFlight {
            id,
            started_at,
            computation,
        }
    }
}

/// One owned recomputation of a wallet's profile.
struct RecomputeJob {
    ledger: Arc<dyn SwapLedger>,
    profiles: Arc<dyn ProfileStore>,
    analyzer: Arc<BehaviorAnalyzer>,
    wallet: String,
    config: AnalysisConfig,
    fingerprint: String,
    started_at: DateTime<Utc>,
    known_wallet: bool,
}

impl RecomputeJob {
    async fn run(self) -> BehaviorResult<Option<Arc<BehavioralMetrics>>> {
        let wallet = self.wallet.as_str();
        let events = self.ledger.fetch_swaps(wallet, None).await?;

        if events.is_empty() && !self.known_wallet {
            debug!(wallet = %wallet, "Wallet unknown to ledger");
            return Ok(None);
        }

        let metrics = self.analyzer.analyze(wallet, &events, &self.config);
        let profile = WalletBehaviorProfile::new(metrics, self.started_at)
            .with_config_fingerprint(self.fingerprint);

        if let Err(e) = self.profiles.upsert_profile(&profile).await {
            warn!(wallet = %wallet, error = %e, "Failed to persist behavior profile");
        }

        info!(
            wallet = %wallet,
            events = events.len(),
            style = ?profile.metrics.trading_style,
            "Recomputed wallet behavior"
        );

        Ok(Some(Arc::new(profile.metrics)))
    }
}
