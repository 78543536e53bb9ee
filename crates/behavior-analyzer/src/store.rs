//! Collaborator interfaces: the swap ledger and the behavior profile store.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use swap_core::types::{SwapEvent, TimeRange, WalletBehaviorProfile};
use swap_core::Result;
use tokio::sync::RwLock;

/// Read side of the swap ledger.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SwapLedger: Send + Sync {
    /// All swaps for a wallet, optionally limited to a time range.
    async fn fetch_swaps(&self, wallet: &str, range: Option<TimeRange>) -> Result<Vec<SwapEvent>>;

    /// When the ledger last finished syncing this wallet, if ever.
    async fn last_successful_sync(&self, wallet: &str) -> Result<Option<DateTime<Utc>>>;
}

/// Persistence for computed behavior profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, wallet: &str) -> Result<Option<WalletBehaviorProfile>>;

    async fn upsert_profile(&self, profile: &WalletBehaviorProfile) -> Result<()>;
}

/// In-memory swap ledger for testing and local runs.
pub struct MemorySwapLedger {
    swaps: Arc<RwLock<HashMap<String, Vec<SwapEvent>>>>,
    syncs: Arc<RwLock<HashMap<String, DateTime<Utc>>>>,
}

impl MemorySwapLedger {
    pub fn new() -> Self {
        Self {
            swaps: Arc::new(RwLock::new(HashMap::new())),
            syncs: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Append swaps for a wallet.
    pub async fn record_swaps(&self, wallet: &str, events: Vec<SwapEvent>) {
        let mut swaps = self.swaps.write().await;
        swaps.entry(wallet.to_string()).or_default().extend(events);
    }

    /// Mark a wallet as synced at the given instant.
    pub async fn mark_synced(&self, wallet: &str, at: DateTime<Utc>) {
        let mut syncs = self.syncs.write().await;
        syncs.insert(wallet.to_string(), at);
    }
}

impl Default for MemorySwapLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SwapLedger for MemorySwapLedger {
    async fn fetch_swaps(&self, wallet: &str, range: Option<TimeRange>) -> Result<Vec<SwapEvent>> {
        let swaps = self.swaps.read().await;

        Ok(swaps
            .get(wallet)
            .map(|events| {
                events
                    .iter()
                    .filter(|e| range.map_or(true, |r| r.contains(e.timestamp_seconds)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn last_successful_sync(&self, wallet: &str) -> Result<Option<DateTime<Utc>>> {
        let syncs = self.syncs.read().await;
        Ok(syncs.get(wallet).copied())
    }
}

/// In-memory profile store for testing and local runs.
pub struct MemoryProfileStore {
    profiles: Arc<RwLock<HashMap<String, WalletBehaviorProfile>>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self {
            profiles: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn len(&self) -> usize {
        self.profiles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.profiles.read().await.is_empty()
    }
}

impl Default for MemoryProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn get_profile(&self, wallet: &str) -> Result<Option<WalletBehaviorProfile>> {
        let profiles = self.profiles.read().await;
        Ok(profiles.get(wallet).cloned())
    }

    async fn upsert_profile(&self, profile: &WalletBehaviorProfile) -> Result<()> {
        let mut profiles = self.profiles.write().await;
        profiles.insert(profile.wallet_address.clone(), profile.clone());
        Ok(())
    }
}
