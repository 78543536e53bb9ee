//! Persisted behavior profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::behavior::BehavioralMetrics;

/// A stored [`BehavioralMetrics`] snapshot for one wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletBehaviorProfile {
    pub wallet_address: String,
    pub metrics: BehavioralMetrics,
    /// [`AnalysisConfig::fingerprint`](crate::config::AnalysisConfig::fingerprint) of the settings used.
    #[serde(default)]
    pub config_fingerprint: String,
    /// When the computation that produced `metrics` started.
    pub updated_at: DateTime<Utc>,
}

impl WalletBehaviorProfile {
    pub fn new(metrics: BehavioralMetrics, updated_at: DateTime<Utc>) -> Self {
        Self {
            wallet_address: metrics.wallet_address.clone(),
            metrics,
            config_fingerprint: String::new(),
            updated_at,
        }
    }

    pub fn with_config_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.config_fingerprint = fingerprint.into();
        self
    }
}
