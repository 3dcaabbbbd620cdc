//! Preference/token cache configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the in-memory preference/token snapshot cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How long a snapshot stays valid before the next resolution triggers
    /// a refresh.
    #[serde(default = "default_ttl")]
    pub ttl_seconds: u64,
}

impl CacheConfig {
    /// The snapshot TTL as a [`Duration`].
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl(),
        }
    }
}

fn default_ttl() -> u64 {
    300
}
