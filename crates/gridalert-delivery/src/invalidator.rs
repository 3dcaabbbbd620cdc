//! Cleanup of tokens proven permanently invalid.

use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use gridalert_cache::PreferenceCache;
use gridalert_core::traits::repository::TokenStore;

/// Consumes permanent per-token failures: evicts each token from the
/// preference cache immediately and marks the persisted record inactive in
/// the background.
///
/// The cache eviction runs first because it prevents repeat failures within
/// the current TTL window; the store update is the system of record for the
/// next full refresh.
pub struct TokenInvalidator {
    cache: Arc<PreferenceCache>,
    token_store: Arc<dyn TokenStore>,
}

impl std::fmt::Debug for TokenInvalidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenInvalidator").finish_non_exhaustive()
    }
}

impl TokenInvalidator {
    /// Create a new invalidator.
    pub fn new(cache: Arc<PreferenceCache>, token_store: Arc<dyn TokenStore>) -> Self {
        Self { cache, token_store }
    }

    /// Invalidate a batch of permanently failed tokens.
    ///
    /// Returns the handle of the background store update; the dispatcher
    /// drops it, tests may await it.
    pub fn invalidate(&self, tokens: Vec<String>) -> JoinHandle<()> {
        for token in &tokens {
            self.cache.evict_token(token);
        }
        info!(count = tokens.len(), "Invalidated permanently failed tokens");

        let store = Arc::clone(&self.token_store);
        tokio::spawn(async move {
            let deactivated_at = Utc::now();
            for token in tokens {
                if let Err(e) = store.mark_inactive(&token, deactivated_at).await {
                    warn!(error = %e, "Failed to deactivate token in store");
                }
            }
        })
    }
}
