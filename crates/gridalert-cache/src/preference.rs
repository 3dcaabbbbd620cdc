//! The preference/token snapshot cache.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use gridalert_core::result::AppResult;
use gridalert_core::traits::repository::{PreferenceStore, TokenStore};
use gridalert_core::types::id::UserId;
use gridalert_core::types::preference::NotificationPreferences;

use crate::clock::Clock;

/// One immutable-by-convention view of the backing stores.
///
/// `refresh` replaces all fields together; `evict_token` and default
/// materialization perform targeted single-key edits under the write lock.
#[derive(Debug, Default)]
struct Snapshot {
    preferences: HashMap<UserId, NotificationPreferences>,
    tokens: HashMap<UserId, String>,
    refreshed_at: Option<Instant>,
}

/// TTL-bounded cache of all notification preferences and active device
/// tokens.
///
/// Many notification cycles read concurrently; writes happen only during
/// [`refresh`](PreferenceCache::refresh), [`evict_token`](PreferenceCache::evict_token),
/// and first-seen default materialization. Refreshes are single-flight: a
/// second trigger while one is in flight waits and then observes the fresh
/// snapshot instead of issuing a duplicate bulk load.
pub struct PreferenceCache {
    preference_store: Arc<dyn PreferenceStore>,
    token_store: Arc<dyn TokenStore>,
    defaults: NotificationPreferences,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    snapshot: RwLock<Snapshot>,
    refresh_guard: tokio::sync::Mutex<()>,
}

impl std::fmt::Debug for PreferenceCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceCache")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl PreferenceCache {
    /// Create an empty cache. The first staleness check reports stale, so
    /// the first resolution triggers the initial bulk load.
    pub fn new(
        preference_store: Arc<dyn PreferenceStore>,
        token_store: Arc<dyn TokenStore>,
        defaults: NotificationPreferences,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            preference_store,
            token_store,
            defaults,
            ttl,
            clock,
            snapshot: RwLock::new(Snapshot::default()),
            refresh_guard: tokio::sync::Mutex::new(()),
        }
    }

    /// Whether the snapshot has outlived its TTL (or was never loaded).
    pub fn is_stale(&self) -> bool {
        let snap = self.snapshot.read().unwrap_or_else(|e| e.into_inner());
        match snap.refreshed_at {
            Some(at) => self.clock.now().duration_since(at) >= self.ttl,
            None => true,
        }
    }

    /// Fetch a user's preferences, materializing the configured default on
    /// first sight.
    ///
    /// Returns the preferences and whether the default was created by this
    /// call. `true` is reported exactly once per user per snapshot epoch;
    /// the caller owns persisting the created default to the backing store.
    pub fn get_or_create(&self, user_id: &UserId) -> (NotificationPreferences, bool) {
        {
            let snap = self.snapshot.read().unwrap_or_else(|e| e.into_inner());
            if let Some(prefs) = snap.preferences.get(user_id) {
                return (prefs.clone(), false);
            }
        }

        let mut snap = self.snapshot.write().unwrap_or_else(|e| e.into_inner());
        // Another cycle may have materialized the default between the locks.
        if let Some(prefs) = snap.preferences.get(user_id) {
            return (prefs.clone(), false);
        }
        snap.preferences
            .insert(user_id.clone(), self.defaults.clone());
        debug!(user = %user_id, "Materialized default preferences");
        (self.defaults.clone(), true)
    }

    /// The user's active device token, if one is cached.
    pub fn token(&self, user_id: &UserId) -> Option<String> {
        let snap = self.snapshot.read().unwrap_or_else(|e| e.into_inner());
        snap.tokens.get(user_id).cloned()
    }

    /// Remove a cached token proven invalid, so the next resolution within
    /// the same snapshot epoch does not re-select it. Independent of the
    /// TTL cycle.
    pub fn evict_token(&self, token: &str) {
        let mut snap = self.snapshot.write().unwrap_or_else(|e| e.into_inner());
        let owners: Vec<UserId> = snap
            .tokens
            .iter()
            .filter(|(_, t)| t.as_str() == token)
            .map(|(u, _)| u.clone())
            .collect();
        for user in owners {
            snap.tokens.remove(&user);
            debug!(user = %user, "Evicted invalid device token from cache");
        }
    }

    /// Bulk-load all preference records and active tokens and replace the
    /// snapshot atomically.
    ///
    /// On failure the previous (possibly stale) snapshot is retained:
    /// serving stale preferences beats serving none.
    pub async fn refresh(&self) -> AppResult<()> {
        let _flight = self.refresh_guard.lock().await;

        // A concurrent trigger that queued behind an in-flight refresh
        // joins its result instead of re-loading.
        if !self.is_stale() {
            return Ok(());
        }

        let (preferences, tokens) = tokio::try_join!(
            self.preference_store.all_preferences(),
            self.token_store.active_tokens(),
        )
        .inspect_err(|e| {
            warn!(error = %e, "Cache refresh failed; serving previous snapshot");
        })?;

        let preference_map: HashMap<UserId, NotificationPreferences> =
            preferences.into_iter().collect();
        // Later rows win: the store returns oldest-first, so each user's
        // most recently observed token ends up in the map.
        let mut token_map = HashMap::new();
        for record in tokens {
            if record.active {
                token_map.insert(record.user_id, record.token);
            }
        }

        let mut snap = self.snapshot.write().unwrap_or_else(|e| e.into_inner());
        snap.preferences = preference_map;
        snap.tokens = token_map;
        snap.refreshed_at = Some(self.clock.now());
        debug!(
            preferences = snap.preferences.len(),
            tokens = snap.tokens.len(),
            "Preference cache refreshed"
        );
        Ok(())
    }
}
