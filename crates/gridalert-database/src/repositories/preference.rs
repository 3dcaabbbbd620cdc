//! Notification preference store implementation.
//!
//! Preferences are stored as one JSONB document per user, wire-compatible
//! with the documents the mobile client writes.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::warn;

use gridalert_core::error::{AppError, ErrorKind};
use gridalert_core::result::AppResult;
use gridalert_core::traits::repository::PreferenceStore;
use gridalert_core::types::id::UserId;
use gridalert_core::types::preference::NotificationPreferences;

/// PostgreSQL-backed preference store.
#[derive(Debug, Clone)]
pub struct PgPreferenceStore {
    pool: PgPool,
}

impl PgPreferenceStore {
    /// Create a new preference store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PreferenceStore for PgPreferenceStore {
    async fn get_preferences(
        &self,
        user_id: &UserId,
    ) -> AppResult<Option<NotificationPreferences>> {
        let row: Option<(serde_json::Value,)> =
            sqlx::query_as("SELECT preferences FROM notification_preferences WHERE user_id = $1")
                .bind(user_id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to fetch preferences", e)
                })?;

        match row {
            Some((value,)) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    async fn set_preferences(
        &self,
        user_id: &UserId,
        preferences: &NotificationPreferences,
    ) -> AppResult<()> {
        let document = serde_json::to_value(preferences)?;
        sqlx::query(
            "INSERT INTO notification_preferences (user_id, preferences, updated_at) \
             VALUES ($1, $2, now()) \
             ON CONFLICT (user_id) DO UPDATE SET preferences = $2, updated_at = now()",
        )
        .bind(user_id.as_str())
        .bind(document)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to upsert preferences", e)
        })?;
        Ok(())
    }

    async fn all_preferences(&self) -> AppResult<Vec<(UserId, NotificationPreferences)>> {
        let rows: Vec<(String, serde_json::Value)> =
            sqlx::query_as("SELECT user_id, preferences FROM notification_preferences")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to bulk-load preferences", e)
                })?;

        let mut records = Vec::with_capacity(rows.len());
        for (user_id, value) in rows {
            match serde_json::from_value::<NotificationPreferences>(value) {
                Ok(prefs) => records.push((UserId::new(user_id), prefs)),
                Err(e) => {
                    // One malformed document must not poison the refresh.
                    warn!(user = %user_id, error = %e, "Skipping malformed preference document");
                }
            }
        }
        Ok(records)
    }
}
