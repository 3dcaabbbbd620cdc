//! Device token store implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use gridalert_core::error::{AppError, ErrorKind};
use gridalert_core::result::AppResult;
use gridalert_core::traits::repository::TokenStore;
use gridalert_core::types::id::UserId;
use gridalert_core::types::token::DeviceToken;

/// PostgreSQL-backed device token store.
#[derive(Debug, Clone)]
pub struct PgTokenStore {
    pool: PgPool,
}

impl PgTokenStore {
    /// Create a new token store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenStore for PgTokenStore {
    async fn active_tokens(&self) -> AppResult<Vec<DeviceToken>> {
        // Oldest first so the cache keeps each user's most recent row.
        let rows: Vec<(String, String, bool, Option<DateTime<Utc>>)> = sqlx::query_as(
            "SELECT user_id, token, active, deactivated_at FROM device_tokens \
             WHERE active ORDER BY updated_at ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load active tokens", e)
        })?;

        Ok(rows
            .into_iter()
            .map(|(user_id, token, active, deactivated_at)| DeviceToken {
                user_id: UserId::new(user_id),
                token,
                active,
                deactivated_at,
            })
            .collect())
    }

    async fn mark_inactive(&self, token: &str, deactivated_at: DateTime<Utc>) -> AppResult<()> {
        sqlx::query(
            "UPDATE device_tokens SET active = FALSE, deactivated_at = $2, updated_at = now() \
             WHERE token = $1",
        )
        .bind(token)
        .bind(deactivated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to deactivate token", e)
        })?;
        Ok(())
    }
}
