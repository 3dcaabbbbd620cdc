//! Asset (bay) repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use gridalert_core::error::{AppError, ErrorKind};
use gridalert_core::result::AppResult;
use gridalert_core::traits::repository::AssetRepository;
use gridalert_core::types::Asset;
use gridalert_core::types::id::AssetId;

/// PostgreSQL-backed asset registry mirror.
#[derive(Debug, Clone)]
pub struct PgAssetRepository {
    pool: PgPool,
}

impl PgAssetRepository {
    /// Create a new asset repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssetRepository for PgAssetRepository {
    async fn get_asset(&self, id: &AssetId) -> AppResult<Option<Asset>> {
        let row: Option<(String, String, String, String)> =
            sqlx::query_as("SELECT id, name, bay_type, voltage_level FROM bays WHERE id = $1")
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to fetch asset", e)
                })?;

        Ok(row.map(|(id, name, bay_type, voltage_level)| Asset {
            id: AssetId::new(id),
            name,
            bay_type,
            voltage_level,
        }))
    }
}
