//! Org hierarchy repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use gridalert_core::error::{AppError, ErrorKind};
use gridalert_core::result::AppResult;
use gridalert_core::traits::repository::OrgRepository;
use gridalert_core::types::hierarchy::{Circle, Division, Subdivision, Substation};
use gridalert_core::types::id::{CircleId, DivisionId, SubdivisionId, SubstationId, ZoneId};

/// PostgreSQL-backed org registry mirror.
#[derive(Debug, Clone)]
pub struct PgOrgRepository {
    pool: PgPool,
}

impl PgOrgRepository {
    /// Create a new org repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrgRepository for PgOrgRepository {
    async fn get_substation(&self, id: &SubstationId) -> AppResult<Option<Substation>> {
        let row: Option<(String, String, Option<String>)> =
            sqlx::query_as("SELECT id, name, subdivision_id FROM substations WHERE id = $1")
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to fetch substation", e)
                })?;

        Ok(row.map(|(id, name, subdivision_id)| Substation {
            id: SubstationId::new(id),
            name,
            subdivision_id: subdivision_id.map(SubdivisionId::new),
        }))
    }

    async fn get_subdivision(&self, id: &SubdivisionId) -> AppResult<Option<Subdivision>> {
        let row: Option<(String, Option<String>)> =
            sqlx::query_as("SELECT id, division_id FROM subdivisions WHERE id = $1")
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to fetch subdivision", e)
                })?;

        Ok(row.map(|(id, division_id)| Subdivision {
            id: SubdivisionId::new(id),
            division_id: division_id.map(DivisionId::new),
        }))
    }

    async fn get_division(&self, id: &DivisionId) -> AppResult<Option<Division>> {
        let row: Option<(String, Option<String>)> =
            sqlx::query_as("SELECT id, circle_id FROM divisions WHERE id = $1")
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to fetch division", e)
                })?;

        Ok(row.map(|(id, circle_id)| Division {
            id: DivisionId::new(id),
            circle_id: circle_id.map(CircleId::new),
        }))
    }

    async fn get_circle(&self, id: &CircleId) -> AppResult<Option<Circle>> {
        let row: Option<(String, Option<String>)> =
            sqlx::query_as("SELECT id, zone_id FROM circles WHERE id = $1")
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to fetch circle", e)
                })?;

        Ok(row.map(|(id, zone_id)| Circle {
            id: CircleId::new(id),
            zone_id: zone_id.map(ZoneId::new),
        }))
    }
}
